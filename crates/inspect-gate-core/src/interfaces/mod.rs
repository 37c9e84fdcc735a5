// crates/inspect-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Inspect Gate Interfaces
// Description: Backend-agnostic seams for permissions and audit logging.
// Purpose: Define the collaborator contracts consumed by the gate engine.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how Inspect Gate integrates with external systems
//! without embedding backend-specific details. Permission providers answer
//! identity questions; audit sinks receive every verdict when auditing is
//! enabled. Implementations must be deterministic for identical inputs and
//! side-effect free beyond their own logging.
//!
//! Security posture: provider answers gate authorization decisions and are
//! part of the trust boundary; implementations must fail closed on unknown
//! identities.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::identity::CallerId;
use crate::core::verdict::Verdict;

// ============================================================================
// SECTION: Permission Provider
// ============================================================================

/// Backend-agnostic permission and role oracle.
///
/// When no provider is configured, the engine degrades permission and role
/// rules to a conservative require-authenticated fallback.
pub trait PermissionProvider: Send + Sync {
    /// Returns true when the caller holds the named permission.
    fn check_permission(&self, caller: &CallerId, permission: &str) -> bool;

    /// Returns true when the caller holds the named role.
    fn check_role(&self, caller: &CallerId, role: &str) -> bool;

    /// Returns true when the caller is authenticated.
    ///
    /// The default treats any non-anonymous identity as authenticated;
    /// providers backed by an identity system may tighten this.
    fn is_authenticated(&self, caller: &CallerId) -> bool {
        !caller.is_anonymous()
    }
}

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

/// Sink receiving every check verdict when audit logging is enabled.
///
/// Sink implementations are external collaborators; the engine only
/// forwards `(method_name, verdict)` pairs and ignores sink-side failures.
pub trait AuditSink: Send + Sync {
    /// Records one verdict for the named method.
    fn record(&self, method_name: &str, verdict: &Verdict);
}
