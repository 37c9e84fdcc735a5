// crates/inspect-gate-core/src/core/identity.rs
// ============================================================================
// Module: Inspect Gate Caller Identity
// Description: Opaque caller identifiers with an anonymous sentinel.
// Purpose: Provide strongly typed caller identities for authorization rules.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Caller identities are opaque textual principals supplied by the host per
//! call. The engine never parses or normalizes them; it only compares them
//! and tests for the reserved anonymous sentinel.
//!
//! Security posture: caller identities are untrusted input attached by the
//! host's transport layer; rules must treat them as labels, not proofs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Caller Identity
// ============================================================================

/// Reserved sentinel text for the unauthenticated caller.
///
/// # Invariants
/// - The sentinel is stable; hosts map their own anonymous principal onto it.
pub const ANONYMOUS_CALLER: &str = "anonymous";

/// Opaque caller identifier attached to every inbound call.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied.
/// - Equality is exact byte equality of the underlying text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(String);

impl CallerId {
    /// Creates a new caller identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the reserved anonymous caller identity.
    #[must_use]
    pub fn anonymous() -> Self {
        Self(ANONYMOUS_CALLER.to_string())
    }

    /// Returns true when this identity is the anonymous sentinel.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_CALLER
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
