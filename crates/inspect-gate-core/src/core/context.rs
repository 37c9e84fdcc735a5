// crates/inspect-gate-core/src/core/context.rs
// ============================================================================
// Module: Inspect Gate Call Contexts
// Description: Per-call execution contexts for admission and runtime checks.
// Purpose: Carry caller identity, argument payloads, and budgets into rules.
// Dependencies: crate::core::{identity, time}, crate::interfaces, serde
// ============================================================================

//! ## Overview
//! A [`CallContext`] is constructed fresh by the host for every inbound
//! call and never persisted. It bundles the method name, caller identity,
//! raw argument size, the host's typed argument container, and the
//! execution-phase metadata (mode, budget, deadline, current time) that
//! identity and custom rules consume.
//!
//! Security posture: everything in a call context except `now` originates
//! from an untrusted caller or transport; rules must validate, never trust.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identity::CallerId;
use crate::core::time::Timestamp;
use crate::interfaces::PermissionProvider;

// ============================================================================
// SECTION: Check Mode
// ============================================================================

/// The evaluation phase a check runs in.
///
/// # Invariants
/// - Variants are stable for serialization and audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckMode {
    /// Pre-decode admission hook; failures drop the call before execution.
    Admission,
    /// In-handler runtime check with full execution context.
    Runtime,
}

// ============================================================================
// SECTION: Call Context
// ============================================================================

/// Execution context for one inbound call against container arguments `T`.
///
/// # Invariants
/// - Constructed fresh per call by the host; never persisted or reused.
/// - `now` is host-supplied; the engine never reads wall-clock time.
/// - `arg_size` is the raw, pre-decode argument byte length.
#[derive(Debug, Clone)]
pub struct CallContext<T> {
    /// Method name being called.
    pub method_name: String,
    /// Caller identity attached by the transport.
    pub caller: CallerId,
    /// Raw argument byte length, available without decoding.
    pub arg_size: usize,
    /// Host-specific container holding every method's decoded arguments.
    pub args: T,
    /// Whether the call is a query (read-only) call.
    pub is_query: bool,
    /// Evaluation phase for this check.
    pub mode: CheckMode,
    /// Host-supplied current time.
    pub now: Timestamp,
    /// Remaining resource budget, when the host meters one.
    pub resource_budget: Option<u128>,
    /// Call deadline, when the host enforces one.
    pub deadline: Option<Timestamp>,
}

impl<T> CallContext<T> {
    /// Creates a context with the required per-call fields and no budget
    /// or deadline.
    #[must_use]
    pub fn new(
        method_name: impl Into<String>,
        caller: CallerId,
        arg_size: usize,
        args: T,
        is_query: bool,
        mode: CheckMode,
        now: Timestamp,
    ) -> Self {
        Self {
            method_name: method_name.into(),
            caller,
            arg_size,
            args,
            is_query,
            mode,
            now,
            resource_budget: None,
            deadline: None,
        }
    }

    /// Returns the context with a resource budget attached.
    #[must_use]
    pub const fn with_resource_budget(mut self, budget: u128) -> Self {
        self.resource_budget = Some(budget);
        self
    }

    /// Returns the context with a deadline attached.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Timestamp) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

// ============================================================================
// SECTION: Predicate Contexts
// ============================================================================

/// Context bundle handed to custom rule predicates.
///
/// # Invariants
/// - Borrows are snapshots of the call context; predicates must not assume
///   they outlive the check.
#[derive(Debug, Clone, Copy)]
pub struct CustomCheckContext<'a, M> {
    /// Method-specific typed arguments.
    pub args: &'a M,
    /// Caller identity for the call.
    pub caller: &'a CallerId,
    /// Remaining resource budget, when metered.
    pub resource_budget: Option<u128>,
    /// Call deadline, when enforced.
    pub deadline: Option<Timestamp>,
}

/// Context bundle handed to dynamic-authorization predicates.
///
/// # Invariants
/// - `provider` is absent when the engine has no permission provider
///   configured; predicates decide their own fallback.
#[derive(Clone, Copy)]
pub struct DynamicAuthContext<'a, M> {
    /// Method-specific typed arguments.
    pub args: &'a M,
    /// Caller identity, when the host attached one.
    pub caller: Option<&'a CallerId>,
    /// Configured permission provider handle, when present.
    pub provider: Option<&'a dyn PermissionProvider>,
}
