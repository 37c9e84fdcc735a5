// crates/inspect-gate-core/src/core/verdict.rs
// ============================================================================
// Module: Inspect Gate Verdicts
// Description: Pass/fail check results carrying diagnostic messages.
// Purpose: Give every admission and runtime check one uniform outcome type.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Every check in Inspect Gate resolves to a [`Verdict`]: `Ok(())` admits
//! the call, `Err(RuleViolation)` rejects it with a human-readable
//! diagnostic. Messages name the failed rule and the offending value or
//! bound; they are diagnostics for operators, not a structured error code.
//!
//! Security posture: violation messages may be surfaced to external
//! callers by runtime checks; rules must not embed secrets in them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Outcome of an admission or runtime check.
pub type Verdict = Result<(), RuleViolation>;

/// A failed rule check with a human-readable diagnostic.
///
/// # Invariants
/// - The message names the violated rule and the offending value or bound.
/// - Violations are values, never panics; the engine recovers all failures locally.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct RuleViolation {
    /// Human-readable diagnostic for the violation.
    pub message: String,
}

impl RuleViolation {
    /// Creates a violation with the provided diagnostic message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns a copy of this violation with a context prefix on the message.
    #[must_use]
    pub fn with_prefix(&self, prefix: &str) -> Self {
        Self {
            message: format!("{prefix}: {}", self.message),
        }
    }
}

/// Builds a failing verdict from a diagnostic message.
///
/// # Errors
///
/// Always returns `Err` with the provided message; this is a constructor
/// for rejection verdicts, not a fallible operation.
pub fn reject(message: impl Into<String>) -> Verdict {
    Err(RuleViolation::new(message))
}
