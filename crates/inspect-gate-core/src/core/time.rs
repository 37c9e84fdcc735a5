// crates/inspect-gate-core/src/core/time.rs
// ============================================================================
// Module: Inspect Gate Time Model
// Description: Caller-supplied timestamps for rate limiting and deadlines.
// Purpose: Keep every check deterministic by never reading wall-clock time.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Inspect Gate uses explicit time values embedded in call contexts to keep
//! checks deterministic and replayable. The core engine never reads
//! wall-clock time directly; hosts must supply the current time with every
//! call context they construct.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp carried in call contexts, in unix seconds.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads wall-clock time.
/// - No validation is performed; monotonicity is a caller responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp from unix seconds.
    #[must_use]
    pub const fn from_unix_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Returns the timestamp as unix seconds.
    #[must_use]
    pub const fn as_unix_secs(self) -> u64 {
        self.0
    }

    /// Returns the whole seconds elapsed since an earlier timestamp.
    ///
    /// Saturates to zero when `earlier` is in the future.
    #[must_use]
    pub const fn secs_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}
