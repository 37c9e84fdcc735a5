// crates/inspect-gate-core/src/runtime/size.rs
// ============================================================================
// Module: Inspect Gate Size Primitives
// Description: O(1) length, range, and encoded-size checks.
// Purpose: Provide the shared bounds policy and pre-decode size rejection.
// Dependencies: crate::core::verdict
// ============================================================================

//! ## Overview
//! Size primitives implement one bounds policy shared by every bounded
//! rule: a missing bound is unchecked and present bounds are inclusive, so
//! boundary values pass. The minimum is tested before the maximum so the
//! common undersized case fails fast.
//!
//! [`precheck_arg_size`] rejects oversized payloads from the raw byte
//! length alone, before any decoding work is spent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::core::verdict::Verdict;
use crate::core::verdict::reject;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixed header overhead added to LEB128 payload estimates.
const LEB128_HEADER_OVERHEAD: usize = 1;

// ============================================================================
// SECTION: Bounds Checks
// ============================================================================

/// Checks `value` against inclusive optional bounds.
///
/// Passes when no bound is present; with both bounds, fails when the value
/// is below the minimum or above the maximum. `label` names the checked
/// quantity in diagnostics.
///
/// # Errors
///
/// Returns a violation naming the label, value, and crossed bound.
pub fn check_bounds<V>(label: &str, value: V, min: Option<V>, max: Option<V>) -> Verdict
where
    V: PartialOrd + fmt::Display,
{
    if let Some(min) = min
        && value < min
    {
        return reject(format!("{label} {value} below minimum {min}"));
    }
    if let Some(max) = max
        && value > max
    {
        return reject(format!("{label} {value} above maximum {max}"));
    }
    Ok(())
}

/// Rejects a call from its raw argument byte length alone.
///
/// This is the O(1) admission pre-filter applied before decoding; `max`
/// comes from per-method or engine-default configuration.
///
/// # Errors
///
/// Returns a violation naming the method, the raw size, and the limit.
pub fn precheck_arg_size(method_name: &str, arg_size: usize, max: usize) -> Verdict {
    if arg_size > max {
        return reject(format!(
            "method {method_name} argument size {arg_size} exceeds limit {max}"
        ));
    }
    Ok(())
}

// ============================================================================
// SECTION: Encoded-Size Estimation
// ============================================================================

/// Estimates the minimal LEB128-style variable-length encoding size of an
/// unsigned integer, in bytes, including a fixed header overhead.
///
/// Used when an exact serialized size cannot cheaply be measured.
#[must_use]
pub const fn nat_encoded_size(value: u128) -> usize {
    let mut bits: usize = 1;
    let mut rest = value >> 1;
    while rest > 0 {
        bits += 1;
        rest >>= 1;
    }
    bits.div_ceil(7) + LEB128_HEADER_OVERHEAD
}
