// crates/inspect-gate-core/src/runtime/value_check.rs
// ============================================================================
// Module: Inspect Gate Structural Validation
// Description: Recursive checks over tagged argument values.
// Purpose: Validate type tags, sizes, depth, properties, arrays, and maps
// of dynamically typed payloads before handlers touch them.
// Dependencies: crate::core::{value, verdict}, crate::runtime::size
// ============================================================================

//! ## Overview
//! Structural checks operate on [`TaggedValue`] payloads. Every check
//! matches the closed union exhaustively: a check applied to a variant
//! that cannot support it fails with a descriptive message naming the
//! offending variant rather than passing silently.
//!
//! Depth checks exist to bound nesting from adversarial payloads before
//! any recursive handler logic runs over them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::value::TaggedValue;
use crate::core::verdict::Verdict;
use crate::core::verdict::reject;
use crate::runtime::size::check_bounds;

// ============================================================================
// SECTION: Tag and Size Checks
// ============================================================================

/// Checks that the value carries the expected variant tag.
///
/// # Errors
///
/// Returns a violation naming the expected and actual tags.
pub fn check_value_type(value: &TaggedValue, expected: &str) -> Verdict {
    let actual = value.type_tag();
    if actual == expected {
        Ok(())
    } else {
        reject(format!("value type {actual} does not match expected {expected}"))
    }
}

/// Bounds the estimated size of the value.
///
/// # Errors
///
/// Returns a violation naming the estimate and the crossed bound.
pub fn check_value_size(value: &TaggedValue, min: Option<usize>, max: Option<usize>) -> Verdict {
    check_bounds("estimated value size", value.estimated_size(), min, max)
}

/// Bounds the nesting depth of the value.
///
/// With an upper bound present, traversal stops one level past the bound
/// so an adversarially deep payload cannot force a full walk; the reported
/// depth saturates at one past the maximum.
///
/// # Errors
///
/// Returns a violation naming the depth and the crossed bound.
pub fn check_value_depth(value: &TaggedValue, min: Option<usize>, max: Option<usize>) -> Verdict {
    let depth = match max {
        Some(max) => value.depth_capped(max.saturating_add(1)),
        None => value.depth(),
    };
    check_bounds("value depth", depth, min, max)
}

// ============================================================================
// SECTION: Pattern and Range Checks
// ============================================================================

/// Checks that a text value contains the pattern substring.
///
/// # Errors
///
/// Returns a violation when the pattern is absent or the variant is not text.
pub fn check_value_pattern(value: &TaggedValue, pattern: &str) -> Verdict {
    match value {
        TaggedValue::Text(text) => {
            if text.contains(pattern) {
                Ok(())
            } else {
                reject(format!("text value does not contain pattern {pattern}"))
            }
        }
        other => reject(format!("pattern check unsupported for {} value", other.type_tag())),
    }
}

/// Bounds an integer-valued variant.
///
/// # Errors
///
/// Returns a violation when the value crosses a bound or the variant is
/// not integer-valued.
pub fn check_value_range(value: &TaggedValue, min: Option<i128>, max: Option<i128>) -> Verdict {
    match value {
        TaggedValue::Int(signed) => check_bounds("value", *signed, min, max),
        TaggedValue::Nat(unsigned) => match i128::try_from(*unsigned) {
            Ok(signed) => check_bounds("value", signed, min, max),
            // A nat beyond i128 exceeds any representable maximum and
            // satisfies any representable minimum.
            Err(_) => match max {
                Some(max) => reject(format!("value {unsigned} above maximum {max}")),
                None => Ok(()),
            },
        },
        other => reject(format!("range check unsupported for {} value", other.type_tag())),
    }
}

// ============================================================================
// SECTION: Property Checks
// ============================================================================

/// Checks that a class value carries the named property.
///
/// # Errors
///
/// Returns a violation when the property is absent or the variant is not a class.
pub fn check_property_exists(value: &TaggedValue, name: &str) -> Verdict {
    match value {
        TaggedValue::Class(_) => {
            if value.property(name).is_some() {
                Ok(())
            } else {
                reject(format!("missing property {name}"))
            }
        }
        other => reject(format!("property check unsupported for {} value", other.type_tag())),
    }
}

/// Checks that the named property exists and carries the expected tag.
///
/// # Errors
///
/// Returns a violation when the property is absent, mismatched, or the
/// variant is not a class.
pub fn check_property_type(value: &TaggedValue, name: &str, expected: &str) -> Verdict {
    match value {
        TaggedValue::Class(_) => match value.property(name) {
            Some(property) => {
                let actual = property.value.type_tag();
                if actual == expected {
                    Ok(())
                } else {
                    reject(format!(
                        "property {name} type {actual} does not match expected {expected}"
                    ))
                }
            }
            None => reject(format!("missing property {name}")),
        },
        other => reject(format!("property check unsupported for {} value", other.type_tag())),
    }
}

/// Bounds the estimated size of the named property value.
///
/// # Errors
///
/// Returns a violation when the property is absent, out of bounds, or the
/// variant is not a class.
pub fn check_property_size(
    value: &TaggedValue,
    name: &str,
    min: Option<usize>,
    max: Option<usize>,
) -> Verdict {
    match value {
        TaggedValue::Class(_) => match value.property(name) {
            Some(property) => check_bounds(
                &format!("property {name} estimated size"),
                property.value.estimated_size(),
                min,
                max,
            ),
            None => reject(format!("missing property {name}")),
        },
        other => reject(format!("property check unsupported for {} value", other.type_tag())),
    }
}

// ============================================================================
// SECTION: Array and Map Checks
// ============================================================================

/// Bounds the element count of an array value.
///
/// # Errors
///
/// Returns a violation when the count crosses a bound or the variant is
/// not an array.
pub fn check_array_length(value: &TaggedValue, min: Option<usize>, max: Option<usize>) -> Verdict {
    match value {
        TaggedValue::Array(items) => check_bounds("array length", items.len(), min, max),
        other => reject(format!("array check unsupported for {} value", other.type_tag())),
    }
}

/// Checks that every array element carries the expected tag, failing on
/// the first mismatch.
///
/// # Errors
///
/// Returns a violation naming the first mismatched index and its tag.
pub fn check_array_item_type(value: &TaggedValue, expected: &str) -> Verdict {
    match value {
        TaggedValue::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let actual = item.type_tag();
                if actual != expected {
                    return reject(format!(
                        "array item {index} type {actual} does not match expected {expected}"
                    ));
                }
            }
            Ok(())
        }
        other => reject(format!("array check unsupported for {} value", other.type_tag())),
    }
}

/// Checks that a map value carries the named key.
///
/// # Errors
///
/// Returns a violation when the key is absent or the variant is not a map.
pub fn check_map_key_exists(value: &TaggedValue, key: &str) -> Verdict {
    match value {
        TaggedValue::Map(_) => {
            if value.map_entry(key).is_some() {
                Ok(())
            } else {
                reject(format!("missing map key {key}"))
            }
        }
        other => reject(format!("map check unsupported for {} value", other.type_tag())),
    }
}

/// Bounds the entry count of a map value.
///
/// # Errors
///
/// Returns a violation when the count crosses a bound or the variant is
/// not a map.
pub fn check_map_size(value: &TaggedValue, min: Option<usize>, max: Option<usize>) -> Verdict {
    match value {
        TaggedValue::Map(entries) => check_bounds("map size", entries.len(), min, max),
        other => reject(format!("map check unsupported for {} value", other.type_tag())),
    }
}
