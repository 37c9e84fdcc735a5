// crates/inspect-gate-core/src/core/value.rs
// ============================================================================
// Module: Inspect Gate Tagged Values
// Description: Dynamically typed, recursively nested argument values.
// Purpose: Give structural rules one closed value vocabulary to validate.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Tagged values model the dynamically typed payloads that methods accept
//! when their argument shape is open-ended (metadata records, property
//! bags, nested documents). The union is closed: recursive validators match
//! it exhaustively, so adversarial payloads can only exercise known
//! variants.
//!
//! Size figures computed here are deliberate approximations used for
//! admission bounds, not serialized-size guarantees; see
//! [`TaggedValue::estimated_size`].
//!
//! Security posture: payload nesting is attacker-controlled, so traversal
//! (depth, size) and destruction are worklist-driven rather than
//! call-stack recursive; a payload too deep to pass a rule must still be
//! safe to measure and drop.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Size Constants
// ============================================================================

/// Estimated byte cost of a numeric or boolean scalar.
const SCALAR_ESTIMATE: usize = 8;

/// Estimated per-element overhead for array, class, and map containers.
const ELEMENT_OVERHEAD: usize = 8;

/// Estimated fixed overhead for a named property beyond its name bytes.
const PROPERTY_OVERHEAD: usize = 16;

// ============================================================================
// SECTION: Tagged Value
// ============================================================================

/// A dynamically typed, recursively nested value identified by a variant tag.
///
/// # Invariants
/// - The union is closed; validators match it exhaustively.
/// - Values are immutable once constructed; validators never mutate them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TaggedValue {
    /// Signed integer value.
    Int(i128),
    /// Unsigned integer value.
    Nat(u128),
    /// UTF-8 text value.
    Text(String),
    /// Boolean value.
    Bool(bool),
    /// Raw byte string.
    Bytes(Vec<u8>),
    /// Ordered array of nested values.
    Array(Vec<TaggedValue>),
    /// Named, typed, optionally immutable property list.
    Class(Vec<Property>),
    /// Ordered key-value map with textual keys.
    Map(Vec<(String, TaggedValue)>),
}

/// A named field within a [`TaggedValue::Class`] value.
///
/// # Invariants
/// - `immutable` is advisory metadata carried by the host; the engine only
///   reads it through custom predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Property value.
    pub value: TaggedValue,
    /// Whether the host considers the property immutable.
    pub immutable: bool,
}

impl TaggedValue {
    /// Returns the stable tag name for this variant.
    #[must_use]
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Nat(_) => "nat",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::Array(_) => "array",
            Self::Class(_) => "class",
            Self::Map(_) => "map",
        }
    }

    /// Returns the nesting depth: `1` for scalars, `1 + max(child depth)`
    /// for containers. An empty container has depth `1`.
    ///
    /// Traversal uses an explicit worklist, never call-stack recursion, so
    /// adversarially deep payloads cannot exhaust the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth_capped(usize::MAX)
    }

    /// Returns the nesting depth, visiting no level beyond `cap`.
    ///
    /// The result equals [`TaggedValue::depth`] when the true depth is at
    /// most `cap`, and exactly `cap` otherwise; depth checks with an upper
    /// bound stop one level past it instead of walking the whole payload.
    #[must_use]
    pub(crate) fn depth_capped(&self, cap: usize) -> usize {
        let mut max_depth = 1;
        let mut pending: Vec<(&Self, usize)> = vec![(self, 1)];
        while let Some((value, level)) = pending.pop() {
            if level > max_depth {
                max_depth = level;
            }
            if level >= cap {
                continue;
            }
            let child_level = level.saturating_add(1);
            match value {
                Self::Int(_) | Self::Nat(_) | Self::Text(_) | Self::Bool(_) | Self::Bytes(_) => {}
                Self::Array(items) => {
                    pending.extend(items.iter().map(|item| (item, child_level)));
                }
                Self::Class(properties) => {
                    pending.extend(
                        properties.iter().map(|property| (&property.value, child_level)),
                    );
                }
                Self::Map(entries) => {
                    pending.extend(entries.iter().map(|(_, value)| (value, child_level)));
                }
            }
        }
        max_depth
    }

    /// Estimates the in-memory size of this value in bytes.
    ///
    /// Text and byte strings count exact byte lengths; numerics and
    /// booleans count a fixed scalar estimate; containers add a fixed
    /// per-element overhead plus their children. The figure is an
    /// approximation intended for admission bounds, never an exact
    /// serialized size. Traversal uses an explicit worklist, never
    /// call-stack recursion.
    #[must_use]
    pub fn estimated_size(&self) -> usize {
        let mut total: usize = 0;
        let mut pending: Vec<&Self> = vec![self];
        while let Some(value) = pending.pop() {
            match value {
                Self::Int(_) | Self::Nat(_) | Self::Bool(_) => {
                    total = total.saturating_add(SCALAR_ESTIMATE);
                }
                Self::Text(text) => total = total.saturating_add(text.len()),
                Self::Bytes(bytes) => total = total.saturating_add(bytes.len()),
                Self::Array(items) => {
                    total = total.saturating_add(items.len().saturating_mul(ELEMENT_OVERHEAD));
                    pending.extend(items.iter());
                }
                Self::Class(properties) => {
                    for property in properties {
                        total = total
                            .saturating_add(property.name.len().saturating_add(PROPERTY_OVERHEAD));
                        pending.push(&property.value);
                    }
                }
                Self::Map(entries) => {
                    for (key, value) in entries {
                        total =
                            total.saturating_add(key.len().saturating_add(ELEMENT_OVERHEAD));
                        pending.push(value);
                    }
                }
            }
        }
        total
    }

    /// Looks up a named property when this value is a class.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        match self {
            Self::Class(properties) => {
                properties.iter().find(|property| property.name == name)
            }
            _ => None,
        }
    }

    /// Looks up a map entry by key when this value is a map.
    #[must_use]
    pub fn map_entry(&self, key: &str) -> Option<&TaggedValue> {
        match self {
            Self::Map(entries) => entries
                .iter()
                .find(|(entry_key, _)| entry_key == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}

/// Moves a value's direct children onto the pending list, leaving the
/// value's own containers empty.
fn detach_children(value: &mut TaggedValue, pending: &mut Vec<TaggedValue>) {
    match value {
        TaggedValue::Int(_)
        | TaggedValue::Nat(_)
        | TaggedValue::Text(_)
        | TaggedValue::Bool(_)
        | TaggedValue::Bytes(_) => {}
        TaggedValue::Array(items) => pending.append(items),
        TaggedValue::Class(properties) => {
            pending.extend(properties.drain(..).map(|property| property.value));
        }
        TaggedValue::Map(entries) => {
            pending.extend(entries.drain(..).map(|(_, value)| value));
        }
    }
}

impl Drop for TaggedValue {
    /// Destroys the value iteratively.
    ///
    /// The default recursive drop would overflow the stack on
    /// adversarially deep payloads; children are detached onto a worklist
    /// so every node is destroyed empty.
    fn drop(&mut self) {
        let mut pending: Vec<Self> = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut value) = pending.pop() {
            detach_children(&mut value, &mut pending);
        }
    }
}
