// crates/inspect-gate-core/src/core/rules.rs
// ============================================================================
// Module: Inspect Gate Rule Taxonomy
// Description: Closed tagged union of validation rules over typed arguments.
// Purpose: Let hosts declare per-method size, identity, structural, and
// custom checks as immutable data evaluated by the runtime.
// Dependencies: crate::core::{context, identity, value, verdict}
// ============================================================================

//! ## Overview
//! A [`Rule`] pairs an accessor from the method-specific argument type `M`
//! to the field under check with variant-specific bounds or predicates.
//! Rules are immutable once constructed and are evaluated strictly in
//! registration order with short-circuit on the first failure.
//!
//! Accessors are plain function pointers so rule lists stay cheap to build
//! at host initialization; only the custom and dynamic-authorization
//! escape hatches carry boxed closures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use crate::core::context::CustomCheckContext;
use crate::core::context::DynamicAuthContext;
use crate::core::identity::CallerId;
use crate::core::value::TaggedValue;
use crate::core::verdict::Verdict;

// ============================================================================
// SECTION: Predicate Aliases
// ============================================================================

/// Caller-supplied custom check over the typed arguments and call context.
pub type CustomCheckFn<M> = Box<dyn Fn(CustomCheckContext<'_, M>) -> Verdict + Send + Sync>;

/// Caller-supplied dynamic-authorization check with provider access.
pub type DynamicAuthFn<M> = Box<dyn Fn(DynamicAuthContext<'_, M>) -> Verdict + Send + Sync>;

/// Caller-supplied structural predicate over a raw tagged value.
pub type ValuePredicateFn = Box<dyn Fn(&TaggedValue) -> Verdict + Send + Sync>;

// ============================================================================
// SECTION: Rule Union
// ============================================================================

/// One validation rule over the method-specific argument type `M`.
///
/// # Invariants
/// - Rules are immutable once constructed.
/// - Accessors must be total over `M`; rules never decode or mutate arguments.
/// - Bound pairs follow one shared policy: a missing bound is unchecked and
///   present bounds are inclusive.
pub enum Rule<M> {
    /// Bounds the UTF-8 byte length of a text field.
    TextLength {
        /// Extracts the text field under check.
        accessor: fn(&M) -> &str,
        /// Inclusive minimum byte length, when bounded below.
        min: Option<usize>,
        /// Inclusive maximum byte length, when bounded above.
        max: Option<usize>,
    },
    /// Bounds the length of a byte-string field.
    BytesLength {
        /// Extracts the byte-string field under check.
        accessor: fn(&M) -> &[u8],
        /// Inclusive minimum length, when bounded below.
        min: Option<usize>,
        /// Inclusive maximum length, when bounded above.
        max: Option<usize>,
    },
    /// Bounds an unsigned integer field.
    NatRange {
        /// Extracts the unsigned field under check.
        accessor: fn(&M) -> u128,
        /// Inclusive minimum value, when bounded below.
        min: Option<u128>,
        /// Inclusive maximum value, when bounded above.
        max: Option<u128>,
    },
    /// Bounds a signed integer field.
    IntRange {
        /// Extracts the signed field under check.
        accessor: fn(&M) -> i128,
        /// Inclusive minimum value, when bounded below.
        min: Option<i128>,
        /// Inclusive maximum value, when bounded above.
        max: Option<i128>,
    },
    /// Rejects the anonymous caller.
    RequireAuth,
    /// Requires the named permission from the configured provider.
    RequirePermission {
        /// Permission name to check.
        permission: String,
    },
    /// Requires the named role from the configured provider.
    RequireRole {
        /// Role name to check.
        role: String,
    },
    /// Admits only callers in the set.
    AllowCallers {
        /// Permitted caller identities.
        callers: BTreeSet<CallerId>,
    },
    /// Rejects callers in the set.
    DenyCallers {
        /// Rejected caller identities.
        callers: BTreeSet<CallerId>,
    },
    /// Rejects every call in every phase.
    BlockAll,
    /// Rejects calls during the admission phase only, letting internal
    /// (non-admission) calls through.
    BlockAdmission,
    /// Applies the engine's configured rate limiter to the caller.
    RateLimit,
    /// Caller-supplied check over typed arguments and execution context.
    Custom {
        /// Predicate returning its own verdict verbatim.
        check: CustomCheckFn<M>,
    },
    /// Caller-supplied authorization check with provider access.
    DynamicAuth {
        /// Predicate returning its own verdict verbatim.
        check: DynamicAuthFn<M>,
    },
    /// Requires a tagged value to carry the expected type tag.
    ValueType {
        /// Extracts the tagged value under check.
        accessor: fn(&M) -> &TaggedValue,
        /// Expected variant tag name.
        expected: String,
    },
    /// Bounds the estimated size of a tagged value.
    ValueSize {
        /// Extracts the tagged value under check.
        accessor: fn(&M) -> &TaggedValue,
        /// Inclusive minimum estimated size, when bounded below.
        min: Option<usize>,
        /// Inclusive maximum estimated size, when bounded above.
        max: Option<usize>,
    },
    /// Bounds the nesting depth of a tagged value.
    ValueDepth {
        /// Extracts the tagged value under check.
        accessor: fn(&M) -> &TaggedValue,
        /// Inclusive minimum depth, when bounded below.
        min: Option<usize>,
        /// Inclusive maximum depth, when bounded above.
        max: Option<usize>,
    },
    /// Requires a text tagged value to contain the pattern substring.
    ValuePattern {
        /// Extracts the tagged value under check.
        accessor: fn(&M) -> &TaggedValue,
        /// Substring that must be contained.
        pattern: String,
    },
    /// Bounds an integer-valued tagged value.
    ValueRange {
        /// Extracts the tagged value under check.
        accessor: fn(&M) -> &TaggedValue,
        /// Inclusive minimum value, when bounded below.
        min: Option<i128>,
        /// Inclusive maximum value, when bounded above.
        max: Option<i128>,
    },
    /// Requires a class value to carry the named property.
    PropertyExists {
        /// Extracts the tagged value under check.
        accessor: fn(&M) -> &TaggedValue,
        /// Property name that must exist.
        name: String,
    },
    /// Requires a named property to carry the expected type tag.
    PropertyType {
        /// Extracts the tagged value under check.
        accessor: fn(&M) -> &TaggedValue,
        /// Property name that must exist.
        name: String,
        /// Expected variant tag name for the property value.
        expected: String,
    },
    /// Bounds the estimated size of a named property value.
    PropertySize {
        /// Extracts the tagged value under check.
        accessor: fn(&M) -> &TaggedValue,
        /// Property name that must exist.
        name: String,
        /// Inclusive minimum estimated size, when bounded below.
        min: Option<usize>,
        /// Inclusive maximum estimated size, when bounded above.
        max: Option<usize>,
    },
    /// Bounds the element count of an array value.
    ArrayLength {
        /// Extracts the tagged value under check.
        accessor: fn(&M) -> &TaggedValue,
        /// Inclusive minimum element count, when bounded below.
        min: Option<usize>,
        /// Inclusive maximum element count, when bounded above.
        max: Option<usize>,
    },
    /// Requires every array element to carry the expected type tag.
    ArrayItemType {
        /// Extracts the tagged value under check.
        accessor: fn(&M) -> &TaggedValue,
        /// Expected variant tag name for every element.
        expected: String,
    },
    /// Requires a map value to carry the named key.
    MapKeyExists {
        /// Extracts the tagged value under check.
        accessor: fn(&M) -> &TaggedValue,
        /// Key that must exist.
        key: String,
    },
    /// Bounds the entry count of a map value.
    MapSize {
        /// Extracts the tagged value under check.
        accessor: fn(&M) -> &TaggedValue,
        /// Inclusive minimum entry count, when bounded below.
        min: Option<usize>,
        /// Inclusive maximum entry count, when bounded above.
        max: Option<usize>,
    },
    /// Caller-supplied structural predicate over the raw tagged value.
    ValuePredicate {
        /// Extracts the tagged value under check.
        accessor: fn(&M) -> &TaggedValue,
        /// Predicate returning its own verdict verbatim.
        check: ValuePredicateFn,
    },
    /// Embedded rule set evaluated recursively against the same arguments;
    /// the first failure propagates with a prefixed diagnostic.
    Nested {
        /// Rules evaluated in order.
        rules: Vec<Rule<M>>,
    },
}

impl<M> Rule<M> {
    /// Returns the stable rule name used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TextLength { .. } => "text_length",
            Self::BytesLength { .. } => "bytes_length",
            Self::NatRange { .. } => "nat_range",
            Self::IntRange { .. } => "int_range",
            Self::RequireAuth => "require_auth",
            Self::RequirePermission { .. } => "require_permission",
            Self::RequireRole { .. } => "require_role",
            Self::AllowCallers { .. } => "allow_callers",
            Self::DenyCallers { .. } => "deny_callers",
            Self::BlockAll => "block_all",
            Self::BlockAdmission => "block_admission",
            Self::RateLimit => "rate_limit",
            Self::Custom { .. } => "custom",
            Self::DynamicAuth { .. } => "dynamic_auth",
            Self::ValueType { .. } => "value_type",
            Self::ValueSize { .. } => "value_size",
            Self::ValueDepth { .. } => "value_depth",
            Self::ValuePattern { .. } => "value_pattern",
            Self::ValueRange { .. } => "value_range",
            Self::PropertyExists { .. } => "property_exists",
            Self::PropertyType { .. } => "property_type",
            Self::PropertySize { .. } => "property_size",
            Self::ArrayLength { .. } => "array_length",
            Self::ArrayItemType { .. } => "array_item_type",
            Self::MapKeyExists { .. } => "map_key_exists",
            Self::MapSize { .. } => "map_size",
            Self::ValuePredicate { .. } => "value_predicate",
            Self::Nested { .. } => "nested",
        }
    }
}

impl<M> fmt::Debug for Rule<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule::{}", self.kind())
    }
}
