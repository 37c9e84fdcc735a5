// crates/inspect-gate-core/src/core/mod.rs
// ============================================================================
// Module: Inspect Gate Core Model
// Description: Data model shared by the rule registry and evaluators.
// Purpose: Group identity, time, value, context, rule, and verdict types.
// Dependencies: crate::core submodules
// ============================================================================

//! ## Overview
//! The core model defines the immutable data the runtime evaluates: caller
//! identities, caller-supplied timestamps, tagged argument values, per-call
//! contexts, the rule taxonomy, and verdicts.

/// Call context types for admission and runtime checks.
pub mod context;
/// Caller identity types.
pub mod identity;
/// The rule taxonomy.
pub mod rules;
/// Caller-supplied time values.
pub mod time;
/// Tagged dynamic argument values.
pub mod value;
/// Check verdicts and rule violations.
pub mod verdict;

pub use crate::core::context::CallContext;
pub use crate::core::context::CheckMode;
pub use crate::core::context::CustomCheckContext;
pub use crate::core::context::DynamicAuthContext;
pub use crate::core::identity::ANONYMOUS_CALLER;
pub use crate::core::identity::CallerId;
pub use crate::core::rules::CustomCheckFn;
pub use crate::core::rules::DynamicAuthFn;
pub use crate::core::rules::Rule;
pub use crate::core::rules::ValuePredicateFn;
pub use crate::core::time::Timestamp;
pub use crate::core::value::Property;
pub use crate::core::value::TaggedValue;
pub use crate::core::verdict::RuleViolation;
pub use crate::core::verdict::Verdict;
pub use crate::core::verdict::reject;
