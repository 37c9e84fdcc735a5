// crates/inspect-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Inspect Gate Runtime
// Description: Evaluation machinery for registered rules.
// Purpose: Group the size primitives, structural validator, rate limiter,
// rule evaluator, and the registry/engine.
// Dependencies: crate::runtime submodules
// ============================================================================

//! ## Overview
//! The runtime evaluates the core model: size primitives and the
//! structural validator implement individual checks, the evaluator
//! dispatches single rules and folds rule lists, and the registry/engine
//! ties registrations to the two check entrypoints.

/// Single-rule dispatch and rule-list evaluation.
pub mod evaluate;
/// Fixed-window rate limiting.
pub mod rate_limit;
/// Method registry, erased validators, and the engine entrypoints.
pub mod registry;
/// Size and range primitives.
pub mod size;
/// Structural checks over tagged values.
pub mod value_check;

pub use crate::runtime::evaluate::RuleEnv;
pub use crate::runtime::evaluate::evaluate_rule;
pub use crate::runtime::evaluate::evaluate_rules;
pub use crate::runtime::rate_limit::RateLimitConfig;
pub use crate::runtime::rate_limit::RateLimiter;
pub use crate::runtime::registry::ExtractFn;
pub use crate::runtime::registry::GateEngine;
pub use crate::runtime::registry::GateOptions;
pub use crate::runtime::registry::GateOptionsError;
pub use crate::runtime::registry::GateRegistry;
pub use crate::runtime::registry::MethodValidator;
pub use crate::runtime::registry::PolicyBlock;
pub use crate::runtime::size::check_bounds;
pub use crate::runtime::size::nat_encoded_size;
pub use crate::runtime::size::precheck_arg_size;
