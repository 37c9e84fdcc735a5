// crates/inspect-gate-core/src/lib.rs
// ============================================================================
// Module: Inspect Gate Core
// Description: Declarative request-admission and authorization engine.
// Purpose: Evaluate per-method rule lists at admission and runtime phases.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Inspect Gate lets a message-handling host register, per method name, a
//! list of validation rules over that method's strongly typed arguments,
//! then evaluate those rules at two points: a cheap admission check before
//! decoding or executing a call, and a runtime check inside the handler
//! with full execution context.
//!
//! Each method keeps its own argument type while all methods share one
//! registry: registration captures the rules and an extractor inside a
//! type-erased validator, so the registry stores only a uniform interface.
//! Methods without a registration resolve through a default policy whose
//! final fallback is implicit allow (fail-open by design; see
//! [`runtime::registry::GateEngine::resolve_default_policy`]).
//!
//! Security posture: every input reaching the engine except host-supplied
//! time is untrusted; rules validate, verdicts never panic, and
//! misconfiguration is rejected eagerly at construction.

/// Core data model: identities, time, values, contexts, rules, verdicts.
pub mod core;
/// Collaborator seams: permission providers and audit sinks.
pub mod interfaces;
/// Evaluation machinery: primitives, evaluator, limiter, registry, engine.
pub mod runtime;

pub use crate::core::ANONYMOUS_CALLER;
pub use crate::core::CallContext;
pub use crate::core::CallerId;
pub use crate::core::CheckMode;
pub use crate::core::CustomCheckContext;
pub use crate::core::CustomCheckFn;
pub use crate::core::DynamicAuthContext;
pub use crate::core::DynamicAuthFn;
pub use crate::core::Property;
pub use crate::core::Rule;
pub use crate::core::RuleViolation;
pub use crate::core::TaggedValue;
pub use crate::core::Timestamp;
pub use crate::core::ValuePredicateFn;
pub use crate::core::Verdict;
pub use crate::core::reject;
pub use crate::interfaces::AuditSink;
pub use crate::interfaces::PermissionProvider;
pub use crate::runtime::GateEngine;
pub use crate::runtime::GateOptions;
pub use crate::runtime::GateOptionsError;
pub use crate::runtime::GateRegistry;
pub use crate::runtime::PolicyBlock;
pub use crate::runtime::RateLimitConfig;
pub use crate::runtime::RateLimiter;
