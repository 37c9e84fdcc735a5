// crates/inspect-gate-core/src/runtime/evaluate.rs
// ============================================================================
// Module: Inspect Gate Rule Evaluator
// Description: Single-rule dispatch and ordered rule-list evaluation.
// Purpose: Turn one rule plus one call context into a verdict, and fold
// rule lists left-to-right with short-circuit on the first failure.
// Dependencies: crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! The evaluator is a single dispatch over the rule tag. Size and range
//! rules apply their accessor and the shared bounds policy; identity rules
//! consult the caller identity and the optional permission provider;
//! structural rules delegate to the structural validator; rate-limit rules
//! delegate to the configured limiter; custom and dynamic-authorization
//! predicates return their own verdicts verbatim.
//!
//! Built-in failures are prefixed with the stable rule name so diagnostics
//! always identify the violated rule.
//!
//! When a permission or role rule fires without a configured provider, the
//! evaluator falls back to requiring an authenticated caller rather than
//! failing hard (configuration absence is conservative, not fatal).

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::context::CallContext;
use crate::core::context::CheckMode;
use crate::core::context::CustomCheckContext;
use crate::core::context::DynamicAuthContext;
use crate::core::identity::CallerId;
use crate::core::rules::Rule;
use crate::core::verdict::Verdict;
use crate::core::verdict::reject;
use crate::interfaces::PermissionProvider;
use crate::runtime::rate_limit::RateLimiter;
use crate::runtime::size::check_bounds;
use crate::runtime::value_check;

// ============================================================================
// SECTION: Evaluation Environment
// ============================================================================

/// Engine collaborators shared across rule evaluation.
///
/// # Invariants
/// - Both handles are optional; rules degrade per the configuration-absence
///   policy when one is missing.
#[derive(Clone, Copy, Default)]
pub struct RuleEnv<'a> {
    /// Configured permission provider, when present.
    pub provider: Option<&'a dyn PermissionProvider>,
    /// Configured rate limiter, when present.
    pub rate_limiter: Option<&'a RateLimiter>,
}

// ============================================================================
// SECTION: Rule-List Evaluation
// ============================================================================

/// Evaluates a rule list strictly left-to-right, short-circuiting on the
/// first failure.
///
/// # Errors
///
/// Returns the first rule's violation; later rules are not evaluated.
pub fn evaluate_rules<T, M>(
    rules: &[Rule<M>],
    ctx: &CallContext<T>,
    args: &M,
    env: RuleEnv<'_>,
) -> Verdict {
    for rule in rules {
        evaluate_rule(rule, ctx, args, env)?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Single-Rule Dispatch
// ============================================================================

/// Evaluates one rule against the typed arguments and call context.
///
/// # Errors
///
/// Returns a violation describing the failed check; built-in failures are
/// prefixed with the rule name, custom and dynamic-authorization verdicts
/// pass through verbatim.
#[allow(
    clippy::too_many_lines,
    reason = "The dispatch covers the closed rule union in one exhaustive match."
)]
pub fn evaluate_rule<T, M>(
    rule: &Rule<M>,
    ctx: &CallContext<T>,
    args: &M,
    env: RuleEnv<'_>,
) -> Verdict {
    let kind = rule.kind();
    match rule {
        Rule::TextLength {
            accessor,
            min,
            max,
        } => prefixed(kind, check_bounds("text byte length", accessor(args).len(), *min, *max)),
        Rule::BytesLength {
            accessor,
            min,
            max,
        } => prefixed(kind, check_bounds("byte length", accessor(args).len(), *min, *max)),
        Rule::NatRange {
            accessor,
            min,
            max,
        } => prefixed(kind, check_bounds("value", accessor(args), *min, *max)),
        Rule::IntRange {
            accessor,
            min,
            max,
        } => prefixed(kind, check_bounds("value", accessor(args), *min, *max)),
        Rule::RequireAuth => prefixed(kind, require_authenticated(&ctx.caller)),
        Rule::RequirePermission {
            permission,
        } => prefixed(kind, check_permission(&ctx.caller, permission, env.provider)),
        Rule::RequireRole {
            role,
        } => prefixed(kind, check_role(&ctx.caller, role, env.provider)),
        Rule::AllowCallers {
            callers,
        } => {
            if callers.contains(&ctx.caller) {
                Ok(())
            } else {
                prefixed(kind, reject(format!("caller {} is not in the allow list", ctx.caller)))
            }
        }
        Rule::DenyCallers {
            callers,
        } => {
            if callers.contains(&ctx.caller) {
                prefixed(kind, reject(format!("caller {} is in the deny list", ctx.caller)))
            } else {
                Ok(())
            }
        }
        Rule::BlockAll => {
            prefixed(kind, reject(format!("method {} is blocked", ctx.method_name)))
        }
        Rule::BlockAdmission => match ctx.mode {
            CheckMode::Admission => prefixed(
                kind,
                reject(format!("method {} does not accept admission-phase calls", ctx.method_name)),
            ),
            CheckMode::Runtime => Ok(()),
        },
        Rule::RateLimit => match env.rate_limiter {
            Some(limiter) => prefixed(
                kind,
                limiter.check(&ctx.caller, &ctx.method_name, ctx.now, env.provider),
            ),
            None => Ok(()),
        },
        Rule::Custom {
            check,
        } => check(CustomCheckContext {
            args,
            caller: &ctx.caller,
            resource_budget: ctx.resource_budget,
            deadline: ctx.deadline,
        }),
        Rule::DynamicAuth {
            check,
        } => check(DynamicAuthContext {
            args,
            caller: Some(&ctx.caller),
            provider: env.provider,
        }),
        Rule::ValueType {
            accessor,
            expected,
        } => prefixed(kind, value_check::check_value_type(accessor(args), expected)),
        Rule::ValueSize {
            accessor,
            min,
            max,
        } => prefixed(kind, value_check::check_value_size(accessor(args), *min, *max)),
        Rule::ValueDepth {
            accessor,
            min,
            max,
        } => prefixed(kind, value_check::check_value_depth(accessor(args), *min, *max)),
        Rule::ValuePattern {
            accessor,
            pattern,
        } => prefixed(kind, value_check::check_value_pattern(accessor(args), pattern)),
        Rule::ValueRange {
            accessor,
            min,
            max,
        } => prefixed(kind, value_check::check_value_range(accessor(args), *min, *max)),
        Rule::PropertyExists {
            accessor,
            name,
        } => prefixed(kind, value_check::check_property_exists(accessor(args), name)),
        Rule::PropertyType {
            accessor,
            name,
            expected,
        } => prefixed(kind, value_check::check_property_type(accessor(args), name, expected)),
        Rule::PropertySize {
            accessor,
            name,
            min,
            max,
        } => prefixed(kind, value_check::check_property_size(accessor(args), name, *min, *max)),
        Rule::ArrayLength {
            accessor,
            min,
            max,
        } => prefixed(kind, value_check::check_array_length(accessor(args), *min, *max)),
        Rule::ArrayItemType {
            accessor,
            expected,
        } => prefixed(kind, value_check::check_array_item_type(accessor(args), expected)),
        Rule::MapKeyExists {
            accessor,
            key,
        } => prefixed(kind, value_check::check_map_key_exists(accessor(args), key)),
        Rule::MapSize {
            accessor,
            min,
            max,
        } => prefixed(kind, value_check::check_map_size(accessor(args), *min, *max)),
        Rule::ValuePredicate {
            accessor,
            check,
        } => prefixed(kind, check(accessor(args))),
        Rule::Nested {
            rules,
        } => prefixed(kind, evaluate_rules(rules, ctx, args, env)),
    }
}

// ============================================================================
// SECTION: Identity Checks
// ============================================================================

/// Fails iff the caller is the anonymous sentinel.
fn require_authenticated(caller: &CallerId) -> Verdict {
    if caller.is_anonymous() {
        reject("caller is anonymous")
    } else {
        Ok(())
    }
}

/// Checks the named permission, with the authenticated-caller fallback
/// when no provider is configured.
fn check_permission(
    caller: &CallerId,
    permission: &str,
    provider: Option<&dyn PermissionProvider>,
) -> Verdict {
    let Some(provider) = provider else {
        return require_authenticated(caller);
    };
    if provider.check_permission(caller, permission) {
        Ok(())
    } else {
        reject(format!("caller {caller} lacks permission {permission}"))
    }
}

/// Checks the named role, with the authenticated-caller fallback when no
/// provider is configured.
fn check_role(caller: &CallerId, role: &str, provider: Option<&dyn PermissionProvider>) -> Verdict {
    let Some(provider) = provider else {
        return require_authenticated(caller);
    };
    if provider.check_role(caller, role) {
        Ok(())
    } else {
        reject(format!("caller {caller} lacks role {role}"))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Prefixes a failing verdict with the rule name.
fn prefixed(kind: &str, verdict: Verdict) -> Verdict {
    verdict.map_err(|violation| violation.with_prefix(kind))
}
