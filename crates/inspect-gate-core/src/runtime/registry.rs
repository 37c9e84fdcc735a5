// crates/inspect-gate-core/src/runtime/registry.rs
// ============================================================================
// Module: Inspect Gate Registry and Engine
// Description: Dual-mode method registry, erased validators, default
// policy resolution, and the admission/runtime check entrypoints.
// Purpose: Let every method keep its own argument type while all methods
// share one uniform registry and one uniform check function.
// Dependencies: crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! The registry stores, per method name, two independent registrations:
//! one consulted by the admission check and one by the runtime check. Each
//! registration pairs a rule list with an extractor from the host's
//! container argument type `T` to the method-specific type `M`, boxed
//! behind [`MethodValidator`] so `M` disappears from the registry's
//! perspective while full type information is preserved inside the
//! implementor.
//!
//! Methods without a registration resolve through the default policy:
//! method-class defaults, then the global anonymous setting, then implicit
//! allow. The final fallback is fail-open by design; adopters who want
//! deny-by-default must configure a class or global default. See
//! [`GateEngine::resolve_default_policy`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::context::CallContext;
use crate::core::context::CheckMode;
use crate::core::rules::Rule;
use crate::core::verdict::Verdict;
use crate::core::verdict::reject;
use crate::interfaces::AuditSink;
use crate::interfaces::PermissionProvider;
use crate::runtime::evaluate::RuleEnv;
use crate::runtime::evaluate::evaluate_rules;
use crate::runtime::rate_limit::RateLimitConfig;
use crate::runtime::rate_limit::RateLimiter;
use crate::runtime::size::precheck_arg_size;

// ============================================================================
// SECTION: Erased Validator
// ============================================================================

/// Type-erased per-method validator.
///
/// One concrete generic implementor exists per registered method,
/// capturing its own rules and extractor; the registry stores only this
/// uniform interface.
pub trait MethodValidator<T>: Send + Sync {
    /// Validates one call against the captured rules.
    ///
    /// # Errors
    ///
    /// Returns the first rule violation in registration order.
    fn validate(&self, ctx: &CallContext<T>, env: RuleEnv<'_>) -> Verdict;
}

/// Extractor from the container argument type to a method's argument type.
pub type ExtractFn<T, M> = Box<dyn Fn(&T) -> M + Send + Sync>;

/// The concrete validator capturing a method's rules and extractor.
///
/// # Invariants
/// - `rules` are evaluated strictly in order with short-circuit.
struct RuleSetValidator<T, M> {
    /// Rules for the method, in registration order.
    rules: Vec<Rule<M>>,
    /// Extractor recovering the method-specific arguments from `T`.
    extract: ExtractFn<T, M>,
}

impl<T, M> MethodValidator<T> for RuleSetValidator<T, M>
where
    T: Send + Sync,
    M: Send + Sync,
{
    fn validate(&self, ctx: &CallContext<T>, env: RuleEnv<'_>) -> Verdict {
        let args = (self.extract)(&ctx.args);
        evaluate_rules(&self.rules, ctx, &args, env)
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// One stored method registration.
struct MethodRegistration<T> {
    /// Whether the method is a query (read-only) method.
    is_query: bool,
    /// The erased validator for the method.
    validator: Box<dyn MethodValidator<T>>,
}

/// Dual-mode rule registry keyed by method name.
///
/// # Invariants
/// - At most one registration per method per mode; re-registration overwrites.
/// - Populated during host initialization, read-only thereafter.
pub struct GateRegistry<T> {
    /// Registrations consulted by the admission check.
    admission: BTreeMap<String, MethodRegistration<T>>,
    /// Registrations consulted by the runtime check.
    runtime: BTreeMap<String, MethodRegistration<T>>,
}

impl<T> GateRegistry<T>
where
    T: Send + Sync,
{
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            admission: BTreeMap::new(),
            runtime: BTreeMap::new(),
        }
    }

    /// Registers rules for a method under the given mode, overwriting any
    /// prior registration for the same `(mode, method)` pair.
    pub fn register<M>(
        &mut self,
        mode: CheckMode,
        method_name: impl Into<String>,
        is_query: bool,
        rules: Vec<Rule<M>>,
        extract: impl Fn(&T) -> M + Send + Sync + 'static,
    ) where
        M: Send + Sync + 'static,
        T: 'static,
    {
        let registration = MethodRegistration {
            is_query,
            validator: Box::new(RuleSetValidator {
                rules,
                extract: Box::new(extract),
            }),
        };
        self.map_mut(mode).insert(method_name.into(), registration);
    }

    /// Returns whether the registered method is a query method, when a
    /// registration exists for the mode.
    #[must_use]
    pub fn is_query(&self, mode: CheckMode, method_name: &str) -> Option<bool> {
        self.get(mode, method_name).map(|registration| registration.is_query)
    }

    /// Returns the registration for the method under the mode, if any.
    fn get(&self, mode: CheckMode, method_name: &str) -> Option<&MethodRegistration<T>> {
        match mode {
            CheckMode::Admission => self.admission.get(method_name),
            CheckMode::Runtime => self.runtime.get(method_name),
        }
    }

    /// Returns the mutable map for the mode.
    fn map_mut(&mut self, mode: CheckMode) -> &mut BTreeMap<String, MethodRegistration<T>> {
        match mode {
            CheckMode::Admission => &mut self.admission,
            CheckMode::Runtime => &mut self.runtime,
        }
    }
}

impl<T> Default for GateRegistry<T>
where
    T: Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Default policy block for one method class (query or update).
///
/// # Invariants
/// - A configured block terminates default-policy resolution for its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyBlock {
    /// Whether anonymous callers pass the class default.
    pub allow_anonymous: Option<bool>,
}

/// Engine options read at construction.
///
/// Handles (`permission_provider`, `audit_sink`) are attached by the host
/// program; everything else is file-expressible configuration.
#[derive(Default)]
pub struct GateOptions {
    /// Global anonymous-caller default for unregistered methods.
    pub allow_anonymous: Option<bool>,
    /// Default raw argument size cap applied by the admission check.
    pub default_max_arg_size: Option<usize>,
    /// Rate limiter configuration, when limiting is enabled.
    pub rate_limit: Option<RateLimitConfig>,
    /// Default policy block for query methods.
    pub query_defaults: Option<PolicyBlock>,
    /// Default policy block for update methods.
    pub update_defaults: Option<PolicyBlock>,
    /// Relaxes strict defaults for local testing; never enable in production.
    pub development_mode: bool,
    /// Forwards every verdict to the audit sink when true.
    pub audit_log: bool,
    /// Permission provider handle, when the host wires one.
    pub permission_provider: Option<Arc<dyn PermissionProvider>>,
    /// Audit sink handle, when the host wires one.
    pub audit_sink: Option<Arc<dyn AuditSink>>,
}

/// Engine construction errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum GateOptionsError {
    /// A configured rate-limit window maximum is zero.
    #[error("rate limit window maximum must be non-zero when present")]
    ZeroRateWindow,
    /// The rate-limit tracked-entry cap is zero.
    #[error("rate limit tracked-entry cap must be non-zero")]
    ZeroTrackedEntries,
    /// The default argument size cap is zero.
    #[error("default maximum argument size must be non-zero when present")]
    ZeroArgSizeLimit,
}

/// Validates engine options eagerly at construction.
fn validate_options(options: &GateOptions) -> Result<(), GateOptionsError> {
    if options.default_max_arg_size == Some(0) {
        return Err(GateOptionsError::ZeroArgSizeLimit);
    }
    if let Some(rate_limit) = &options.rate_limit {
        let windows = [rate_limit.max_per_minute, rate_limit.max_per_hour, rate_limit.max_per_day];
        if windows.iter().any(|window| *window == Some(0)) {
            return Err(GateOptionsError::ZeroRateWindow);
        }
        if rate_limit.max_tracked_entries == 0 {
            return Err(GateOptionsError::ZeroTrackedEntries);
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Gate Engine
// ============================================================================

/// The admission and runtime check engine owned by one service instance.
///
/// # Invariants
/// - Registration happens during host initialization, before checks begin.
/// - Checks are pure synchronous computation; the rate limiter's counters
///   are the only mutable state and live behind their own lock.
pub struct GateEngine<T> {
    /// Dual-mode method registry.
    registry: GateRegistry<T>,
    /// Global anonymous-caller default.
    allow_anonymous: Option<bool>,
    /// Default raw argument size cap for the admission check.
    default_max_arg_size: Option<usize>,
    /// Query-class default policy block.
    query_defaults: Option<PolicyBlock>,
    /// Update-class default policy block.
    update_defaults: Option<PolicyBlock>,
    /// Development-mode flag relaxing strict defaults.
    development_mode: bool,
    /// Whether verdicts are forwarded to the audit sink.
    audit_log: bool,
    /// Configured rate limiter, when limiting is enabled.
    rate_limiter: Option<RateLimiter>,
    /// Configured permission provider.
    permission_provider: Option<Arc<dyn PermissionProvider>>,
    /// Configured audit sink.
    audit_sink: Option<Arc<dyn AuditSink>>,
}

impl<T> GateEngine<T>
where
    T: Send + Sync + 'static,
{
    /// Creates an engine from validated options.
    ///
    /// # Errors
    ///
    /// Returns [`GateOptionsError`] when the options are misconfigured;
    /// misconfiguration is rejected eagerly rather than surfacing later as
    /// per-call failures.
    pub fn new(options: GateOptions) -> Result<Self, GateOptionsError> {
        validate_options(&options)?;
        Ok(Self {
            registry: GateRegistry::new(),
            allow_anonymous: options.allow_anonymous,
            default_max_arg_size: options.default_max_arg_size,
            query_defaults: options.query_defaults,
            update_defaults: options.update_defaults,
            development_mode: options.development_mode,
            audit_log: options.audit_log,
            rate_limiter: options.rate_limit.map(RateLimiter::new),
            permission_provider: options.permission_provider,
            audit_sink: options.audit_sink,
        })
    }

    /// Registers admission-time rules for a method.
    ///
    /// Registration is an initialization-phase operation; complete all
    /// registrations before the service begins accepting calls.
    pub fn register_admission<M>(
        &mut self,
        method_name: impl Into<String>,
        is_query: bool,
        rules: Vec<Rule<M>>,
        extract: impl Fn(&T) -> M + Send + Sync + 'static,
    ) where
        M: Send + Sync + 'static,
    {
        self.registry.register(CheckMode::Admission, method_name, is_query, rules, extract);
    }

    /// Registers runtime-time rules for a method.
    ///
    /// Registration is an initialization-phase operation; complete all
    /// registrations before the service begins accepting calls.
    pub fn register_runtime<M>(
        &mut self,
        method_name: impl Into<String>,
        is_query: bool,
        rules: Vec<Rule<M>>,
        extract: impl Fn(&T) -> M + Send + Sync + 'static,
    ) where
        M: Send + Sync + 'static,
    {
        self.registry.register(CheckMode::Runtime, method_name, is_query, rules, extract);
    }

    /// Returns the method registry for read-only inspection.
    #[must_use]
    pub const fn registry(&self) -> &GateRegistry<T> {
        &self.registry
    }

    /// Admission check called from the host's pre-execution hook.
    ///
    /// A failure here must cause the host to drop the call before any
    /// further resource is spent.
    ///
    /// # Errors
    ///
    /// Returns the violation that rejected the call.
    pub fn admission_check(&self, ctx: &CallContext<T>) -> Verdict {
        let verdict = self.run_admission(ctx);
        self.audit(&ctx.method_name, &verdict);
        verdict
    }

    /// Runtime check called from inside a method handler.
    ///
    /// A failure here must cause the handler to abort and surface the
    /// message to its own caller.
    ///
    /// # Errors
    ///
    /// Returns the violation that rejected the call.
    pub fn runtime_check(&self, ctx: &CallContext<T>) -> Verdict {
        let verdict = self.check(CheckMode::Runtime, ctx);
        self.audit(&ctx.method_name, &verdict);
        verdict
    }

    /// Runs the admission-phase pipeline: raw-size precheck, then rules.
    fn run_admission(&self, ctx: &CallContext<T>) -> Verdict {
        if !self.development_mode
            && let Some(max) = self.default_max_arg_size
        {
            precheck_arg_size(&ctx.method_name, ctx.arg_size, max)?;
        }
        self.check(CheckMode::Admission, ctx)
    }

    /// Looks up the registry and evaluates the stored validator, falling
    /// back to the default policy for unregistered methods.
    fn check(&self, mode: CheckMode, ctx: &CallContext<T>) -> Verdict {
        let env = RuleEnv {
            provider: self.permission_provider.as_deref(),
            rate_limiter: self.rate_limiter.as_ref(),
        };
        match self.registry.get(mode, &ctx.method_name) {
            Some(registration) => registration.validator.validate(ctx, env),
            None => self.resolve_default_policy(ctx),
        }
    }

    /// Resolves the default policy for a method with no registration.
    ///
    /// Resolution order: the method-class block (query or update), then
    /// the global anonymous setting, then implicit allow. The final
    /// fallback is fail-open by design; configure a class or global
    /// default to deny unregistered methods. Development mode skips the
    /// anonymous restriction entirely.
    ///
    /// # Errors
    ///
    /// Returns a violation when the resolved default denies the caller.
    pub fn resolve_default_policy(&self, ctx: &CallContext<T>) -> Verdict {
        if self.development_mode {
            return Ok(());
        }
        let class_block = if ctx.is_query {
            self.query_defaults
        } else {
            self.update_defaults
        };
        if let Some(block) = class_block {
            return apply_anonymous_default(ctx, block.allow_anonymous);
        }
        apply_anonymous_default(ctx, self.allow_anonymous)
    }

    /// Forwards the verdict to the audit sink when auditing is enabled.
    fn audit(&self, method_name: &str, verdict: &Verdict) {
        if !self.audit_log {
            return;
        }
        if let Some(sink) = &self.audit_sink {
            sink.record(method_name, verdict);
        }
    }
}

/// Applies an anonymous-caller default setting to the call.
///
/// # Errors
///
/// Returns a violation when anonymous callers are disallowed and the
/// caller is anonymous.
fn apply_anonymous_default<T>(ctx: &CallContext<T>, allow_anonymous: Option<bool>) -> Verdict {
    if allow_anonymous == Some(false) && ctx.caller.is_anonymous() {
        return reject(format!(
            "method {} does not permit anonymous callers by default",
            ctx.method_name
        ));
    }
    Ok(())
}
