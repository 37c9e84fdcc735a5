// crates/inspect-gate-core/tests/rate_limit.rs
// ============================================================================
// Module: Rate Limiter Tests
// Description: Validate fixed-window counting, exemptions, and eviction.
// Purpose: Ensure deterministic limiting under caller-supplied time.
// Dependencies: inspect-gate-core
// ============================================================================

//! Rate-limiter tests driven entirely by explicit timestamps.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use inspect_gate_core::CallContext;
use inspect_gate_core::CallerId;
use inspect_gate_core::CheckMode;
use inspect_gate_core::PermissionProvider;
use inspect_gate_core::RateLimitConfig;
use inspect_gate_core::RateLimiter;
use inspect_gate_core::Rule;
use inspect_gate_core::Timestamp;
use inspect_gate_core::Verdict;
use inspect_gate_core::runtime::RuleEnv;
use inspect_gate_core::runtime::evaluate_rule;

type TestResult = Result<(), String>;

/// Asserts that a verdict fails and its message contains the needle.
fn assert_violation(verdict: Verdict, needle: &str) -> TestResult {
    match verdict {
        Err(violation) => {
            if violation.message.contains(needle) {
                Ok(())
            } else {
                Err(format!("violation {} did not contain {needle}", violation.message))
            }
        }
        Ok(()) => Err(format!("expected violation containing {needle}")),
    }
}

/// Provider granting the operator role to the ops caller only.
#[derive(Debug, Clone, Copy)]
struct OpsProvider;

impl PermissionProvider for OpsProvider {
    fn check_permission(&self, _caller: &CallerId, _permission: &str) -> bool {
        false
    }

    fn check_role(&self, caller: &CallerId, role: &str) -> bool {
        caller.as_str() == "ops" && role == "operator"
    }
}

/// Builds a limiter config with only the minute window set.
fn minute_config(max: u32) -> RateLimitConfig {
    RateLimitConfig {
        max_per_minute: Some(max),
        ..RateLimitConfig::default()
    }
}

#[test]
fn minute_window_admits_up_to_the_maximum() -> TestResult {
    let limiter = RateLimiter::new(minute_config(2));
    let alice = CallerId::new("alice");
    let t0 = Timestamp::from_unix_secs(1_000);

    limiter.check(&alice, "save_note", t0, None).map_err(|violation| violation.message)?;
    limiter
        .check(&alice, "save_note", Timestamp::from_unix_secs(1_030), None)
        .map_err(|violation| violation.message)?;
    assert_violation(
        limiter.check(&alice, "save_note", Timestamp::from_unix_secs(1_059), None),
        "minute window exceeded: 3 calls (max 2)",
    )
}

#[test]
fn minute_window_resets_at_the_boundary() -> TestResult {
    let limiter = RateLimiter::new(minute_config(1));
    let alice = CallerId::new("alice");

    limiter
        .check(&alice, "save_note", Timestamp::from_unix_secs(1_000), None)
        .map_err(|violation| violation.message)?;
    assert_violation(
        limiter.check(&alice, "save_note", Timestamp::from_unix_secs(1_059), None),
        "minute window exceeded",
    )?;
    // Sixty seconds after the window start, the counter rolls over.
    limiter
        .check(&alice, "save_note", Timestamp::from_unix_secs(1_060), None)
        .map_err(|violation| violation.message)?;
    Ok(())
}

#[test]
fn hour_window_counts_across_minute_resets() -> TestResult {
    let limiter = RateLimiter::new(RateLimitConfig {
        max_per_hour: Some(2),
        ..RateLimitConfig::default()
    });
    let alice = CallerId::new("alice");

    limiter
        .check(&alice, "save_note", Timestamp::from_unix_secs(0), None)
        .map_err(|violation| violation.message)?;
    limiter
        .check(&alice, "save_note", Timestamp::from_unix_secs(61), None)
        .map_err(|violation| violation.message)?;
    assert_violation(
        limiter.check(&alice, "save_note", Timestamp::from_unix_secs(122), None),
        "hour window exceeded: 3 calls (max 2)",
    )
}

#[test]
fn rejected_checks_still_count_against_windows() -> TestResult {
    let limiter = RateLimiter::new(minute_config(1));
    let alice = CallerId::new("alice");
    let t0 = Timestamp::from_unix_secs(500);

    limiter.check(&alice, "save_note", t0, None).map_err(|violation| violation.message)?;
    assert_violation(limiter.check(&alice, "save_note", t0, None), "2 calls (max 1)")?;
    assert_violation(limiter.check(&alice, "save_note", t0, None), "3 calls (max 1)")
}

#[test]
fn counters_are_keyed_per_caller_and_method() -> TestResult {
    let limiter = RateLimiter::new(minute_config(1));
    let alice = CallerId::new("alice");
    let bob = CallerId::new("bob");
    let t0 = Timestamp::from_unix_secs(100);

    limiter.check(&alice, "save_note", t0, None).map_err(|violation| violation.message)?;
    // A different caller and a different method each get fresh counters.
    limiter.check(&bob, "save_note", t0, None).map_err(|violation| violation.message)?;
    limiter.check(&alice, "list_notes", t0, None).map_err(|violation| violation.message)?;
    assert_violation(limiter.check(&alice, "save_note", t0, None), "minute window exceeded")
}

#[test]
fn exempt_roles_bypass_every_window() -> TestResult {
    let provider = OpsProvider;
    let limiter = RateLimiter::new(RateLimitConfig {
        max_per_minute: Some(1),
        exempt_roles: vec!["operator".to_string()],
        ..RateLimitConfig::default()
    });
    let ops = CallerId::new("ops");
    let t0 = Timestamp::from_unix_secs(100);

    for _ in 0..5 {
        limiter
            .check(&ops, "save_note", t0, Some(&provider))
            .map_err(|violation| violation.message)?;
    }
    // Without a provider the same caller cannot be resolved as exempt.
    limiter.check(&ops, "save_note", t0, None).map_err(|violation| violation.message)?;
    assert_violation(limiter.check(&ops, "save_note", t0, None), "minute window exceeded")
}

#[test]
fn unlimited_config_never_rejects() -> TestResult {
    let limiter = RateLimiter::new(RateLimitConfig::default());
    let alice = CallerId::new("alice");
    let t0 = Timestamp::from_unix_secs(0);

    for _ in 0..1_000 {
        limiter.check(&alice, "save_note", t0, None).map_err(|violation| violation.message)?;
    }
    Ok(())
}

#[test]
fn entry_cap_evicts_rather_than_rejecting_new_callers() -> TestResult {
    let limiter = RateLimiter::new(RateLimitConfig {
        max_per_minute: Some(1),
        max_tracked_entries: 2,
        ..RateLimitConfig::default()
    });
    let t0 = Timestamp::from_unix_secs(1_000);

    limiter
        .check(&CallerId::new("alice"), "save_note", t0, None)
        .map_err(|violation| violation.message)?;
    limiter
        .check(&CallerId::new("bob"), "save_note", t0, None)
        .map_err(|violation| violation.message)?;
    // The cap is reached; a third caller forces an eviction and still passes.
    limiter
        .check(&CallerId::new("carol"), "save_note", t0, None)
        .map_err(|violation| violation.message)?;
    Ok(())
}

#[test]
fn stale_day_entries_are_dropped_before_live_ones() -> TestResult {
    let limiter = RateLimiter::new(RateLimitConfig {
        max_per_minute: Some(1),
        max_tracked_entries: 1,
        ..RateLimitConfig::default()
    });
    let alice = CallerId::new("alice");
    let bob = CallerId::new("bob");

    limiter
        .check(&alice, "save_note", Timestamp::from_unix_secs(0), None)
        .map_err(|violation| violation.message)?;
    // A full day later the alice entry is stale, so bob replaces it.
    limiter
        .check(&bob, "save_note", Timestamp::from_unix_secs(86_401), None)
        .map_err(|violation| violation.message)?;
    assert_violation(
        limiter.check(&bob, "save_note", Timestamp::from_unix_secs(86_401), None),
        "minute window exceeded",
    )
}

#[test]
fn rate_limit_rule_prefixes_limiter_failures() -> TestResult {
    let limiter = RateLimiter::new(minute_config(1));
    let env = RuleEnv {
        provider: None,
        rate_limiter: Some(&limiter),
    };
    let rule: Rule<()> = Rule::RateLimit;
    let ctx = CallContext::new(
        "save_note",
        CallerId::new("alice"),
        0,
        (),
        false,
        CheckMode::Runtime,
        Timestamp::from_unix_secs(1_000),
    );

    evaluate_rule(&rule, &ctx, &ctx.args, env).map_err(|violation| violation.message)?;
    assert_violation(
        evaluate_rule(&rule, &ctx, &ctx.args, env),
        "rate_limit: minute window exceeded: 2 calls (max 1)",
    )?;
    // Without a configured limiter the rule is inert.
    evaluate_rule(&rule, &ctx, &ctx.args, RuleEnv::default())
        .map_err(|violation| violation.message)?;
    Ok(())
}
