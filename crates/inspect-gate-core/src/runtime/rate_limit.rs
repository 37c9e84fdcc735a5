// crates/inspect-gate-core/src/runtime/rate_limit.rs
// ============================================================================
// Module: Inspect Gate Rate Limiter
// Description: Per-caller fixed-window call counters with role exemptions.
// Purpose: Bound per-identity call volume over minute, hour, and day windows.
// Dependencies: crate::core, crate::interfaces, serde
// ============================================================================

//! ## Overview
//! The rate limiter tracks one counter set per (caller, method) pair with
//! three independent fixed windows. Time is caller-supplied via the call
//! context, so limiting stays deterministic and testable. Callers holding
//! an exempt role bypass every window unconditionally.
//!
//! Counter growth is bounded: when the tracked-entry count would exceed
//! the configured cap, entries whose day window is stale are evicted
//! first, then the oldest entries by day-window start.
//!
//! Security posture: caller identities are untrusted; an attacker minting
//! fresh identities churns the entry cap rather than growing memory
//! without bound.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identity::CallerId;
use crate::core::time::Timestamp;
use crate::core::verdict::Verdict;
use crate::core::verdict::reject;
use crate::interfaces::PermissionProvider;

// ============================================================================
// SECTION: Window Constants
// ============================================================================

/// Minute window length in seconds.
const MINUTE_WINDOW_SECS: u64 = 60;

/// Hour window length in seconds.
const HOUR_WINDOW_SECS: u64 = 3_600;

/// Day window length in seconds.
const DAY_WINDOW_SECS: u64 = 86_400;

/// Default cap on tracked (caller, method) entries.
const DEFAULT_MAX_TRACKED_ENTRIES: usize = 10_000;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Rate limiter configuration.
///
/// # Invariants
/// - A `None` window maximum disables that window entirely.
/// - `max_tracked_entries` must be non-zero; constructors validate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum accepted checks per minute window, when limited.
    pub max_per_minute: Option<u32>,
    /// Maximum accepted checks per hour window, when limited.
    pub max_per_hour: Option<u32>,
    /// Maximum accepted checks per day window, when limited.
    pub max_per_day: Option<u32>,
    /// Roles that bypass every window unconditionally.
    pub exempt_roles: Vec<String>,
    /// Cap on tracked (caller, method) entries before eviction.
    pub max_tracked_entries: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_minute: None,
            max_per_hour: None,
            max_per_day: None,
            exempt_roles: Vec::new(),
            max_tracked_entries: DEFAULT_MAX_TRACKED_ENTRIES,
        }
    }
}

// ============================================================================
// SECTION: Counter State
// ============================================================================

/// One fixed window counter.
#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    /// Start of the current window.
    window_start: Timestamp,
    /// Accepted check count within the current window.
    count: u32,
}

impl WindowCounter {
    /// Creates a fresh counter starting at the given time.
    const fn new(now: Timestamp) -> Self {
        Self {
            window_start: now,
            count: 0,
        }
    }

    /// Rolls the window when its boundary has passed, then increments.
    ///
    /// Returns the count after increment.
    fn roll_and_increment(&mut self, now: Timestamp, window_secs: u64) -> u32 {
        if now.secs_since(self.window_start) >= window_secs {
            self.window_start = now;
            self.count = 0;
        }
        self.count = self.count.saturating_add(1);
        self.count
    }
}

/// Window counters tracked for one (caller, method) entry.
#[derive(Debug, Clone, Copy)]
struct EntryWindows {
    /// Minute window counter.
    minute: WindowCounter,
    /// Hour window counter.
    hour: WindowCounter,
    /// Day window counter.
    day: WindowCounter,
}

impl EntryWindows {
    /// Creates fresh counters starting at the given time.
    const fn new(now: Timestamp) -> Self {
        Self {
            minute: WindowCounter::new(now),
            hour: WindowCounter::new(now),
            day: WindowCounter::new(now),
        }
    }
}

// ============================================================================
// SECTION: Rate Limiter
// ============================================================================

/// Fixed-window rate limiter keyed by (caller, method).
///
/// # Invariants
/// - Counters are mutated only under the entry lock; lock poisoning is
///   recovered into a deny verdict, never a panic.
/// - The entry map never exceeds `max_tracked_entries` after a check.
#[derive(Debug)]
pub struct RateLimiter {
    /// Limiter configuration.
    config: RateLimitConfig,
    /// Counter entries keyed by caller and method name.
    entries: Mutex<BTreeMap<(CallerId, String), EntryWindows>>,
}

impl RateLimiter {
    /// Creates a limiter with the provided configuration.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the limiter configuration.
    #[must_use]
    pub const fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Checks and counts one call for the caller against every configured
    /// window.
    ///
    /// Exempt roles bypass all windows. A failure names the exceeded
    /// window. Rejected checks still count against the windows.
    ///
    /// # Errors
    ///
    /// Returns a violation when any window maximum is exceeded or the
    /// limiter state is unavailable.
    pub fn check(
        &self,
        caller: &CallerId,
        method_name: &str,
        now: Timestamp,
        provider: Option<&dyn PermissionProvider>,
    ) -> Verdict {
        if self.is_exempt(caller, provider) {
            return Ok(());
        }
        if self.config.max_per_minute.is_none()
            && self.config.max_per_hour.is_none()
            && self.config.max_per_day.is_none()
        {
            return Ok(());
        }

        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(_) => return reject("rate limiter state unavailable: lock poisoned"),
        };

        let key = (caller.clone(), method_name.to_string());
        if !entries.contains_key(&key) && entries.len() >= self.config.max_tracked_entries {
            evict_stale_entries(&mut entries, now, self.config.max_tracked_entries);
        }
        let windows = entries.entry(key).or_insert_with(|| EntryWindows::new(now));

        let minute_count = windows.minute.roll_and_increment(now, MINUTE_WINDOW_SECS);
        let hour_count = windows.hour.roll_and_increment(now, HOUR_WINDOW_SECS);
        let day_count = windows.day.roll_and_increment(now, DAY_WINDOW_SECS);

        if let Some(max) = self.config.max_per_minute
            && minute_count > max
        {
            return reject(format!(
                "minute window exceeded: {minute_count} calls (max {max})"
            ));
        }
        if let Some(max) = self.config.max_per_hour
            && hour_count > max
        {
            return reject(format!("hour window exceeded: {hour_count} calls (max {max})"));
        }
        if let Some(max) = self.config.max_per_day
            && day_count > max
        {
            return reject(format!("day window exceeded: {day_count} calls (max {max})"));
        }
        Ok(())
    }

    /// Returns true when the caller holds any exempt role.
    ///
    /// Without a provider no role can be resolved, so nothing is exempt.
    fn is_exempt(&self, caller: &CallerId, provider: Option<&dyn PermissionProvider>) -> bool {
        let Some(provider) = provider else {
            return false;
        };
        self.config.exempt_roles.iter().any(|role| provider.check_role(caller, role))
    }
}

// ============================================================================
// SECTION: Eviction
// ============================================================================

/// Evicts entries to keep the map below its cap.
///
/// Entries whose day window is stale relative to `now` are dropped first;
/// when still over the cap, the oldest entries by day-window start go next.
fn evict_stale_entries(
    entries: &mut BTreeMap<(CallerId, String), EntryWindows>,
    now: Timestamp,
    cap: usize,
) {
    entries.retain(|_, windows| now.secs_since(windows.day.window_start) < DAY_WINDOW_SECS);
    while entries.len() >= cap {
        let oldest = entries
            .iter()
            .min_by_key(|(_, windows)| windows.day.window_start)
            .map(|(key, _)| key.clone());
        let Some(key) = oldest else {
            return;
        };
        entries.remove(&key);
    }
}
