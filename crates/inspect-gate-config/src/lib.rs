// crates/inspect-gate-config/src/lib.rs
// ============================================================================
// Module: Inspect Gate Config
// Description: Canonical file-loadable configuration for the gate engine.
// Purpose: Load, validate, and convert TOML configuration into engine options.
// Dependencies: inspect-gate-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! This crate defines the file-expressible subset of the gate engine's
//! options: anonymous-caller defaults, the pre-decode argument size cap,
//! rate-limit windows, per-class policy blocks, and the development and
//! audit flags. Handle-valued options (permission provider, audit sink)
//! are attached programmatically by the host and never appear in files.
//!
//! Loading is strict and fail-closed: path and size guards run before any
//! parse, unknown fields are rejected, and semantic validation runs before
//! a config is handed to the engine.
//!
//! Security posture: configuration files are untrusted input; see the load
//! guards on [`InspectGateConfig::load`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use inspect_gate_core::GateOptions;
use inspect_gate_core::PolicyBlock;
use inspect_gate_core::RateLimitConfig;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Load Guards
// ============================================================================

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "inspect-gate.toml";

/// Maximum accepted config path length in bytes.
const MAX_PATH_LEN: usize = 4_096;

/// Maximum accepted path component length in bytes.
const MAX_PATH_COMPONENT_LEN: usize = 255;

/// Maximum accepted config file size in bytes.
const MAX_FILE_SIZE: usize = 1_048_576;

/// Default cap on tracked rate-limit entries when the file omits one.
const DEFAULT_MAX_TRACKED_ENTRIES: usize = 10_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file I/O failed.
    #[error("config io error: {0}")]
    Io(String),
    /// Config path exceeds the maximum length.
    #[error("config path exceeds max length ({MAX_PATH_LEN} bytes)")]
    PathTooLong,
    /// A config path component exceeds the maximum length.
    #[error("config path component too long (max {MAX_PATH_COMPONENT_LEN} bytes)")]
    PathComponentTooLong,
    /// Config file exceeds the size limit.
    #[error("config file exceeds size limit ({MAX_FILE_SIZE} bytes)")]
    TooLarge,
    /// Config file is not valid UTF-8.
    #[error("config file must be utf-8")]
    NotUtf8,
    /// Config file failed to parse.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config is semantically invalid.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Canonical file-loadable gate configuration.
///
/// # Invariants
/// - Unknown fields are rejected at parse time.
/// - Semantic validity is established by [`InspectGateConfig::validate`]
///   before conversion into engine options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct InspectGateConfig {
    /// Global anonymous-caller default for unregistered methods.
    pub allow_anonymous: Option<bool>,
    /// Pre-decode argument size cap applied by the admission check.
    pub default_max_arg_size: Option<usize>,
    /// Relaxes strict defaults for local testing; never enable in production.
    pub development_mode: bool,
    /// Forwards every verdict to the configured audit sink when true.
    pub audit_log: bool,
    /// Rate limiter settings, when limiting is enabled.
    pub rate_limit: Option<RateLimitSection>,
    /// Default policy block for query methods.
    pub query_defaults: Option<PolicySection>,
    /// Default policy block for update methods.
    pub update_defaults: Option<PolicySection>,
}

/// Rate limiter file section.
///
/// # Invariants
/// - Window maxima must be non-zero when present; validation enforces this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RateLimitSection {
    /// Maximum accepted checks per minute window, when limited.
    pub max_per_minute: Option<u32>,
    /// Maximum accepted checks per hour window, when limited.
    pub max_per_hour: Option<u32>,
    /// Maximum accepted checks per day window, when limited.
    pub max_per_day: Option<u32>,
    /// Roles that bypass every window unconditionally.
    pub exempt_roles: Vec<String>,
    /// Cap on tracked (caller, method) entries before eviction.
    pub max_tracked_entries: Option<usize>,
}

/// Per-class default policy file section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PolicySection {
    /// Whether anonymous callers pass the class default.
    pub allow_anonymous: Option<bool>,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl InspectGateConfig {
    /// Loads configuration from the given path, or from
    /// [`DEFAULT_CONFIG_PATH`] when `path` is `None`.
    ///
    /// A missing default file yields the default configuration; a missing
    /// explicit path is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a load guard rejects the path or file,
    /// parsing fails, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };
        check_path_guards(path)?;
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(path).map_err(|error| ConfigError::Io(error.to_string()))?;
        if bytes.len() > MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge);
        }
        let text = String::from_utf8(bytes).map_err(|_| ConfigError::NotUtf8)?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|error| ConfigError::Parse(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration semantically.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_max_arg_size == Some(0) {
            return Err(ConfigError::Invalid(
                "default_max_arg_size must be non-zero when present".to_string(),
            ));
        }
        if self.development_mode && self.denies_anonymous() {
            return Err(ConfigError::Invalid(
                "development_mode would override allow_anonymous = false; disable one".to_string(),
            ));
        }
        if let Some(rate_limit) = &self.rate_limit {
            let windows =
                [rate_limit.max_per_minute, rate_limit.max_per_hour, rate_limit.max_per_day];
            if windows.iter().any(|window| *window == Some(0)) {
                return Err(ConfigError::Invalid(
                    "rate limit window maximum must be non-zero when present".to_string(),
                ));
            }
            if rate_limit.max_tracked_entries == Some(0) {
                return Err(ConfigError::Invalid(
                    "rate limit max_tracked_entries must be non-zero when present".to_string(),
                ));
            }
            if rate_limit.exempt_roles.iter().any(String::is_empty) {
                return Err(ConfigError::Invalid(
                    "rate limit exempt role must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Returns true when any configured default denies anonymous callers.
    ///
    /// Development mode skips default-policy resolution entirely, so a
    /// deny configured alongside it would silently never apply.
    fn denies_anonymous(&self) -> bool {
        self.allow_anonymous == Some(false)
            || self.query_defaults.is_some_and(|block| block.allow_anonymous == Some(false))
            || self.update_defaults.is_some_and(|block| block.allow_anonymous == Some(false))
    }

    /// Converts the file configuration into engine options.
    ///
    /// Handle-valued options stay unset; hosts attach the permission
    /// provider and audit sink before constructing the engine.
    #[must_use]
    pub fn into_options(self) -> GateOptions {
        GateOptions {
            allow_anonymous: self.allow_anonymous,
            default_max_arg_size: self.default_max_arg_size,
            rate_limit: self.rate_limit.map(RateLimitSection::into_config),
            query_defaults: self.query_defaults.map(PolicySection::into_block),
            update_defaults: self.update_defaults.map(PolicySection::into_block),
            development_mode: self.development_mode,
            audit_log: self.audit_log,
            permission_provider: None,
            audit_sink: None,
        }
    }
}

impl RateLimitSection {
    /// Converts the file section into the core rate limiter configuration.
    #[must_use]
    pub fn into_config(self) -> RateLimitConfig {
        RateLimitConfig {
            max_per_minute: self.max_per_minute,
            max_per_hour: self.max_per_hour,
            max_per_day: self.max_per_day,
            exempt_roles: self.exempt_roles,
            max_tracked_entries: self.max_tracked_entries.unwrap_or(DEFAULT_MAX_TRACKED_ENTRIES),
        }
    }
}

impl PolicySection {
    /// Converts the file section into the core policy block.
    #[must_use]
    pub const fn into_block(self) -> PolicyBlock {
        PolicyBlock {
            allow_anonymous: self.allow_anonymous,
        }
    }
}

// ============================================================================
// SECTION: Path Guards
// ============================================================================

/// Applies path guards before touching the filesystem.
fn check_path_guards(path: &Path) -> Result<(), ConfigError> {
    let rendered = path.as_os_str();
    if rendered.len() > MAX_PATH_LEN {
        return Err(ConfigError::PathTooLong);
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LEN {
            return Err(ConfigError::PathComponentTooLong);
        }
    }
    Ok(())
}
