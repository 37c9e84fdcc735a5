//! Config load validation tests for inspect-gate-config.
// crates/inspect-gate-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use inspect_gate_config::ConfigError;
use inspect_gate_config::InspectGateConfig;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<InspectGateConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(InspectGateConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(InspectGateConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(InspectGateConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(InspectGateConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_missing_explicit_path() -> TestResult {
    let path = Path::new("does-not-exist-inspect-gate.toml");
    assert_invalid(InspectGateConfig::load(Some(path)), "config io error")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_fields() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"not_a_real_setting = true\n").map_err(|err| err.to_string())?;
    assert_invalid(InspectGateConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_accepts_a_complete_config_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let text = r#"
allow_anonymous = false
default_max_arg_size = 65536
development_mode = false
audit_log = true

[rate_limit]
max_per_minute = 30
max_per_hour = 500
exempt_roles = ["operator"]

[query_defaults]
allow_anonymous = true

[update_defaults]
allow_anonymous = false
"#;
    file.write_all(text.as_bytes()).map_err(|err| err.to_string())?;
    let config = InspectGateConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.allow_anonymous != Some(false) {
        return Err("allow_anonymous must be false".to_string());
    }
    if config.default_max_arg_size != Some(65_536) {
        return Err("default_max_arg_size must be 65536".to_string());
    }
    let rate_limit = config.rate_limit.ok_or("rate_limit section must parse")?;
    if rate_limit.max_per_minute != Some(30) || rate_limit.max_per_hour != Some(500) {
        return Err("rate limit windows must parse".to_string());
    }
    if rate_limit.exempt_roles != vec!["operator".to_string()] {
        return Err("exempt roles must parse".to_string());
    }
    Ok(())
}

#[test]
fn empty_toml_yields_the_default_config() -> TestResult {
    let config = InspectGateConfig::from_toml_str("").map_err(|err| err.to_string())?;
    if config != InspectGateConfig::default() {
        return Err("empty toml must equal the default config".to_string());
    }
    Ok(())
}
