// crates/inspect-gate-core/tests/serde_repr.rs
// ============================================================================
// Module: Serialization Representation Tests
// Description: Pin the wire representation of the core model types.
// Purpose: Ensure tagged values, identities, and verdicts keep their
// documented stable serialized forms.
// Dependencies: inspect-gate-core, serde_json
// ============================================================================

//! Wire-representation tests for the serializable core types.

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

use inspect_gate_core::CallerId;
use inspect_gate_core::CheckMode;
use inspect_gate_core::Property;
use inspect_gate_core::RuleViolation;
use inspect_gate_core::TaggedValue;
use inspect_gate_core::Timestamp;
use serde_json::json;

type TestResult = Result<(), String>;

#[test]
fn tagged_values_serialize_with_kind_and_value() -> TestResult {
    let value = TaggedValue::Class(vec![Property {
        name: "title".to_string(),
        value: TaggedValue::Text("groceries".to_string()),
        immutable: true,
    }]);
    let rendered = serde_json::to_value(&value).map_err(|err| err.to_string())?;
    let expected = json!({
        "kind": "class",
        "value": [
            {
                "name": "title",
                "value": { "kind": "text", "value": "groceries" },
                "immutable": true
            }
        ]
    });
    if rendered != expected {
        return Err(format!("unexpected representation: {rendered}"));
    }
    let restored: TaggedValue =
        serde_json::from_value(rendered).map_err(|err| err.to_string())?;
    if restored != value {
        return Err("round trip must preserve the value".to_string());
    }
    Ok(())
}

#[test]
fn identities_and_timestamps_are_transparent() -> TestResult {
    let caller = serde_json::to_value(CallerId::new("alice")).map_err(|err| err.to_string())?;
    if caller != json!("alice") {
        return Err(format!("caller must serialize as bare text, got {caller}"));
    }
    let time =
        serde_json::to_value(Timestamp::from_unix_secs(1_234)).map_err(|err| err.to_string())?;
    if time != json!(1_234) {
        return Err(format!("timestamp must serialize as bare seconds, got {time}"));
    }
    Ok(())
}

#[test]
fn check_modes_use_snake_case_tags() -> TestResult {
    let admission = serde_json::to_value(CheckMode::Admission).map_err(|err| err.to_string())?;
    let runtime = serde_json::to_value(CheckMode::Runtime).map_err(|err| err.to_string())?;
    if admission != json!("admission") || runtime != json!("runtime") {
        return Err(format!("unexpected mode tags: {admission}, {runtime}"));
    }
    Ok(())
}

#[test]
fn violations_carry_only_the_message() -> TestResult {
    let violation = RuleViolation::new("text too long");
    let rendered = serde_json::to_value(&violation).map_err(|err| err.to_string())?;
    if rendered != json!({ "message": "text too long" }) {
        return Err(format!("unexpected representation: {rendered}"));
    }
    Ok(())
}
