// Tests for output formatting
//
// Human renderings are checked line by line; machine formats are parsed back
// to make sure they stay valid documents.

use super::*;
use i18n_bridge::PluralRule;
use pretty_assertions::assert_eq;
use crate::test_support::capture;

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, crate::test_support::Captured) {
    if !quiet {
        return capture(format);
    }
    let captured = crate::test_support::Captured::default();
    let writer = OutputWriter::with_writer(format, false, true, Box::new(captured.clone()));
    (writer, captured)
}

fn german_metadata() -> MetadataSnapshot {
    MetadataSnapshot {
        locale: "de-DE".to_string(),
        fallback: "en".to_string(),
        note: String::new(),
        plural_rule: PluralRule::Default,
    }
}

#[test]
fn test_metadata_human() {
    let (mut out, captured) = writer(OutputFormat::Human, false);
    out.metadata(&german_metadata()).unwrap();
    assert_eq!(
        captured.text(),
        "Locale:      de-DE\nFallback:    en\nNote:        -\nPlural rule: default\n"
    );
}

#[test]
fn test_metadata_json() {
    let (mut out, captured) = writer(OutputFormat::Json, false);
    out.metadata(&german_metadata()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&captured.text()).unwrap();
    assert_eq!(value["locale"], "de-DE");
    assert_eq!(value["plural_rule"], "default");
}

#[test]
fn test_metadata_yaml() {
    let (mut out, captured) = writer(OutputFormat::Yaml, false);
    out.metadata(&german_metadata()).unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(&captured.text()).unwrap();
    assert_eq!(value["fallback"].as_str(), Some("en"));
}

#[test]
fn test_check_report_human_verdicts() {
    let cases = [
        (CheckStatus::Ok, "✓ Catalog check passed"),
        (CheckStatus::Warnings, "⚠ Catalog check passed with warnings"),
        (CheckStatus::Failed, "✗ Catalog check failed"),
        (CheckStatus::Other(9), "? Catalog check returned unknown status 9"),
    ];
    for (status, verdict) in cases {
        let report = CheckReport {
            status,
            report: "CHECK: REPORT\nwarnings: 0, errors: 0".to_string(),
        };
        let formatted = format_check_report_human(&report);
        assert!(formatted.starts_with("CHECK: REPORT\nwarnings: 0, errors: 0\n"));
        assert!(formatted.ends_with(&format!("{}\n", verdict)));
    }
}

#[test]
fn test_check_report_pretty_json() {
    let (mut out, captured) = writer(OutputFormat::JsonPretty, false);
    out.check_report(&CheckReport {
        status: CheckStatus::Failed,
        report: "CHECK: FAIL\nno catalog loaded\n".to_string(),
    })
    .unwrap();
    let text = captured.text();
    assert!(text.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["status"], "failed");
    assert_eq!(value["report"], "CHECK: FAIL\nno catalog loaded\n");
}

#[test]
fn test_engine_info_human() {
    let info = EngineInfo {
        bridge_version: "0.1.0".to_string(),
        library: None,
        abi_version: Some(1),
        binary_format_max: None,
    };
    let formatted = format_engine_info_human(&info);
    assert!(formatted.contains("Engine library:     (in-process)"));
    assert!(formatted.contains("ABI version:        1"));
    assert!(formatted.contains("Binary format max:  not reported"));
}

#[test]
fn test_quiet_suppresses_messages_but_not_data() {
    let (mut out, captured) = writer(OutputFormat::Human, true);
    out.info("loading").unwrap();
    out.success("done").unwrap();
    out.section("Report").unwrap();
    out.data(&"payload").unwrap();
    assert_eq!(captured.text(), "\"payload\"\n");
}

#[test]
fn test_machine_formats_skip_messages() {
    let (mut out, captured) = writer(OutputFormat::Json, false);
    out.info("loading").unwrap();
    out.warning("careful").unwrap();
    assert_eq!(captured.text(), "");
}

#[test]
fn test_plain_messages_without_color() {
    let (mut out, captured) = writer(OutputFormat::Human, false);
    out.info("loading").unwrap();
    out.warning("careful").unwrap();
    out.section("Report").unwrap();
    assert_eq!(
        captured.text(),
        "INFO: loading\nWARNING: careful\n=== Report ===\n"
    );
}
