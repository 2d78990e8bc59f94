//! Engine facade behavior against the fake engine

mod common;

use common::{catalog_file, fake_engine, german_engine, GERMAN};
use i18n_bridge::{CheckStatus, Error, PluralRule, NO_ARGS};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_load_then_translate_returns_stored_text() {
    let (_dir, engine) = german_engine();
    assert_eq!(engine.translate("greeting", NO_ARGS).unwrap(), "Hallo Welt");
    assert_eq!(
        engine.translate("welcome", ["Ada", "Lovelace"]).unwrap(),
        "Willkommen, Ada Lovelace!"
    );
}

#[test]
fn test_missing_token_carries_error_record() {
    let (_dir, engine) = german_engine();
    match engine.translate("missing.key", NO_ARGS) {
        Err(Error::TranslationFailed { token, detail }) => {
            assert_eq!(token, "missing.key");
            assert_eq!(detail.as_deref(), Some("unknown token 'missing.key'"));
        }
        other => panic!("expected TranslationFailed, got {:?}", other),
    }
}

#[test]
fn test_absent_arguments_are_empty_strings() {
    let (_dir, engine) = german_engine();
    let text = engine.translate("welcome", [Some("Ada"), None]).unwrap();
    assert_eq!(text, "Willkommen, Ada !");
}

#[test]
fn test_plural_forms() {
    let (_dir, engine) = german_engine();
    assert_eq!(engine.translate_plural("apples", 0, NO_ARGS).unwrap(), "keine Äpfel");
    assert_eq!(engine.translate_plural("apples", 1, NO_ARGS).unwrap(), "ein Apfel");
    assert_eq!(engine.translate_plural("apples", 5, ["5"]).unwrap(), "5 Äpfel");
    assert!(matches!(
        engine.translate_plural("pears", 2, NO_ARGS),
        Err(Error::TranslationFailed { .. })
    ));
}

#[test]
fn test_metadata_snapshot() {
    let (_dir, engine) = german_engine();
    let meta = engine.metadata().unwrap();
    assert_eq!(meta.locale, "de-DE");
    assert_eq!(meta.fallback, "en");
    assert_eq!(meta.note, "reviewed");
    assert_eq!(meta.plural_rule, PluralRule::Default);

    assert_eq!(engine.locale().unwrap(), "de-DE");
    assert_eq!(engine.fallback().unwrap(), "en");
    assert_eq!(engine.note().unwrap(), "reviewed");
}

#[test]
fn test_metadata_is_not_cached() {
    let engine = fake_engine();
    assert_eq!(engine.metadata().unwrap().locale, "");

    engine.load_str("@locale = pl-PL\n@plural = slavic\nx = y\n", true).unwrap();
    let meta = engine.metadata().unwrap();
    assert_eq!(meta.locale, "pl-PL");
    assert_eq!(meta.plural_rule, PluralRule::Slavic);
}

#[test]
fn test_out_of_domain_plural_rule_is_unknown() {
    let engine = fake_engine();
    engine.load_str("@plural = 99\nx = y\n", true).unwrap();
    assert_eq!(engine.plural_rule().unwrap(), PluralRule::Unknown);
    assert_eq!(engine.metadata().unwrap().plural_rule, PluralRule::Unknown);
}

#[test]
fn test_strict_load_failure_carries_detail() {
    let (_dir, path) = catalog_file("broken.txt", "a = 1\na = 2\n");
    let engine = fake_engine();

    match engine.load_file(&path, true) {
        Err(Error::LoadFailed {
            source_name,
            detail,
        }) => {
            assert!(source_name.ends_with("broken.txt"));
            assert_eq!(detail.as_deref(), Some("line 2: duplicate token 'a'"));
        }
        other => panic!("expected LoadFailed, got {:?}", other),
    }

    // lenient mode accepts the same file
    engine.load_file(&path, false).unwrap();
    assert_eq!(engine.translate("a", NO_ARGS).unwrap(), "2");
}

#[test]
fn test_missing_catalog_file() {
    let engine = fake_engine();
    let err = engine.load_file("/nonexistent/dict.txt", true).unwrap_err();
    assert!(matches!(err, Error::LoadFailed { .. }));
    assert!(err.detail().unwrap().starts_with("cannot open /nonexistent/dict.txt"));
}

#[test]
fn test_load_str_failure_names_memory_source() {
    let engine = fake_engine();
    let err = engine.load_str("no equals sign here", true).unwrap_err();
    assert!(matches!(
        &err,
        Error::LoadFailed { source_name, .. } if source_name == "<memory>"
    ));
}

#[test]
fn test_reload_picks_up_file_changes() {
    let (_dir, path) = catalog_file("dict.txt", GERMAN);
    let engine = fake_engine();
    engine.load_file(&path, true).unwrap();

    std::fs::write(&path, "greeting = Servus\n").unwrap();
    assert_eq!(engine.translate("greeting", NO_ARGS).unwrap(), "Hallo Welt");
    engine.reload().unwrap();
    assert_eq!(engine.translate("greeting", NO_ARGS).unwrap(), "Servus");
}

#[test]
fn test_reload_without_file() {
    let engine = fake_engine();
    let err = engine.reload().unwrap_err();
    assert_eq!(err.detail(), Some("no catalog file loaded"));
}

#[test]
fn test_export_binary() {
    let (dir, engine) = german_engine();
    let target = dir.path().join("dict.bin");
    engine.export_binary(&target).unwrap();
    assert!(std::fs::metadata(&target).unwrap().len() > 0);

    let empty = fake_engine();
    match empty.export_binary(dir.path().join("empty.bin")) {
        Err(Error::ExportFailed { path, detail }) => {
            assert!(path.ends_with("empty.bin"));
            assert_eq!(detail.as_deref(), Some("catalog is empty"));
        }
        other => panic!("expected ExportFailed, got {:?}", other),
    }
}

#[test]
fn test_dump_and_find() {
    let (_dir, engine) = german_engine();
    let table = engine.dump().unwrap();
    assert!(table.contains("greeting"));
    assert!(table.contains("Hallo Welt"));

    let hits = engine.find("WELT").unwrap();
    assert_eq!(hits, "greeting: Hallo Welt\n");
    assert_eq!(engine.find("nothing like this").unwrap(), "");
}

#[test]
fn test_check_statuses() {
    let engine = fake_engine();
    let report = engine.check().unwrap();
    assert_eq!(report.status, CheckStatus::Failed);
    assert!(report.report.starts_with("CHECK: FAIL"));

    engine.load_str("a = %0 then %2\n", true).unwrap();
    let report = engine.check().unwrap();
    assert_eq!(report.status, CheckStatus::Warnings);
    assert!(report.report.contains("WARN a"));

    engine.load_str("a = fine %0\n", true).unwrap();
    assert_eq!(engine.check().unwrap().status, CheckStatus::Ok);
}

#[test]
fn test_check_report_larger_than_initial_buffer() {
    let engine = fake_engine();
    let catalog: String = (0..400)
        .map(|i| format!("token_{:04} = first %0 then %3\n", i))
        .collect();
    engine.load_str(&catalog, true).unwrap();

    let report = engine.check().unwrap();
    assert_eq!(report.status, CheckStatus::Warnings);
    assert!(report.report.len() > 4096);
    assert!(report.report.contains("WARN token_0000"));
    assert!(report.report.contains("WARN token_0399"));
    assert!(report.report.ends_with("warnings: 400, errors: 0\n"));
}

#[test]
fn test_last_error_reads_current_record() {
    let (_dir, engine) = german_engine();
    assert_eq!(engine.last_error().unwrap(), None);

    let _ = engine.translate("missing.key", NO_ARGS);
    assert_eq!(
        engine.last_error().unwrap().as_deref(),
        Some("unknown token 'missing.key'")
    );
}

#[test]
fn test_versions() {
    let engine = fake_engine();
    let versions = engine.versions();
    assert_eq!(versions.abi, Some(1));
    assert_eq!(versions.binary_format_max, Some(2));
    assert_eq!(engine.library_path(), None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_translate_is_idempotent(
        first in "[A-Za-zÄÖÜäöü0-9 ]{0,16}",
        second in "[A-Za-z0-9%.]{0,16}",
    ) {
        let (_dir, engine) = german_engine();
        let once = engine.translate("welcome", [first.as_str(), second.as_str()]).unwrap();
        let twice = engine.translate("welcome", [first.as_str(), second.as_str()]).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once, format!("Willkommen, {} {}!", first, second));
    }
}
