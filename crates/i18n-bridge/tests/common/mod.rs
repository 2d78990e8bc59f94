//! Shared test support for i18n-bridge integration tests

#![allow(dead_code)]

use i18n_bridge::{Engine, EngineConfig, EngineLibrary, EngineSymbols};
use i18n_engine_fake as fake;
use std::path::PathBuf;
use tempfile::TempDir;

/// Symbol table pointing at the in-process fake engine
pub fn fake_symbols() -> EngineSymbols {
    EngineSymbols {
        create: fake::i18n_new,
        free: fake::i18n_free,
        load_file: fake::i18n_load_txt_file,
        translate: fake::i18n_translate,
        translate_plural: fake::i18n_translate_plural,
        export_binary: fake::i18n_export_binary,
        last_error_copy: fake::i18n_last_error_copy,
        meta_locale_copy: fake::i18n_get_meta_locale_copy,
        meta_fallback_copy: fake::i18n_get_meta_fallback_copy,
        meta_note_copy: fake::i18n_get_meta_note_copy,
        meta_plural_rule: fake::i18n_get_meta_plural_rule,
        load_text: Some(fake::i18n_load_txt),
        reload: Some(fake::i18n_reload),
        print: Some(fake::i18n_print),
        find: Some(fake::i18n_find),
        check: Some(fake::i18n_check),
        abi_version: Some(fake::i18n_abi_version),
        binary_version_max: Some(fake::i18n_binary_version_supported_max),
    }
}

/// Open an engine on the given symbol table
pub fn engine_with(symbols: EngineSymbols, config: &EngineConfig) -> i18n_bridge::Result<Engine> {
    let library = unsafe { EngineLibrary::from_symbols(symbols) };
    Engine::with_library(library, config)
}

/// Open an engine on the fake with default configuration
pub fn fake_engine() -> Engine {
    engine_with(fake_symbols(), &EngineConfig::default()).unwrap()
}

/// German sample catalog
pub const GERMAN: &str = "\
# Beispielkatalog
@locale = de-DE
@fallback = en
@note = reviewed
@plural = default
greeting = Hallo Welt
welcome = Willkommen, %0 %1!
apples{zero} = keine Äpfel
apples{one} = ein Apfel
apples{other} = %0 Äpfel
";

/// Write `contents` to a file in a fresh temp dir
pub fn catalog_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

/// Engine with [`GERMAN`] loaded from `dict.txt`
pub fn german_engine() -> (TempDir, Engine) {
    let (dir, path) = catalog_file("dict.txt", GERMAN);
    let engine = fake_engine();
    engine.load_file(&path, true).unwrap();
    (dir, engine)
}
