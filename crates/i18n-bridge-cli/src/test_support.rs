//! Shared helpers for handler and output tests

use crate::cli::OutputFormat;
use crate::output::OutputWriter;
use i18n_bridge::{Engine, EngineConfig, EngineLibrary, EngineSymbols};
use i18n_engine_fake as fake;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// In-memory sink whose contents can be read after the writer is dropped
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Uncolored writer capturing everything it prints
pub fn capture(format: OutputFormat) -> (OutputWriter, Captured) {
    let captured = Captured::default();
    let writer = OutputWriter::with_writer(format, false, false, Box::new(captured.clone()));
    (writer, captured)
}

pub const GERMAN: &str = "\
@locale = de-DE
@fallback = en
@note = reviewed
@plural = default
greeting = Hallo Welt
welcome = Willkommen, %0 %1!
apples{zero} = keine Äpfel
apples{one} = ein Apfel
apples{other} = %0 Äpfel
broken = %0 und %2
";

/// Write `contents` to a file in a fresh temp dir
pub fn catalog_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

/// Engine backed by the in-process fake
pub fn fake_engine() -> Engine {
    let symbols = EngineSymbols {
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
    };
    let library = unsafe { EngineLibrary::from_symbols(symbols) };
    Engine::with_library(library, &EngineConfig::default()).unwrap()
}

/// Fake engine with [`GERMAN`] loaded; keep the dir alive while using it
pub fn german_engine() -> (TempDir, PathBuf, Engine) {
    let (dir, path) = catalog_file("de.txt", GERMAN);
    let engine = fake_engine();
    engine.load_file(&path, true).unwrap();
    (dir, path, engine)
}
