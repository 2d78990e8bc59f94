//! Export command handler

use crate::cli::ExportArgs;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use i18n_bridge::Engine;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ExportSummary<'a> {
    path: &'a Path,
    bytes: u64,
}

/// Handle the export command
pub fn handle_export(args: ExportArgs, engine: &Engine, output: &mut OutputWriter) -> Result<()> {
    let destination = args.destination.as_path();
    if destination.exists() {
        if !args.force {
            return Err(Error::invalid_args(format!(
                "{} already exists; pass --force to overwrite it",
                destination.display()
            )));
        }
        output.warning(&format!("Overwriting {}", destination.display()))?;
    }

    engine.export_binary(destination)?;
    let bytes = std::fs::metadata(destination)?.len();

    if output.is_human() {
        return output.success(&format!(
            "✓ Exported binary catalog to {} ({} bytes)",
            destination.display(),
            bytes
        ));
    }
    output.data(&ExportSummary {
        path: destination,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CatalogArgs, OutputFormat};
    use crate::test_support::{capture, fake_engine, german_engine};
    use std::path::PathBuf;

    fn args(destination: PathBuf, force: bool) -> ExportArgs {
        ExportArgs {
            destination,
            force,
            catalog: CatalogArgs {
                catalog: PathBuf::from("de.txt"),
                lenient: false,
            },
        }
    }

    #[test]
    fn test_export_writes_file() {
        let (dir, _path, engine) = german_engine();
        let target = dir.path().join("de.bin");
        let (mut out, captured) = capture(OutputFormat::Json);

        handle_export(args(target.clone(), false), &engine, &mut out).unwrap();

        let written = std::fs::read(&target).unwrap();
        assert!(written.starts_with(b"I18B"));
        let value: serde_json::Value = serde_json::from_str(&captured.text()).unwrap();
        assert_eq!(value["bytes"].as_u64(), Some(written.len() as u64));
    }

    #[test]
    fn test_existing_file_needs_force() {
        let (dir, _path, engine) = german_engine();
        let target = dir.path().join("de.bin");
        std::fs::write(&target, b"old").unwrap();
        let (mut out, _captured) = capture(OutputFormat::Human);

        let err = handle_export(args(target.clone(), false), &engine, &mut out).unwrap_err();
        assert!(err.should_show_help());
        assert_eq!(std::fs::read(&target).unwrap(), b"old");

        handle_export(args(target.clone(), true), &engine, &mut out).unwrap();
        assert!(std::fs::read(&target).unwrap().starts_with(b"I18B"));
    }

    #[test]
    fn test_empty_catalog_reports_engine_detail() {
        let engine = fake_engine();
        let dir = tempfile::tempdir().unwrap();
        let (mut out, _captured) = capture(OutputFormat::Human);

        let err = handle_export(args(dir.path().join("x.bin"), false), &engine, &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Engine(i18n_bridge::Error::ExportFailed { .. })
        ));
        assert!(err.to_string().ends_with("catalog is empty"));
    }
}
