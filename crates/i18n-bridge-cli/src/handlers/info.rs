//! Info command handler

use crate::error::Result;
use crate::output::{EngineInfo, OutputWriter};
use i18n_bridge::Engine;

/// Handle the info command
pub fn handle_info(engine: &Engine, output: &mut OutputWriter) -> Result<()> {
    let versions = engine.versions();
    let info = EngineInfo {
        bridge_version: env!("CARGO_PKG_VERSION").to_string(),
        library: engine.library_path().map(|p| p.to_path_buf()),
        abi_version: versions.abi,
        binary_format_max: versions.binary_format_max,
    };
    output.engine_info(&info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::test_support::{capture, fake_engine};

    #[test]
    fn test_info_reports_fake_versions() {
        let engine = fake_engine();
        let (mut out, captured) = capture(OutputFormat::Json);
        handle_info(&engine, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_str(&captured.text()).unwrap();
        assert_eq!(value["abi_version"], 1);
        assert_eq!(value["binary_format_max"], 2);
        assert!(value["library"].is_null());
        assert_eq!(value["bridge_version"], env!("CARGO_PKG_VERSION"));
    }
}
