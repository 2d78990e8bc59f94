//! Engine configuration
//!
//! Describes where the engine library lives and the limits applied to data
//! coming back across the boundary. Values come from defaults, an optional
//! config file section (deserialized by the host) and environment overrides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Result cap used by the reference engine (16 MiB)
pub const DEFAULT_MAX_RESULT_BYTES: usize = 16 * 1024 * 1024;

/// ABI version this binding was written against
pub const SUPPORTED_ABI_VERSION: u32 = 1;

/// Configuration for opening an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Explicit path to the engine shared library
    pub library: Option<PathBuf>,

    /// Short library name resolved through the search paths
    pub library_name: String,

    /// Extra directories to search for the library
    pub search_paths: Vec<PathBuf>,

    /// ABI version the engine must report, if it exports `i18n_abi_version`
    pub expected_abi_version: Option<u32>,

    /// Largest result the negotiator will allocate for
    pub max_result_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            library: None,
            library_name: "i18n_engine".to_string(),
            search_paths: Vec::new(),
            expected_abi_version: Some(SUPPORTED_ABI_VERSION),
            max_result_bytes: DEFAULT_MAX_RESULT_BYTES,
        }
    }
}

impl EngineConfig {
    /// Apply environment overrides
    ///
    /// - `I18N_ENGINE_LIBRARY`: explicit library path
    /// - `I18N_ENGINE_PATH`: extra search directories (platform path list)
    /// - `I18N_ENGINE_MAX_RESULT_BYTES`: result size cap
    pub fn merge_with_env(&mut self) {
        if let Some(library) = std::env::var_os("I18N_ENGINE_LIBRARY") {
            self.library = Some(PathBuf::from(library));
        }

        if let Some(paths) = std::env::var_os("I18N_ENGINE_PATH") {
            self.search_paths.extend(std::env::split_paths(&paths));
        }

        if let Ok(raw) = std::env::var("I18N_ENGINE_MAX_RESULT_BYTES") {
            match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => self.max_result_bytes = limit,
                _ => warn!(value = %raw, "Invalid I18N_ENGINE_MAX_RESULT_BYTES, keeping default"),
            }
        }
    }

    /// Builder-style override of the library path
    pub fn with_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.library = Some(path.into());
        self
    }
}
