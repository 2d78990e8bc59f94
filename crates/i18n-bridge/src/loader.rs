//! Engine library resolution
//!
//! Maps a short engine name such as `i18n_engine` to a concrete shared
//! library path, following platform naming conventions:
//! - Linux: `lib{name}.so`
//! - macOS: `lib{name}.dylib` or `lib{name}.so`
//! - Windows: `{name}.dll`

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::error::{LibraryError, Result};
use crate::symbols::EngineLibrary;

/// Locates the engine library across a list of search directories
#[derive(Debug, Clone)]
pub struct LibraryLocator {
    search_paths: Vec<PathBuf>,
}

impl LibraryLocator {
    /// Create a locator with the current directory and system library paths
    pub fn new() -> Self {
        Self {
            search_paths: Self::default_search_paths(),
        }
    }

    /// Create a locator honoring a configuration's extra search paths.
    ///
    /// Configured directories are searched after the current directory and
    /// before the system directories.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut locator = Self::new();
        let at = usize::from(std::env::current_dir().is_ok()).min(locator.search_paths.len());
        locator
            .search_paths
            .splice(at..at, config.search_paths.iter().cloned());
        locator
    }

    fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        #[cfg(target_os = "linux")]
        {
            paths.push(PathBuf::from("/usr/local/lib"));
            paths.push(PathBuf::from("/usr/lib"));
            if cfg!(target_pointer_width = "64") {
                paths.push(PathBuf::from("/usr/lib64"));
            }
        }

        #[cfg(target_os = "macos")]
        {
            paths.push(PathBuf::from("/usr/local/lib"));
            paths.push(PathBuf::from("/opt/homebrew/lib"));
        }

        if let Ok(cwd) = std::env::current_dir() {
            paths.insert(0, cwd);
        }

        paths
    }

    /// Platform file names to try for a short library name, in priority order
    pub fn candidate_file_names(name: &str) -> Vec<String> {
        let extensions: &[&str] = if cfg!(target_os = "windows") {
            &["dll"]
        } else if cfg!(target_os = "macos") {
            &["dylib", "so"]
        } else {
            &["so"]
        };
        let prefixes: &[&str] = if cfg!(target_os = "windows") {
            &["", "lib"]
        } else {
            &["lib", ""]
        };

        let mut names = Vec::new();
        for prefix in prefixes {
            for ext in extensions {
                names.push(format!("{}{}.{}", prefix, name, ext));
            }
        }
        names
    }

    /// Find the first existing candidate for `name` in the search paths
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let direct = Path::new(name);
        if direct.is_absolute() && direct.exists() {
            return Some(direct.to_path_buf());
        }

        let candidates = Self::candidate_file_names(name);
        for dir in &self.search_paths {
            for file_name in &candidates {
                let full_path = dir.join(file_name);
                trace!(path = %full_path.display(), "Probing engine library candidate");
                if full_path.exists() {
                    return Some(full_path);
                }
            }
        }
        None
    }

    /// Prepend a search directory
    pub fn add_search_path(&mut self, path: PathBuf) {
        self.search_paths.insert(0, path);
    }

    /// Directories searched, in order
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}

impl Default for LibraryLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Open the engine library described by `config`.
///
/// An explicit `library` path is used as-is. Otherwise the short name is
/// resolved through the search paths; when nothing matches, the bare platform
/// file name is handed to the system loader so `LD_LIBRARY_PATH` and friends
/// still apply.
pub fn open_library(config: &EngineConfig) -> Result<EngineLibrary> {
    if let Some(path) = &config.library {
        debug!(path = %path.display(), "Opening engine library from explicit path");
        return EngineLibrary::open(path);
    }

    let locator = LibraryLocator::from_config(config);
    if let Some(path) = locator.resolve(&config.library_name) {
        debug!(path = %path.display(), "Resolved engine library");
        return EngineLibrary::open(path);
    }

    let fallback = LibraryLocator::candidate_file_names(&config.library_name)
        .into_iter()
        .next()
        .ok_or_else(|| LibraryError::NotFound {
            name: config.library_name.clone(),
            searched: locator.search_paths().len(),
        })?;
    debug!(file = %fallback, "Deferring engine library lookup to the system loader");
    EngineLibrary::open(&fallback).map_err(|_| {
        LibraryError::NotFound {
            name: config.library_name.clone(),
            searched: locator.search_paths().len(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_current_dir_is_searched_first() {
        let locator = LibraryLocator::new();
        if let Ok(cwd) = std::env::current_dir() {
            assert_eq!(locator.search_paths()[0], cwd);
        }
    }

    #[test]
    fn test_configured_paths_follow_current_dir() {
        let config = EngineConfig {
            search_paths: vec![PathBuf::from("/opt/a"), PathBuf::from("/opt/b")],
            ..EngineConfig::default()
        };
        let locator = LibraryLocator::from_config(&config);
        let paths = locator.search_paths();
        assert_eq!(paths[1], PathBuf::from("/opt/a"));
        assert_eq!(paths[2], PathBuf::from("/opt/b"));
    }

    #[test]
    fn test_candidate_names_use_platform_convention() {
        let names = LibraryLocator::candidate_file_names("i18n_engine");
        #[cfg(target_os = "linux")]
        assert_eq!(names[0], "libi18n_engine.so");
        #[cfg(target_os = "windows")]
        assert_eq!(names[0], "i18n_engine.dll");
        #[cfg(target_os = "macos")]
        assert_eq!(names[0], "libi18n_engine.dylib");
    }

    #[test]
    fn test_resolve_finds_library_in_added_path() {
        let dir = tempfile::tempdir().unwrap();
        let file_name = LibraryLocator::candidate_file_names("fake_engine")[0].clone();
        std::fs::write(dir.path().join(&file_name), b"not really a library").unwrap();

        let mut locator = LibraryLocator::new();
        locator.add_search_path(dir.path().to_path_buf());
        assert_eq!(locator.resolve("fake_engine"), Some(dir.path().join(file_name)));
    }

    #[test]
    fn test_unresolvable_name_reports_not_found() {
        let config = EngineConfig {
            library_name: "definitely_not_an_engine_xyz".to_string(),
            ..EngineConfig::default()
        };
        let result = open_library(&config);
        assert!(matches!(
            result,
            Err(Error::Library(LibraryError::NotFound { .. }))
        ));
    }
}
