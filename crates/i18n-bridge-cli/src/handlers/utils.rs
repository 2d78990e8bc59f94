//! Shared utilities for command handlers

use crate::cli::CatalogArgs;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use i18n_bridge::{Engine, EngineConfig};
use tracing::info;

/// Open the engine library described by `config`
pub fn open_engine(config: &EngineConfig) -> Result<Engine> {
    let _timer = Timer::new("open_engine");
    let engine = Engine::open(config)?;
    info!(library = ?engine.library_path(), "Engine opened");
    Ok(engine)
}

/// Load the catalog named on the command line into `engine`
pub fn load_catalog(engine: &Engine, args: &CatalogArgs) -> Result<()> {
    if !args.catalog.exists() {
        return Err(Error::FileNotFound {
            path: args.catalog.clone(),
        });
    }

    let _timer = Timer::with_details("load_catalog", &args.catalog.display().to_string());
    engine.load_file(&args.catalog, args.strict())?;
    info!(catalog = %args.catalog.display(), strict = args.strict(), "Catalog loaded");
    Ok(())
}

/// Open the engine and load the command's catalog
pub fn open_with_catalog(config: &EngineConfig, args: &CatalogArgs) -> Result<Engine> {
    if !args.catalog.exists() {
        return Err(Error::FileNotFound {
            path: args.catalog.clone(),
        });
    }
    let engine = open_engine(config)?;
    load_catalog(&engine, args)?;
    Ok(engine)
}
