//! Meta command handler

use crate::cli::MetaArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use i18n_bridge::Engine;

/// Handle the meta command
pub fn handle_meta(_args: MetaArgs, engine: &Engine, output: &mut OutputWriter) -> Result<()> {
    let metadata = engine.metadata()?;
    output.metadata(&metadata)
}
