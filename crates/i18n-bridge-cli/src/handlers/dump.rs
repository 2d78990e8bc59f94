//! Dump command handler

use crate::cli::DumpArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use i18n_bridge::Engine;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Dump {
    dump: String,
}

/// Handle the dump command
pub fn handle_dump(_args: DumpArgs, engine: &Engine, output: &mut OutputWriter) -> Result<()> {
    let dump = engine.dump()?;
    if output.is_human() {
        return output.write(&dump);
    }
    output.data(&Dump { dump })
}
