//! Translate command handler

use crate::cli::TranslateArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use i18n_bridge::Engine;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct Translation<'a> {
    token: &'a str,
    args: &'a [String],
    text: String,
}

/// Handle the translate command
pub fn handle_translate(
    args: TranslateArgs,
    engine: &Engine,
    output: &mut OutputWriter,
) -> Result<()> {
    debug!(token = %args.token, arg_count = args.args.len(), "Translating token");
    let text = engine.translate(&args.token, &args.args)?;

    if output.is_human() {
        return output.writeln(&text);
    }
    output.data(&Translation {
        token: &args.token,
        args: &args.args,
        text,
    })
}
