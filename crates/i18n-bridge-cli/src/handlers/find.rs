//! Find command handler

use crate::cli::FindArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use i18n_bridge::Engine;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct FindResult<'a> {
    query: &'a str,
    result: String,
}

/// Handle the find command
pub fn handle_find(args: FindArgs, engine: &Engine, output: &mut OutputWriter) -> Result<()> {
    let result = engine.find(&args.query)?;

    if !output.is_human() {
        return output.data(&FindResult {
            query: &args.query,
            result,
        });
    }
    if result.is_empty() {
        return output.info(&format!("No entries match '{}'", args.query));
    }
    output.write(&result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CatalogArgs, OutputFormat};
    use crate::test_support::{capture, german_engine};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn args(query: &str) -> FindArgs {
        FindArgs {
            query: query.to_string(),
            catalog: CatalogArgs {
                catalog: PathBuf::from("de.txt"),
                lenient: false,
            },
        }
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let (_dir, _path, engine) = german_engine();
        let (mut out, captured) = capture(OutputFormat::Human);
        handle_find(args("HALLO"), &engine, &mut out).unwrap();
        assert_eq!(captured.text(), "greeting: Hallo Welt\n");
    }

    #[test]
    fn test_no_match_message() {
        let (_dir, _path, engine) = german_engine();
        let (mut out, captured) = capture(OutputFormat::Human);
        handle_find(args("zebra"), &engine, &mut out).unwrap();
        assert_eq!(captured.text(), "INFO: No entries match 'zebra'\n");
    }

    #[test]
    fn test_json_keeps_empty_result() {
        let (_dir, _path, engine) = german_engine();
        let (mut out, captured) = capture(OutputFormat::Json);
        handle_find(args("zebra"), &engine, &mut out).unwrap();
        assert_eq!(captured.text(), "{\"query\":\"zebra\",\"result\":\"\"}\n");
    }
}
