//! Plural command handler

use crate::cli::PluralArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use i18n_bridge::Engine;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct PluralTranslation<'a> {
    token: &'a str,
    count: i32,
    args: &'a [String],
    text: String,
}

/// Handle the plural command
pub fn handle_plural(args: PluralArgs, engine: &Engine, output: &mut OutputWriter) -> Result<()> {
    debug!(token = %args.token, count = args.count, "Translating plural form");
    let text = engine.translate_plural(&args.token, args.count, &args.args)?;

    if output.is_human() {
        return output.writeln(&text);
    }
    output.data(&PluralTranslation {
        token: &args.token,
        count: args.count,
        args: &args.args,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CatalogArgs, OutputFormat};
    use crate::test_support::{capture, german_engine};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn args(count: i32) -> PluralArgs {
        PluralArgs {
            token: "apples".to_string(),
            count,
            args: vec![count.to_string()],
            catalog: CatalogArgs {
                catalog: PathBuf::from("de.txt"),
                lenient: false,
            },
        }
    }

    #[test]
    fn test_variants_follow_count() {
        let (_dir, _path, engine) = german_engine();
        let (mut out, captured) = capture(OutputFormat::Human);
        for count in [0, 1, 7] {
            handle_plural(args(count), &engine, &mut out).unwrap();
        }
        assert_eq!(captured.text(), "keine Äpfel\nein Apfel\n7 Äpfel\n");
    }

    #[test]
    fn test_yaml_output() {
        let (_dir, _path, engine) = german_engine();
        let (mut out, captured) = capture(OutputFormat::Yaml);
        handle_plural(args(3), &engine, &mut out).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&captured.text()).unwrap();
        assert_eq!(value["count"].as_i64(), Some(3));
        assert_eq!(value["text"].as_str(), Some("3 Äpfel"));
    }
}
