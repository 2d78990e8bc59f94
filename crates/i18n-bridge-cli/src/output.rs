//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) with specialized
//! human renderings for catalog metadata, check reports and engine info.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use i18n_bridge::{CheckReport, CheckStatus, MetadataSnapshot};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, trace};

/// Engine information printed by `i18nctl info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineInfo {
    /// Version of the binding this tool was built with
    pub bridge_version: String,
    /// Library the engine was loaded from, if known
    pub library: Option<PathBuf>,
    /// C ABI version reported by the engine
    pub abi_version: Option<u32>,
    /// Newest binary catalog format the engine reads
    pub binary_format_max: Option<u32>,
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format catalog metadata
    fn format_metadata(&self, metadata: &MetadataSnapshot) -> Result<String>;

    /// Format a catalog check report
    fn format_check_report(&self, report: &CheckReport) -> Result<String>;

    /// Format engine information
    fn format_engine_info(&self, info: &EngineInfo) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_metadata(&self, metadata: &MetadataSnapshot) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_metadata_human(metadata)),
            _ => self.format(metadata),
        }
    }

    fn format_check_report(&self, report: &CheckReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_check_report_human(report)),
            _ => self.format(report),
        }
    }

    fn format_engine_info(&self, info: &EngineInfo) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_engine_info_human(info)),
            _ => self.format(info),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Whether results should be rendered for people rather than programs
    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.format == OutputFormat::Yaml {
            // serde_yaml already ends documents with a newline
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write catalog metadata
    pub fn metadata(&mut self, metadata: &MetadataSnapshot) -> Result<()> {
        let formatted = self.format.format_metadata(metadata)?;
        self.finish_block(&formatted)
    }

    /// Write a check report
    pub fn check_report(&mut self, report: &CheckReport) -> Result<()> {
        let formatted = self.format.format_check_report(report)?;
        if self.use_color && self.is_human() {
            return self.finish_block(&colorize_check_report(&formatted));
        }
        self.finish_block(&formatted)
    }

    /// Write engine information
    pub fn engine_info(&mut self, info: &EngineInfo) -> Result<()> {
        let formatted = self.format.format_engine_info(info)?;
        self.finish_block(&formatted)
    }

    fn finish_block(&mut self, formatted: &str) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(formatted)
        } else {
            self.writeln(formatted)
        }
    }
}

fn format_metadata_human(metadata: &MetadataSnapshot) -> String {
    let mut output = String::new();
    output.push_str(&format!("Locale:      {}\n", or_dash(&metadata.locale)));
    output.push_str(&format!("Fallback:    {}\n", or_dash(&metadata.fallback)));
    output.push_str(&format!("Note:        {}\n", or_dash(&metadata.note)));
    output.push_str(&format!("Plural rule: {}\n", metadata.plural_rule));
    output
}

fn format_check_report_human(report: &CheckReport) -> String {
    let mut output = String::new();
    output.push_str(&report.report);
    if !report.report.is_empty() && !report.report.ends_with('\n') {
        output.push('\n');
    }
    let verdict = match report.status {
        CheckStatus::Ok => "✓ Catalog check passed".to_string(),
        CheckStatus::Warnings => "⚠ Catalog check passed with warnings".to_string(),
        CheckStatus::Failed => "✗ Catalog check failed".to_string(),
        CheckStatus::Other(code) => format!("? Catalog check returned unknown status {}", code),
    };
    output.push_str(&verdict);
    output.push('\n');
    output
}

fn colorize_check_report(formatted: &str) -> String {
    formatted
        .lines()
        .map(|line| {
            if line.starts_with("ERROR") || line.starts_with('✗') {
                line.red().to_string()
            } else if line.starts_with("WARN") || line.starts_with('⚠') {
                line.yellow().to_string()
            } else if line.starts_with('✓') {
                line.green().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_engine_info_human(info: &EngineInfo) -> String {
    let version = |v: Option<u32>| v.map_or_else(|| "not reported".to_string(), |v| v.to_string());

    let mut output = String::new();
    output.push_str(&format!("i18n-bridge:        {}\n", info.bridge_version));
    output.push_str(&format!(
        "Engine library:     {}\n",
        info.library
            .as_ref()
            .map_or_else(|| "(in-process)".to_string(), |p| p.display().to_string())
    ));
    output.push_str(&format!("ABI version:        {}\n", version(info.abi_version)));
    output.push_str(&format!("Binary format max:  {}\n", version(info.binary_format_max)));
    output
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
