//! Check command handler

use crate::cli::CheckArgs;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use i18n_bridge::{CheckStatus, Engine};
use tracing::info;

/// Handle the check command.
///
/// The report is always printed; a failed check (or warnings under
/// `--deny-warnings`) then becomes [`Error::CheckFailed`].
pub fn handle_check(args: CheckArgs, engine: &Engine, output: &mut OutputWriter) -> Result<()> {
    let report = engine.check()?;
    info!(status = %report.status, "Catalog check finished");

    output.section("Catalog check")?;
    output.check_report(&report)?;

    let passed = match report.status {
        CheckStatus::Warnings => !args.deny_warnings,
        status => status.passed(),
    };
    if passed {
        Ok(())
    } else {
        Err(Error::CheckFailed {
            status: report.status,
        })
    }
}
