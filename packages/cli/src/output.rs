//! Terminal rendering of submission results and the matching exit codes.

use std::io::{self, Write};

use common::ValidationReport;
use console::style;

use crate::client::{ClientError, Outcome};

/// The form was not sent because a field is missing or invalid.
pub const EXIT_INVALID: u8 = 2;
/// An error message was shown.
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_SUCCESS: u8 = 0;

/// Exit code for a resolved submission.
pub fn exit_code(result: &Result<Outcome, ClientError>) -> u8 {
    match result {
        Ok(Outcome::Navigate { .. }) | Ok(Outcome::Message { ok: true, .. }) => EXIT_SUCCESS,
        Err(ClientError::Invalid(_)) => EXIT_INVALID,
        Ok(Outcome::Message { ok: false, .. }) | Err(_) => EXIT_FAILURE,
    }
}

/// Name error inline, then one `alert:` line per remaining failure.
pub fn write_report(err: &mut impl Write, report: &ValidationReport) -> io::Result<()> {
    if let Some(error) = &report.name_error {
        writeln!(err, "{} {}", style("name:").red().bold(), style(error).red())?;
    }
    for alert in &report.alerts {
        writeln!(err, "{} {}", style("alert:").yellow().bold(), alert)?;
    }
    Ok(())
}

/// Successes go to `out`, failure messages to `err`.
pub fn write_outcome(
    out: &mut impl Write,
    err: &mut impl Write,
    server: &str,
    outcome: &Outcome,
) -> io::Result<()> {
    match outcome {
        Outcome::Navigate { location, preview } => {
            writeln!(
                out,
                "{} {}{}",
                style("→").green(),
                server.trim_end_matches('/'),
                location
            )?;
            if let Some(preview) = preview {
                writeln!(
                    out,
                    "Schedule for {} (grade {}):",
                    style(&preview.name).bold(),
                    preview.grade
                )?;
                for line in preview.schedule.lines() {
                    writeln!(out, "    {line}")?;
                }
                writeln!(out, "{} {}", style("image hash:").dim(), preview.image_hash)?;
            }
        }
        Outcome::Message { text, ok: true } => writeln!(out, "{}", style(text).green())?,
        Outcome::Message { text, ok: false } => writeln!(err, "{}", style(text).red())?,
    }
    Ok(())
}
