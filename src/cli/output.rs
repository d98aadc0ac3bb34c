//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_batch_report, format_failure_line};
use crate::error::ApiError;

/// Map domain/service errors to a string for CLI output.
/// An aborted batch lists the per-path failures reported before the abort.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::BatchAborted(aborted) => {
            let mut lines: Vec<String> = aborted
                .report
                .failures()
                .filter_map(|o| o.failure().map(|f| format_failure_line(o.path(), f)))
                .collect();
            lines.push(e.to_string());
            lines.join("\n")
        }
        _ => e.to_string(),
    }
}

/// Stdout for an aborted `new`: the report gathered before the abort, in the
/// command's format. `None` when there is nothing to print.
pub fn aborted_output(e: &ApiError, command: &Commands) -> Option<String> {
    let (ApiError::BatchAborted(aborted), Commands::New { format, .. }) = (e, command) else {
        return None;
    };
    format_batch_report(&aborted.report, format)
        .ok()
        .filter(|text| !text.is_empty())
}
