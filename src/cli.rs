//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the engines.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{aborted_output, map_error};
pub use parse::{parse_value, Cli, Commands};
pub use presentation::{
    format_batch_report, format_candidates, format_drives, format_dynamic_parameters,
    format_failure_line, format_properties,
};
pub use route::{CommandOutput, RunContext};
