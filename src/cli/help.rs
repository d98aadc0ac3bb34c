//! CLI command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string for log records (e.g. "new", "complete").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::New { .. } => "new",
        Commands::Complete { .. } => "complete",
        Commands::Params { .. } => "params",
        Commands::Drives { .. } => "drives",
        Commands::Show { .. } => "show",
        Commands::NewItem { .. } => "new-item",
    }
}
