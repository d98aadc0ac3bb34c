//! CLI parse: clap types for itemprop. No behavior; definitions only.

use crate::types::PropertyValue;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// itemprop - create typed properties on namespace items
#[derive(Parser, Debug)]
#[command(name = "itemprop")]
#[command(about = "Create typed properties on items in provider-backed namespaces")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Namespace state file (overrides namespace.state_file)
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Location relative paths start from (e.g. HKCU:\Software)
    #[arg(long)]
    pub location: Option<String>,

    /// Enable verbose logging (default: off)
    #[arg(long)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a property on every target item
    New {
        /// Target paths; wildcards are expanded
        #[arg(long, num_args = 1.., required_unless_present = "literal_path", conflicts_with = "literal_path")]
        path: Vec<String>,
        /// Target paths taken verbatim
        #[arg(long, num_args = 1.., visible_alias = "lp")]
        literal_path: Vec<String>,
        /// Property name
        #[arg(long)]
        name: String,
        /// Property type, interpreted by the owning provider
        #[arg(long = "type", visible_alias = "property-type")]
        property_type: Option<String>,
        /// Property value (JSON when it parses, otherwise a string)
        #[arg(long)]
        value: Option<String>,
        /// Overwrite an existing property
        #[arg(long)]
        force: bool,
        /// Report what would be created without writing
        #[arg(long)]
        what_if: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List completion candidates for a parameter value
    Complete {
        /// Parameter being completed
        #[arg(long, default_value = "type")]
        parameter: String,
        /// Paths bound so far
        #[arg(long, num_args = 1.., conflicts_with = "literal_path")]
        path: Vec<String>,
        /// Literal paths bound so far
        #[arg(long, num_args = 1.., visible_alias = "lp")]
        literal_path: Vec<String>,
        /// Partial word being completed
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        word: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show provider-specific parameters for a create call
    Params {
        /// Target paths (the first one is queried)
        #[arg(long, num_args = 1..)]
        path: Vec<String>,
        /// Property name
        #[arg(long)]
        name: String,
        /// Property type
        #[arg(long = "type", visible_alias = "property-type")]
        property_type: Option<String>,
        /// Property value
        #[arg(long)]
        value: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List drives and their providers
    Drives {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the properties of an item
    Show {
        /// Item path, taken verbatim
        #[arg(long, visible_alias = "lp")]
        literal_path: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Create an item (and missing parents)
    NewItem {
        /// Item path
        #[arg(long)]
        path: String,
        /// Report what would be created without writing
        #[arg(long)]
        what_if: bool,
    },
}

/// Interpret a `--value` argument: JSON when it parses, otherwise a string.
pub fn parse_value(raw: &str) -> PropertyValue {
    serde_json::from_str(raw).unwrap_or_else(|_| PropertyValue::String(raw.to_string()))
}
