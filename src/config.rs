//! Configuration System
//!
//! Layered configuration for the namespace, completion and logging. Sources
//! are merged by [`ConfigLoader`]: defaults, then the global file, then the
//! workspace files, then `ITEMPROP_*` environment variables.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::namespace::path::{split_drive, QualifiedPath};
use crate::namespace::REGISTRY_PROVIDER;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItempropConfig {
    /// Namespace state and current location
    #[serde(default)]
    pub namespace: NamespaceConfig,

    /// Property-type completion
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// JSON file holding drives, items and properties. Relative paths are
    /// taken from the workspace root.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Location relative paths start from (defaults to the one stored in
    /// the state file)
    #[serde(default)]
    pub current_location: Option<String>,

    /// Seed Registry/FileSystem/Environment drives into a new state file
    #[serde(default = "default_true")]
    pub seed_default_drives: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Provider whose paths get property-type suggestions
    #[serde(default = "default_distinguished_provider")]
    pub distinguished_provider: String,
}

fn default_state_file() -> PathBuf {
    PathBuf::from(".itemprop/namespace.json")
}

fn default_true() -> bool {
    true
}

fn default_distinguished_provider() -> String {
    REGISTRY_PROVIDER.to_string()
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            current_location: None,
            seed_default_drives: default_true(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            distinguished_provider: default_distinguished_provider(),
        }
    }
}

impl NamespaceConfig {
    /// State file path anchored at `workspace_root` when relative.
    pub fn resolve_state_file(&self, workspace_root: &Path) -> PathBuf {
        if self.state_file.is_absolute() {
            self.state_file.clone()
        } else {
            let root = dunce::canonicalize(workspace_root)
                .unwrap_or_else(|_| workspace_root.to_path_buf());
            root.join(&self.state_file)
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.state_file.as_os_str().is_empty() {
            return Err("State file path cannot be empty".to_string());
        }
        if let Some(location) = &self.current_location {
            validate_location(location)?;
        }
        Ok(())
    }
}

/// A current location must name its drive.
pub fn validate_location(location: &str) -> Result<(), String> {
    match split_drive(location) {
        Some((drive, _)) if !drive.is_empty() => {
            QualifiedPath::parse(location, &QualifiedPath::root(drive))
                .map(|_| ())
                .map_err(|e| e.to_string())
        }
        _ => Err(format!(
            "Current location '{}' must be drive-qualified (e.g. HKCU:\\Software)",
            location
        )),
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Namespace(String),
    Completion(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Namespace(msg) => write!(f, "Namespace: {}", msg),
            ValidationError::Completion(msg) => write!(f, "Completion: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ItempropConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.namespace.validate() {
            errors.push(ValidationError::Namespace(e));
        }
        if self.completion.distinguished_provider.trim().is_empty() {
            errors.push(ValidationError::Completion(
                "Distinguished provider cannot be empty".to_string(),
            ));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding every error into one [`ApiError::ConfigError`].
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }
}
