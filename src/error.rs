//! Error types for item property creation.
//!
//! Gateway failures form a closed set: the four recoverable kinds travel in
//! [`ProviderFailure`], everything else is a [`FatalError`]. The batch engine
//! matches on [`GatewayError`] exhaustively, so a new failure can only become
//! recoverable by being added to [`ProviderFailure`].

use serde::Serialize;
use thiserror::Error;

/// Failures reported per path without stopping the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderFailure {
    #[error("Provider '{provider}' does not support {operation} on '{path}'")]
    UnsupportedOperation {
        provider: String,
        operation: String,
        path: String,
    },

    #[error("A drive with the name '{drive}' does not exist")]
    DriveNotFound { drive: String },

    #[error("A provider with the name '{provider}' does not exist")]
    ProviderNotFound { provider: String },

    #[error("Cannot find path '{path}' because it does not exist")]
    ItemNotFound { path: String },
}

/// Discriminant of a [`ProviderFailure`], for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnsupportedOperation,
    DriveNotFound,
    ProviderNotFound,
    ItemNotFound,
}

impl FailureKind {
    /// Stable identifier used in CLI output.
    pub fn error_id(self) -> &'static str {
        match self {
            FailureKind::UnsupportedOperation => "NotSupported",
            FailureKind::DriveNotFound => "DriveNotFound",
            FailureKind::ProviderNotFound => "ProviderNotFound",
            FailureKind::ItemNotFound => "PathNotFound",
        }
    }
}

impl ProviderFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderFailure::UnsupportedOperation { .. } => FailureKind::UnsupportedOperation,
            ProviderFailure::DriveNotFound { .. } => FailureKind::DriveNotFound,
            ProviderFailure::ProviderNotFound { .. } => FailureKind::ProviderNotFound,
            ProviderFailure::ItemNotFound { .. } => FailureKind::ItemNotFound,
        }
    }
}

/// Failures that abort the remaining batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalError {
    #[error("Invalid property type '{type_name}' for provider '{provider}'")]
    InvalidPropertyType { provider: String, type_name: String },

    #[error("Value for property '{name}' cannot be stored as {type_name}: {reason}")]
    InvalidValue {
        name: String,
        type_name: String,
        reason: String,
    },

    #[error("The property '{name}' already exists on '{path}' (use --force to overwrite)")]
    PropertyExists { name: String, path: String },

    #[error("Invalid path expression '{expression}': {reason}")]
    InvalidPath { expression: String, reason: String },

    #[error("Namespace storage error: {0}")]
    Storage(String),
}

/// Result of a gateway call that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Recoverable(#[from] ProviderFailure),

    #[error(transparent)]
    Fatal(#[from] FatalError),
}

/// Path resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("A drive with the name '{0}' does not exist")]
    DriveNotFound(String),

    #[error("A provider with the name '{0}' does not exist")]
    ProviderNotFound(String),

    #[error("Cannot find path '{0}' because it does not exist")]
    ItemNotFound(String),

    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl From<ResolveError> for GatewayError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::DriveNotFound(drive) => ProviderFailure::DriveNotFound { drive }.into(),
            ResolveError::ProviderNotFound(provider) => {
                ProviderFailure::ProviderNotFound { provider }.into()
            }
            ResolveError::ItemNotFound(path) => ProviderFailure::ItemNotFound { path }.into(),
            ResolveError::InvalidPattern { pattern, reason } => FatalError::InvalidPath {
                expression: pattern,
                reason,
            }
            .into(),
        }
    }
}

/// Precondition violations when building a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("At least one target path is required")]
    NoTargetPaths,

    #[error("Target path at position {0} is empty")]
    EmptyPath(usize),

    #[error("Property name cannot be empty")]
    EmptyName,
}

/// Crate-level errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("{0}")]
    BatchAborted(#[from] crate::batch::BatchAborted),

    #[error("Provider error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Path resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Namespace state error: {0}")]
    StateError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
