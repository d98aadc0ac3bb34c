//! Core data types shared by the batch engine, the completion engine and
//! namespace providers.

use crate::error::{ProviderFailure, RequestError};
use serde::{Deserialize, Serialize};

/// Opaque property value handed through to the owning provider.
pub type PropertyValue = serde_json::Value;

/// Path of the current namespace node.
pub const CURRENT_LOCATION: &str = ".";

/// A request to create one property on every target path.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRequest {
    target_paths: Vec<String>,
    property_name: String,
    pub property_type: Option<String>,
    pub property_value: Option<PropertyValue>,
    pub use_literal_paths: bool,
    pub force: bool,
}

impl PropertyRequest {
    /// Build a request. Paths and name must be non-empty.
    pub fn new(
        target_paths: Vec<String>,
        property_name: impl Into<String>,
    ) -> Result<Self, RequestError> {
        if target_paths.is_empty() {
            return Err(RequestError::NoTargetPaths);
        }
        if let Some(index) = target_paths.iter().position(|p| p.is_empty()) {
            return Err(RequestError::EmptyPath(index));
        }
        let property_name = property_name.into();
        if property_name.is_empty() {
            return Err(RequestError::EmptyName);
        }
        Ok(Self {
            target_paths,
            property_name,
            property_type: None,
            property_value: None,
            use_literal_paths: false,
            force: false,
        })
    }

    pub fn with_type(mut self, property_type: impl Into<String>) -> Self {
        self.property_type = Some(property_type.into());
        self
    }

    pub fn with_value(mut self, value: PropertyValue) -> Self {
        self.property_value = Some(value);
        self
    }

    pub fn literal(mut self, literal: bool) -> Self {
        self.use_literal_paths = literal;
        self
    }

    pub fn forced(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn target_paths(&self) -> &[String] {
        &self.target_paths
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }
}

/// Per-invocation settings passed explicitly into the engine and every
/// gateway call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Let the provider overwrite or otherwise push through simple conflicts.
    pub force: bool,
    /// Report what would happen without writing anything.
    pub what_if: bool,
    /// Paths are taken verbatim.
    pub suppress_wildcard_expansion: bool,
    /// Label of an enclosing transaction, if the caller runs inside one.
    pub transaction: Option<String>,
    /// Overrides the namespace's own current location.
    pub current_location: Option<String>,
}

impl ExecutionContext {
    /// Context derived from a request's flags.
    pub fn for_request(request: &PropertyRequest) -> Self {
        Self {
            force: request.force,
            suppress_wildcard_expansion: request.use_literal_paths,
            ..Self::default()
        }
    }

    pub fn with_what_if(mut self, what_if: bool) -> Self {
        self.what_if = what_if;
        self
    }

    pub fn with_current_location(mut self, location: Option<String>) -> Self {
        self.current_location = location;
        self
    }
}

/// A concrete path and the provider that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPath {
    pub concrete_path: String,
    pub owner_provider_id: String,
}

/// A property as written by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub path: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    pub value: PropertyValue,
    pub provider: String,
}

/// Result of one target path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationOutcome {
    Success {
        path: String,
        created: Vec<PropertyRecord>,
    },
    ProviderFailure {
        path: String,
        failure: ProviderFailure,
    },
}

impl OperationOutcome {
    pub fn path(&self) -> &str {
        match self {
            OperationOutcome::Success { path, .. } => path,
            OperationOutcome::ProviderFailure { path, .. } => path,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationOutcome::Success { .. })
    }

    pub fn failure(&self) -> Option<&ProviderFailure> {
        match self {
            OperationOutcome::Success { .. } => None,
            OperationOutcome::ProviderFailure { failure, .. } => Some(failure),
        }
    }
}

/// A provider-specific parameter discovered at bind time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicParameter {
    pub name: String,
    pub value_type: String,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Extra parameters a provider accepts for a given call; may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicParameters {
    pub parameters: Vec<DynamicParameter>,
}

impl DynamicParameters {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// One completion suggestion. Order of a candidate list is presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionCandidate {
    pub value: String,
    pub display_label: String,
    pub tooltip: String,
}
