//! Namespace boundary: path resolution and property gateways.
//!
//! The batch and completion engines only see these traits. [`memory`] holds
//! the JSON-persisted reference namespace the CLI runs against.

use crate::error::{GatewayError, ResolveError};
use crate::types::{
    DynamicParameters, ExecutionContext, PropertyRecord, PropertyValue, ResolvedPath,
};

pub mod kind;
pub mod memory;
pub mod path;

pub use kind::RegistryValueKind;
pub use memory::{MemoryNamespace, NamespaceState};

/// Name the registry provider registers under.
pub const REGISTRY_PROVIDER: &str = "Registry";

/// Turns path expressions into concrete, provider-tagged paths.
pub trait PathResolver {
    /// Resolve every expression. With `literal` set, expressions are matched
    /// verbatim. Implementations must not modify the namespace.
    fn resolve_paths(
        &self,
        expressions: &[String],
        literal: bool,
        ctx: &ExecutionContext,
    ) -> Result<Vec<ResolvedPath>, ResolveError>;
}

/// Performs property operations on behalf of the owning provider.
pub trait PropertyGateway {
    /// Create `name` on every item `path` resolves to.
    fn create_property(
        &self,
        path: &str,
        name: &str,
        property_type: Option<&str>,
        value: Option<&PropertyValue>,
        ctx: &ExecutionContext,
    ) -> Result<Vec<PropertyRecord>, GatewayError>;

    /// Provider-specific parameters for a create call on `path`. Must not
    /// create anything.
    fn create_property_dynamic_parameters(
        &self,
        path: &str,
        name: &str,
        property_type: Option<&str>,
        value: Option<&PropertyValue>,
        ctx: &ExecutionContext,
    ) -> Result<DynamicParameters, GatewayError>;
}
