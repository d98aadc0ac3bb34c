//! Provider-specific parameters for a create call, discovered before it runs.

use crate::error::GatewayError;
use crate::namespace::PropertyGateway;
use crate::types::{DynamicParameters, ExecutionContext, PropertyValue, CURRENT_LOCATION};
use tracing::debug;

/// Ask the gateway which extra parameters apply. The first target path is
/// used; with no paths the current location is queried instead.
pub fn resolve_dynamic_parameters<G: PropertyGateway + ?Sized>(
    gateway: &G,
    target_paths: &[String],
    property_name: &str,
    property_type: Option<&str>,
    property_value: Option<&PropertyValue>,
    ctx: &ExecutionContext,
) -> Result<DynamicParameters, GatewayError> {
    let path = target_paths
        .first()
        .map(String::as_str)
        .unwrap_or(CURRENT_LOCATION);
    debug!(path, property = property_name, "Querying dynamic parameters");
    gateway.create_property_dynamic_parameters(
        path,
        property_name,
        property_type,
        property_value,
        ctx,
    )
}
