//! Shared fixtures for integration tests

use itemprop::error::GatewayError;
use itemprop::namespace::{MemoryNamespace, NamespaceState, PropertyGateway};
use itemprop::types::{DynamicParameters, ExecutionContext, PropertyRecord, PropertyValue};
use std::cell::RefCell;

/// Namespace with the default drives plus a few registry and filesystem items.
pub fn seeded_namespace() -> MemoryNamespace {
    let mut state = NamespaceState::with_default_drives();
    for item in [
        "HKCU:\\A",
        "HKCU:\\B",
        "HKCU:\\Software\\Vendor",
        "HKLM:\\System",
        "C:\\Temp",
    ] {
        state.add_item(item).unwrap();
    }
    MemoryNamespace::new(state)
}

/// Gateway that forwards to a namespace and records every create call.
pub struct RecordingGateway<'a> {
    pub inner: &'a MemoryNamespace,
    pub calls: RefCell<Vec<String>>,
}

impl<'a> RecordingGateway<'a> {
    pub fn new(inner: &'a MemoryNamespace) -> Self {
        Self {
            inner,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl PropertyGateway for RecordingGateway<'_> {
    fn create_property(
        &self,
        path: &str,
        name: &str,
        property_type: Option<&str>,
        value: Option<&PropertyValue>,
        ctx: &ExecutionContext,
    ) -> Result<Vec<PropertyRecord>, GatewayError> {
        self.calls.borrow_mut().push(path.to_string());
        self.inner
            .create_property(path, name, property_type, value, ctx)
    }

    fn create_property_dynamic_parameters(
        &self,
        path: &str,
        name: &str,
        property_type: Option<&str>,
        value: Option<&PropertyValue>,
        ctx: &ExecutionContext,
    ) -> Result<DynamicParameters, GatewayError> {
        self.inner
            .create_property_dynamic_parameters(path, name, property_type, value, ctx)
    }
}
