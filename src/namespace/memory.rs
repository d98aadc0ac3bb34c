//! In-memory namespace with optional JSON persistence.
//!
//! Drives are bound to providers; each drive holds a flat map of items keyed
//! by their case-insensitive path. The drive root always exists. Writes go to
//! the state file after every successful property creation.

use crate::error::{ApiError, FatalError, GatewayError, ProviderFailure, ResolveError};
use crate::namespace::kind::RegistryValueKind;
use crate::namespace::path::{has_wildcards, QualifiedPath};
use crate::namespace::{PathResolver, PropertyGateway, REGISTRY_PROVIDER};
use crate::types::{
    DynamicParameter, DynamicParameters, ExecutionContext, PropertyRecord, PropertyValue,
    ResolvedPath,
};
use glob::{MatchOptions, Pattern};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A registered provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub name: String,
    #[serde(default = "default_true")]
    pub supports_properties: bool,
    #[serde(default)]
    pub dynamic_parameters: Vec<DynamicParameter>,
}

/// A drive mounted on a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveEntry {
    pub name: String,
    pub provider: String,
    #[serde(default)]
    pub items: BTreeMap<String, ItemEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub path: String,
    #[serde(default)]
    pub properties: BTreeMap<String, StoredProperty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProperty {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    pub value: PropertyValue,
}

/// Serializable namespace contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceState {
    pub current_location: String,
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderEntry>,
    #[serde(default)]
    pub drives: BTreeMap<String, DriveEntry>,
}

fn default_true() -> bool {
    true
}

impl Default for NamespaceState {
    fn default() -> Self {
        Self {
            current_location: "C:\\".to_string(),
            providers: BTreeMap::new(),
            drives: BTreeMap::new(),
        }
    }
}

impl NamespaceState {
    /// Registry, FileSystem and Environment providers with their usual drives.
    pub fn with_default_drives() -> Self {
        let mut state = Self::default();
        state.add_provider(REGISTRY_PROVIDER, true);
        state
            .add_provider("FileSystem", true)
            .dynamic_parameters
            .push(DynamicParameter {
                name: "Stream".to_string(),
                value_type: "string".to_string(),
                mandatory: false,
                help: Some("Alternate data stream that receives the property".to_string()),
            });
        state.add_provider("Environment", false);
        state.add_drive("HKCU", REGISTRY_PROVIDER);
        state.add_drive("HKLM", REGISTRY_PROVIDER);
        state.add_drive("C", "FileSystem");
        state.add_drive("Env", "Environment");
        state
    }

    pub fn add_provider(&mut self, name: &str, supports_properties: bool) -> &mut ProviderEntry {
        self.providers
            .entry(name.to_lowercase())
            .or_insert_with(|| ProviderEntry {
                name: name.to_string(),
                supports_properties,
                dynamic_parameters: Vec::new(),
            })
    }

    /// Mount `name` on `provider`. The provider does not have to be registered;
    /// resolution reports the missing provider.
    pub fn add_drive(&mut self, name: &str, provider: &str) {
        self.drives
            .entry(name.to_lowercase())
            .or_insert_with(|| DriveEntry {
                name: name.to_string(),
                provider: provider.to_string(),
                items: BTreeMap::new(),
            });
    }

    /// Create an item (and its missing ancestors).
    pub fn add_item(&mut self, path: &str) -> Result<(), ResolveError> {
        let current = self.current()?;
        let mut target = QualifiedPath::parse(path, &current)?;
        let drive = self
            .drives
            .get_mut(&target.drive.to_lowercase())
            .ok_or_else(|| ResolveError::DriveNotFound(target.drive.clone()))?;
        target.drive = drive.name.clone();

        let mut chain = vec![target.clone()];
        let mut cursor = target;
        while let Some(parent) = cursor.parent() {
            chain.push(parent.clone());
            cursor = parent;
        }
        for item in chain.into_iter().filter(|p| !p.segments.is_empty()) {
            drive.items.entry(item.key()).or_insert_with(|| ItemEntry {
                path: item.to_string(),
                properties: BTreeMap::new(),
            });
        }
        Ok(())
    }

    fn current(&self) -> Result<QualifiedPath, ResolveError> {
        parse_location(&self.current_location)
    }

    fn item_exists(drive: &DriveEntry, path: &QualifiedPath) -> bool {
        path.segments.is_empty() || drive.items.contains_key(&path.key())
    }
}

fn parse_location(location: &str) -> Result<QualifiedPath, ResolveError> {
    QualifiedPath::parse(location, &QualifiedPath::root("C"))
}

/// Namespace backed by [`NamespaceState`], shared behind a lock.
pub struct MemoryNamespace {
    state: RwLock<NamespaceState>,
    state_file: Option<PathBuf>,
}

impl MemoryNamespace {
    pub fn new(state: NamespaceState) -> Self {
        Self {
            state: RwLock::new(state),
            state_file: None,
        }
    }

    /// Load from `path`, seeding default drives when the file does not exist.
    pub fn open(path: &Path, seed_default_drives: bool) -> Result<Self, ApiError> {
        let state = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str(&raw).map_err(|e| {
                ApiError::StateError(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else if seed_default_drives {
            NamespaceState::with_default_drives()
        } else {
            NamespaceState::default()
        };
        debug!(state_file = %path.display(), drives = state.drives.len(), "Namespace loaded");
        Ok(Self {
            state: RwLock::new(state),
            state_file: Some(path.to_path_buf()),
        })
    }

    pub fn snapshot(&self) -> NamespaceState {
        self.state.read().clone()
    }

    /// Create an item and its missing ancestors, persisting the result.
    pub fn create_item(&self, path: &str, ctx: &ExecutionContext) -> Result<(), GatewayError> {
        let mut state = self.state.write();
        let current = location_of(&state, ctx)?;
        let absolute = QualifiedPath::parse(path, &current)?;
        if ctx.what_if {
            info!(target_path = %absolute, "What if: creating item");
            return Ok(());
        }
        state.add_item(&absolute.to_string())?;
        self.persist(&state)?;
        Ok(())
    }

    /// Properties stored on the item at `path` (taken literally).
    pub fn item_properties(
        &self,
        path: &str,
        ctx: &ExecutionContext,
    ) -> Result<Vec<PropertyRecord>, ResolveError> {
        let state = self.state.read();
        let resolved = resolve_in(&state, &[path.to_string()], true, ctx)?;
        let mut records = Vec::new();
        for target in resolved {
            let qualified = QualifiedPath::parse(&target.concrete_path, &state.current()?)?;
            let Some(drive) = state.drives.get(&qualified.drive.to_lowercase()) else {
                continue;
            };
            if let Some(item) = drive.items.get(&qualified.key()) {
                records.extend(item.properties.values().map(|p| PropertyRecord {
                    path: item.path.clone(),
                    name: p.name.clone(),
                    property_type: p.property_type.clone(),
                    value: p.value.clone(),
                    provider: target.owner_provider_id.clone(),
                }));
            }
        }
        Ok(records)
    }

    fn persist(&self, state: &NamespaceState) -> Result<(), FatalError> {
        let Some(path) = &self.state_file else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FatalError::Storage(e.to_string()))?;
        }
        let json =
            serde_json::to_string_pretty(state).map_err(|e| FatalError::Storage(e.to_string()))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| FatalError::Storage(e.to_string()))?;
        std::fs::rename(&tmp, path).map_err(|e| FatalError::Storage(e.to_string()))
    }
}

impl PathResolver for MemoryNamespace {
    fn resolve_paths(
        &self,
        expressions: &[String],
        literal: bool,
        ctx: &ExecutionContext,
    ) -> Result<Vec<ResolvedPath>, ResolveError> {
        let state = self.state.read();
        resolve_in(&state, expressions, literal, ctx)
    }
}

impl PropertyGateway for MemoryNamespace {
    fn create_property(
        &self,
        path: &str,
        name: &str,
        property_type: Option<&str>,
        value: Option<&PropertyValue>,
        ctx: &ExecutionContext,
    ) -> Result<Vec<PropertyRecord>, GatewayError> {
        let mut state = self.state.write();
        let targets = resolve_in(
            &state,
            &[path.to_string()],
            ctx.suppress_wildcard_expansion,
            ctx,
        )?;
        let current = location_of(&state, ctx)?;

        let mut planned = Vec::with_capacity(targets.len());
        for target in &targets {
            let provider = provider_of(&state, &target.owner_provider_id)?;
            if !provider.supports_properties {
                return Err(ProviderFailure::UnsupportedOperation {
                    provider: provider.name.clone(),
                    operation: "property creation".to_string(),
                    path: target.concrete_path.clone(),
                }
                .into());
            }
            let (stored_type, stored_value) =
                typed_value(&provider.name, name, property_type, value)?;
            let qualified = QualifiedPath::parse(&target.concrete_path, &current)?;
            let exists = state
                .drives
                .get(&qualified.drive.to_lowercase())
                .and_then(|drive| drive.items.get(&qualified.key()))
                .is_some_and(|item| item.properties.contains_key(&name.to_lowercase()));
            if exists && !ctx.force {
                return Err(FatalError::PropertyExists {
                    name: name.to_string(),
                    path: target.concrete_path.clone(),
                }
                .into());
            }
            planned.push((qualified, stored_type, stored_value, provider.name.clone()));
        }

        let mut created = Vec::with_capacity(planned.len());
        for (qualified, stored_type, stored_value, provider) in planned {
            if ctx.what_if {
                info!(
                    target_path = %qualified,
                    property = name,
                    "What if: creating property"
                );
                continue;
            }

            let drive = state
                .drives
                .get_mut(&qualified.drive.to_lowercase())
                .ok_or_else(|| ProviderFailure::DriveNotFound {
                    drive: qualified.drive.clone(),
                })?;
            let item = drive
                .items
                .entry(qualified.key())
                .or_insert_with(|| ItemEntry {
                    path: qualified.to_string(),
                    properties: BTreeMap::new(),
                });

            item.properties.insert(
                name.to_lowercase(),
                StoredProperty {
                    name: name.to_string(),
                    property_type: stored_type.clone(),
                    value: stored_value.clone(),
                },
            );
            created.push(PropertyRecord {
                path: item.path.clone(),
                name: name.to_string(),
                property_type: stored_type,
                value: stored_value,
                provider,
            });
        }

        if !created.is_empty() {
            self.persist(&state)?;
        }
        Ok(created)
    }

    fn create_property_dynamic_parameters(
        &self,
        path: &str,
        _name: &str,
        _property_type: Option<&str>,
        _value: Option<&PropertyValue>,
        ctx: &ExecutionContext,
    ) -> Result<DynamicParameters, GatewayError> {
        let state = self.state.read();
        let targets = resolve_in(
            &state,
            &[path.to_string()],
            ctx.suppress_wildcard_expansion,
            ctx,
        )?;
        let Some(first) = targets.first() else {
            return Ok(DynamicParameters::none());
        };
        let provider = provider_of(&state, &first.owner_provider_id)?;
        Ok(DynamicParameters {
            parameters: provider.dynamic_parameters.clone(),
        })
    }
}

fn location_of(state: &NamespaceState, ctx: &ExecutionContext) -> Result<QualifiedPath, ResolveError> {
    match &ctx.current_location {
        Some(location) => parse_location(location),
        None => state.current(),
    }
}

fn provider_of<'a>(
    state: &'a NamespaceState,
    provider: &str,
) -> Result<&'a ProviderEntry, ProviderFailure> {
    state
        .providers
        .get(&provider.to_lowercase())
        .ok_or_else(|| ProviderFailure::ProviderNotFound {
            provider: provider.to_string(),
        })
}

/// Type name and value as the provider stores them.
fn typed_value(
    provider: &str,
    name: &str,
    property_type: Option<&str>,
    value: Option<&PropertyValue>,
) -> Result<(Option<String>, PropertyValue), FatalError> {
    if !provider.eq_ignore_ascii_case(REGISTRY_PROVIDER) {
        return Ok((
            property_type.map(str::to_string),
            value.cloned().unwrap_or(PropertyValue::Null),
        ));
    }

    let kind = match property_type {
        Some(type_name) => {
            type_name
                .parse::<RegistryValueKind>()
                .map_err(|_| FatalError::InvalidPropertyType {
                    provider: provider.to_string(),
                    type_name: type_name.to_string(),
                })?
        }
        None => RegistryValueKind::infer(value),
    };
    let stored = kind.coerce(value).map_err(|reason| FatalError::InvalidValue {
        name: name.to_string(),
        type_name: kind.to_string(),
        reason,
    })?;
    Ok((Some(kind.to_string()), stored))
}

fn resolve_in(
    state: &NamespaceState,
    expressions: &[String],
    literal: bool,
    ctx: &ExecutionContext,
) -> Result<Vec<ResolvedPath>, ResolveError> {
    let current = location_of(state, ctx)?;
    let mut resolved = Vec::new();

    for expression in expressions {
        let qualified = QualifiedPath::parse(expression, &current)?;
        let drive = state
            .drives
            .get(&qualified.drive.to_lowercase())
            .ok_or_else(|| ResolveError::DriveNotFound(qualified.drive.clone()))?;
        let provider = state
            .providers
            .get(&drive.provider.to_lowercase())
            .ok_or_else(|| ResolveError::ProviderNotFound(drive.provider.clone()))?;

        let mut qualified = qualified;
        qualified.drive = drive.name.clone();

        if !literal && has_wildcards(expression) {
            let pattern = Pattern::new(&qualified.match_form()).map_err(|e| {
                ResolveError::InvalidPattern {
                    pattern: expression.clone(),
                    reason: e.msg.to_string(),
                }
            })?;
            let options = MatchOptions {
                case_sensitive: false,
                require_literal_separator: true,
                require_literal_leading_dot: false,
            };
            let root = QualifiedPath::root(drive.name.clone());
            let mut candidates: Vec<String> =
                drive.items.values().map(|item| item.path.clone()).collect();
            if !drive.items.contains_key(&root.key()) {
                candidates.insert(0, root.to_string());
            }
            let before = resolved.len();
            for candidate in candidates {
                if pattern.matches_with(&candidate.replace('\\', "/"), options) {
                    resolved.push(ResolvedPath {
                        concrete_path: candidate,
                        owner_provider_id: provider.name.clone(),
                    });
                }
            }
            if resolved.len() == before {
                return Err(ResolveError::ItemNotFound(expression.clone()));
            }
        } else if NamespaceState::item_exists(drive, &qualified) {
            let concrete_path = drive
                .items
                .get(&qualified.key())
                .map(|item| item.path.clone())
                .unwrap_or_else(|| qualified.to_string());
            resolved.push(ResolvedPath {
                concrete_path,
                owner_provider_id: provider.name.clone(),
            });
        } else {
            return Err(ResolveError::ItemNotFound(qualified.to_string()));
        }
    }

    Ok(resolved)
}
