//! Command-line completion for the property type.
//!
//! Completion runs while the command line is still being typed, so the bound
//! paths may be partial or wrong. Resolution failures never surface: paths
//! that do not resolve are skipped, and with none left completion is off.

use crate::error::ResolveError;
use crate::namespace::{PathResolver, RegistryValueKind, REGISTRY_PROVIDER};
use crate::types::{CompletionCandidate, ExecutionContext};
use std::collections::HashMap;
use tracing::debug;

/// Path completion falls back to when neither path parameter is bound.
pub const CURRENT_NODE: &str = ".\\";

/// Parameters already present on a partially typed command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FakeBoundParameters {
    pub path: Option<Vec<String>>,
    pub literal_path: Option<Vec<String>>,
}

impl FakeBoundParameters {
    pub fn with_path(paths: Vec<String>) -> Self {
        Self {
            path: Some(paths),
            literal_path: None,
        }
    }

    pub fn with_literal_path(paths: Vec<String>) -> Self {
        Self {
            path: None,
            literal_path: Some(paths),
        }
    }
}

/// Candidate value to tooltip, with a fallback for anything not listed.
#[derive(Debug, Clone)]
pub struct TooltipTable {
    entries: HashMap<String, String>,
    fallback: String,
}

impl TooltipTable {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            entries: HashMap::new(),
            fallback: fallback.into(),
        }
    }

    pub fn with(mut self, value: impl Into<String>, tooltip: impl Into<String>) -> Self {
        self.entries.insert(value.into(), tooltip.into());
        self
    }

    pub fn lookup(&self, value: &str) -> &str {
        self.entries
            .get(value)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    /// Descriptions of the registry value kinds.
    pub fn registry() -> Self {
        Self::new("An unsupported registry data type, such as REG_RESOURCE_LIST.")
            .with("String", "A null-terminated string. Equivalent to REG_SZ.")
            .with(
                "ExpandString",
                "A null-terminated string that contains unexpanded references to \
                 environment variables that are expanded when the value is retrieved. \
                 Equivalent to REG_EXPAND_SZ.",
            )
            .with("Binary", "Binary data in any form. Equivalent to REG_BINARY.")
            .with("DWord", "A 32-bit binary number. Equivalent to REG_DWORD.")
            .with(
                "MultiString",
                "An array of null-terminated strings, terminated by two null characters. \
                 Equivalent to REG_MULTI_SZ.",
            )
            .with("QWord", "A 64-bit binary number. Equivalent to REG_QWORD.")
    }
}

/// A completer offering a fixed list of values when its context allows it.
pub trait ArgumentCompleter {
    fn should_complete(&self, bound: &FakeBoundParameters) -> bool;

    /// Every value, in presentation order.
    fn possible_values(&self) -> Vec<String>;

    fn tooltip(&self, value: &str) -> String;

    /// Candidates matching `word_to_complete` (case-insensitive prefix).
    fn complete(
        &self,
        word_to_complete: &str,
        bound: &FakeBoundParameters,
    ) -> Vec<CompletionCandidate> {
        if !self.should_complete(bound) {
            return Vec::new();
        }
        let prefix = word_to_complete
            .trim_matches(|c| c == '\'' || c == '"')
            .to_lowercase();
        self.possible_values()
            .into_iter()
            .filter(|value| value.to_lowercase().starts_with(&prefix))
            .map(|value| CompletionCandidate {
                value: quote_if_needed(&value),
                tooltip: self.tooltip(&value),
                display_label: value,
            })
            .collect()
    }
}

fn quote_if_needed(value: &str) -> String {
    if value.chars().any(char::is_whitespace) {
        format!("'{}'", value.replace('\'', "''"))
    } else {
        value.to_string()
    }
}

/// Completes registry value kinds when the bound path belongs to the
/// registry provider.
pub struct PropertyTypeCompleter<'a, R: PathResolver + ?Sized> {
    resolver: &'a R,
    ctx: ExecutionContext,
    provider_name: String,
    tooltips: TooltipTable,
}

impl<'a, R: PathResolver + ?Sized> PropertyTypeCompleter<'a, R> {
    pub fn new(resolver: &'a R, ctx: ExecutionContext) -> Self {
        Self {
            resolver,
            ctx,
            provider_name: REGISTRY_PROVIDER.to_string(),
            tooltips: TooltipTable::registry(),
        }
    }

    /// Complete for a provider registered under another name.
    pub fn for_provider(mut self, provider_name: impl Into<String>) -> Self {
        self.provider_name = provider_name.into();
        self
    }

    /// Provider owning the first path the bound parameters resolve to.
    /// Expressions that do not resolve are skipped; a malformed pattern
    /// turns completion off.
    fn owning_provider(&self, bound: &FakeBoundParameters) -> Option<String> {
        let (expressions, literal) = match (&bound.path, &bound.literal_path) {
            (Some(paths), _) => (paths.clone(), false),
            (None, Some(paths)) => (paths.clone(), true),
            (None, None) => (vec![CURRENT_NODE.to_string()], false),
        };

        for expression in expressions {
            match self
                .resolver
                .resolve_paths(std::slice::from_ref(&expression), literal, &self.ctx)
            {
                Ok(resolved) => {
                    if let Some(first) = resolved.into_iter().next() {
                        return Some(first.owner_provider_id);
                    }
                }
                Err(e @ ResolveError::InvalidPattern { .. }) => {
                    debug!(error = %e, "Completion path is malformed");
                    return None;
                }
                Err(e) => {
                    debug!(path = %expression, error = %e, "Completion path did not resolve");
                }
            }
        }
        None
    }
}

impl<R: PathResolver + ?Sized> ArgumentCompleter for PropertyTypeCompleter<'_, R> {
    fn should_complete(&self, bound: &FakeBoundParameters) -> bool {
        self.owning_provider(bound)
            .is_some_and(|provider| provider.eq_ignore_ascii_case(&self.provider_name))
    }

    fn possible_values(&self) -> Vec<String> {
        RegistryValueKind::ALL
            .iter()
            .map(|kind| kind.as_str().to_string())
            .collect()
    }

    fn tooltip(&self, value: &str) -> String {
        self.tooltips.lookup(value).to_string()
    }
}
