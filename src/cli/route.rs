//! CLI route: single route table and run context. Dispatches to the engines
//! and presentation.

use crate::batch::BatchExecutor;
use crate::cli::help::command_name;
use crate::cli::parse::{parse_value, Commands};
use crate::cli::presentation::{
    format_batch_report, format_candidates, format_drives, format_dynamic_parameters,
    format_failure_line, format_properties,
};
use crate::completion::{ArgumentCompleter, FakeBoundParameters, PropertyTypeCompleter};
use crate::config::{validate_location, ConfigLoader, ItempropConfig};
use crate::dynamic_params::resolve_dynamic_parameters;
use crate::error::ApiError;
use crate::namespace::MemoryNamespace;
use crate::types::{ExecutionContext, OperationOutcome, PropertyRequest};
use std::path::PathBuf;
use tracing::{debug, info};

/// What a command produced: stdout text, per-path error lines, exit code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub errors: Vec<String>,
    pub exit_code: i32,
}

impl CommandOutput {
    fn text(stdout: String) -> Self {
        Self {
            stdout,
            ..Self::default()
        }
    }
}

/// Runtime context for CLI execution: configuration and the namespace.
pub struct RunContext {
    config: ItempropConfig,
    namespace: MemoryNamespace,
    location: Option<String>,
}

impl RunContext {
    /// Create run context from workspace root, optional config path and
    /// optional state file override.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        state_file: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        config.ensure_valid()?;

        let state_path =
            state_file.unwrap_or_else(|| config.namespace.resolve_state_file(&workspace_root));
        let namespace = MemoryNamespace::open(&state_path, config.namespace.seed_default_drives)?;
        info!(state_file = %state_path.display(), "Namespace opened");

        let location = config.namespace.current_location.clone();
        Ok(Self {
            config,
            namespace,
            location,
        })
    }

    /// Build a context around an existing namespace.
    pub fn with_namespace(namespace: MemoryNamespace, config: ItempropConfig) -> Self {
        let location = config.namespace.current_location.clone();
        Self {
            config,
            namespace,
            location,
        }
    }

    /// Override the current location for this run.
    pub fn with_location(mut self, location: Option<String>) -> Result<Self, ApiError> {
        if let Some(location) = location {
            validate_location(&location).map_err(ApiError::ConfigError)?;
            self.location = Some(location);
        }
        Ok(self)
    }

    pub fn namespace(&self) -> &MemoryNamespace {
        &self.namespace
    }

    fn base_context(&self) -> ExecutionContext {
        ExecutionContext::default().with_current_location(self.location.clone())
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        info!(command = command_name(command), "Executing command");
        match command {
            Commands::New {
                path,
                literal_path,
                name,
                property_type,
                value,
                force,
                what_if,
                format,
            } => self.new_property(
                path,
                literal_path,
                name,
                property_type.as_deref(),
                value.as_deref(),
                *force,
                *what_if,
                format,
            ),
            Commands::Complete {
                parameter,
                path,
                literal_path,
                word,
                format,
            } => {
                if parameter != "type" {
                    return Ok(CommandOutput::default());
                }
                let bound = FakeBoundParameters {
                    path: (!path.is_empty()).then(|| path.clone()),
                    literal_path: (!literal_path.is_empty()).then(|| literal_path.clone()),
                };
                let completer = PropertyTypeCompleter::new(&self.namespace, self.base_context())
                    .for_provider(self.config.completion.distinguished_provider.clone());
                let candidates = completer.complete(word, &bound);
                debug!(candidates = candidates.len(), "Completion finished");
                Ok(CommandOutput::text(format_candidates(&candidates, format)?))
            }
            Commands::Params {
                path,
                name,
                property_type,
                value,
                format,
            } => {
                let value = value.as_deref().map(parse_value);
                let params = resolve_dynamic_parameters(
                    &self.namespace,
                    path,
                    name,
                    property_type.as_deref(),
                    value.as_ref(),
                    &self.base_context(),
                )?;
                Ok(CommandOutput::text(format_dynamic_parameters(
                    &params, format,
                )?))
            }
            Commands::Drives { format } => Ok(CommandOutput::text(format_drives(
                &self.namespace.snapshot(),
                format,
            )?)),
            Commands::Show {
                literal_path,
                format,
            } => {
                let records = self
                    .namespace
                    .item_properties(literal_path, &self.base_context())?;
                Ok(CommandOutput::text(format_properties(&records, format)?))
            }
            Commands::NewItem { path, what_if } => {
                let ctx = self.base_context().with_what_if(*what_if);
                self.namespace.create_item(path, &ctx)?;
                Ok(CommandOutput::default())
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn new_property(
        &self,
        path: &[String],
        literal_path: &[String],
        name: &str,
        property_type: Option<&str>,
        value: Option<&str>,
        force: bool,
        what_if: bool,
        format: &str,
    ) -> Result<CommandOutput, ApiError> {
        let literal = !literal_path.is_empty();
        let targets = if literal { literal_path } else { path };

        let mut request = PropertyRequest::new(targets.to_vec(), name)?
            .literal(literal)
            .forced(force);
        if let Some(property_type) = property_type {
            request = request.with_type(property_type);
        }
        if let Some(value) = value {
            request = request.with_value(parse_value(value));
        }

        let ctx = ExecutionContext::for_request(&request)
            .with_what_if(what_if)
            .with_current_location(self.location.clone());

        match resolve_dynamic_parameters(
            &self.namespace,
            request.target_paths(),
            request.property_name(),
            request.property_type.as_deref(),
            request.property_value.as_ref(),
            &ctx,
        ) {
            Ok(params) if !params.is_empty() => {
                let names: Vec<&str> = params.parameters.iter().map(|p| p.name.as_str()).collect();
                debug!(parameters = ?names, "Provider accepts dynamic parameters");
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Dynamic parameter lookup failed"),
        }

        let mut errors = Vec::new();
        let mut sink = |outcome: &OperationOutcome| {
            if let Some(failure) = outcome.failure() {
                errors.push(format_failure_line(outcome.path(), failure));
            }
        };
        let report = BatchExecutor::new(&self.namespace).execute(&request, &ctx, &mut sink)?;

        Ok(CommandOutput {
            stdout: format_batch_report(&report, format)?,
            errors,
            exit_code: report.exit_code(),
        })
    }
}
