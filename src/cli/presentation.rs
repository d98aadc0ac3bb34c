//! Command presentation: text and json renderings of engine results.

use crate::batch::BatchReport;
use crate::error::{ApiError, ProviderFailure};
use crate::namespace::NamespaceState;
use crate::types::{CompletionCandidate, DynamicParameters, PropertyRecord};
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

/// One stderr line for a failed path.
pub fn format_failure_line(path: &str, failure: &ProviderFailure) -> String {
    format!(
        "{} [{}] {}: {}",
        "error:".red().bold(),
        failure.kind().error_id(),
        path,
        failure
    )
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::StateError(e.to_string()))
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn property_table(records: &[PropertyRecord]) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Path", "Name", "Type", "Value", "Provider"]);
    for record in records {
        table.add_row(vec![
            record.path.clone(),
            record.name.clone(),
            record.property_type.clone().unwrap_or_else(|| "-".to_string()),
            display_value(&record.value),
            record.provider.clone(),
        ]);
    }
    table.to_string()
}

pub fn format_batch_report(report: &BatchReport, format: &str) -> Result<String, ApiError> {
    if format == "json" {
        return to_json(&json!({
            "outcomes": report.outcomes,
            "succeeded": report.succeeded(),
            "failed": report.failed(),
        }));
    }

    let created: Vec<PropertyRecord> = report
        .outcomes
        .iter()
        .filter_map(|o| match o {
            crate::types::OperationOutcome::Success { created, .. } => Some(created.clone()),
            crate::types::OperationOutcome::ProviderFailure { .. } => None,
        })
        .flatten()
        .collect();
    if created.is_empty() {
        return Ok(String::new());
    }
    Ok(property_table(&created))
}

/// Completion candidates; text form is `value<TAB>tooltip`, one per line.
pub fn format_candidates(
    candidates: &[CompletionCandidate],
    format: &str,
) -> Result<String, ApiError> {
    if format == "json" {
        return to_json(&candidates);
    }
    Ok(candidates
        .iter()
        .map(|c| format!("{}\t{}", c.value, c.tooltip))
        .collect::<Vec<_>>()
        .join("\n"))
}

pub fn format_dynamic_parameters(
    params: &DynamicParameters,
    format: &str,
) -> Result<String, ApiError> {
    if format == "json" {
        return to_json(params);
    }
    if params.is_empty() {
        return Ok("No dynamic parameters.".to_string());
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Name", "Type", "Mandatory", "Help"]);
    for p in &params.parameters {
        table.add_row(vec![
            p.name.clone(),
            p.value_type.clone(),
            p.mandatory.to_string(),
            p.help.clone().unwrap_or_default(),
        ]);
    }
    Ok(table.to_string())
}

pub fn format_drives(state: &NamespaceState, format: &str) -> Result<String, ApiError> {
    if format == "json" {
        let drives: Vec<_> = state
            .drives
            .values()
            .map(|d| {
                json!({
                    "name": d.name,
                    "provider": d.provider,
                    "items": d.items.len(),
                })
            })
            .collect();
        return to_json(&json!({
            "current_location": state.current_location,
            "drives": drives,
        }));
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Drive", "Provider", "Items"]);
    for drive in state.drives.values() {
        table.add_row(vec![
            format!("{}:", drive.name),
            drive.provider.clone(),
            drive.items.len().to_string(),
        ]);
    }
    Ok(format!(
        "Current location: {}\n{}",
        state.current_location, table
    ))
}

pub fn format_properties(records: &[PropertyRecord], format: &str) -> Result<String, ApiError> {
    if format == "json" {
        return to_json(&records);
    }
    if records.is_empty() {
        return Ok("No properties.".to_string());
    }
    Ok(property_table(records))
}
