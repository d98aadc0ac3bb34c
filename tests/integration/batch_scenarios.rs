//! Batch execution against the in-memory namespace

use crate::integration::test_utils::{seeded_namespace, RecordingGateway};
use itemprop::batch::BatchExecutor;
use itemprop::dynamic_params::resolve_dynamic_parameters;
use itemprop::error::{FailureKind, FatalError, ProviderFailure};
use itemprop::namespace::{MemoryNamespace, NamespaceState};
use itemprop::types::{ExecutionContext, PropertyRequest};
use serde_json::json;

fn request(paths: &[&str]) -> PropertyRequest {
    PropertyRequest::new(paths.iter().map(|p| p.to_string()).collect(), "Ver")
        .unwrap()
        .with_type("DWord")
        .with_value(json!(1))
}

#[test]
fn test_missing_item_is_isolated() {
    let namespace = seeded_namespace();
    let gateway = RecordingGateway::new(&namespace);
    let request = request(&["HKCU:\\A", "HKCU:\\Missing", "HKCU:\\B"]);

    let report = BatchExecutor::new(&gateway)
        .run(&request, &ExecutionContext::for_request(&request))
        .unwrap();

    assert_eq!(
        gateway.calls(),
        vec!["HKCU:\\A", "HKCU:\\Missing", "HKCU:\\B"]
    );
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.exit_code(), 1);

    let failure = &report.outcomes[1];
    assert_eq!(failure.path(), "HKCU:\\Missing");
    assert_eq!(
        failure.failure().map(ProviderFailure::kind),
        Some(FailureKind::ItemNotFound)
    );

    for path in ["HKCU:\\A", "HKCU:\\B"] {
        let props = namespace
            .item_properties(path, &ExecutionContext::default())
            .unwrap();
        assert_eq!(props.len(), 1, "{} should carry the new property", path);
        assert_eq!(props[0].value, json!(1));
        assert_eq!(props[0].property_type.as_deref(), Some("DWord"));
    }
}

#[test]
fn test_each_failure_class_reports_its_own_kind() {
    let mut state = NamespaceState::with_default_drives();
    state.add_item("HKCU:\\A").unwrap();
    state.add_drive("Cert", "Certificate");
    let namespace = MemoryNamespace::new(state);

    let request = request(&["Env:\\", "Nope:\\X", "Cert:\\", "HKCU:\\Gone", "HKCU:\\A"]);
    let report = BatchExecutor::new(&namespace)
        .run(&request, &ExecutionContext::for_request(&request))
        .unwrap();

    let kinds: Vec<_> = report
        .outcomes
        .iter()
        .map(|o| o.failure().map(ProviderFailure::kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            Some(FailureKind::UnsupportedOperation),
            Some(FailureKind::DriveNotFound),
            Some(FailureKind::ProviderNotFound),
            Some(FailureKind::ItemNotFound),
            None,
        ]
    );
}

#[test]
fn test_invalid_type_aborts_remaining_paths() {
    let namespace = seeded_namespace();
    let gateway = RecordingGateway::new(&namespace);
    let request = PropertyRequest::new(
        vec![
            "HKCU:\\Missing".to_string(),
            "HKCU:\\A".to_string(),
            "HKCU:\\B".to_string(),
        ],
        "Ver",
    )
    .unwrap()
    .with_type("Text");

    let aborted = BatchExecutor::new(&gateway)
        .run(&request, &ExecutionContext::for_request(&request))
        .unwrap_err();

    assert_eq!(gateway.calls(), vec!["HKCU:\\Missing", "HKCU:\\A"]);
    assert_eq!(aborted.path, "HKCU:\\A");
    assert!(matches!(
        aborted.source,
        FatalError::InvalidPropertyType { .. }
    ));
    assert_eq!(aborted.report.failed(), 1);
}

#[test]
fn test_literal_paths_are_not_expanded() {
    let namespace = seeded_namespace();
    let globbed = PropertyRequest::new(vec!["HKCU:\\[AB]".to_string()], "Flag").unwrap();
    let report = BatchExecutor::new(&namespace)
        .run(&globbed, &ExecutionContext::for_request(&globbed))
        .unwrap();
    match &report.outcomes[0] {
        itemprop::types::OperationOutcome::Success { created, .. } => {
            assert_eq!(created.len(), 2)
        }
        other => panic!("expected success, got {:?}", other),
    }

    let literal = PropertyRequest::new(vec!["HKCU:\\[AB]".to_string()], "Other")
        .unwrap()
        .literal(true);
    let report = BatchExecutor::new(&namespace)
        .run(&literal, &ExecutionContext::for_request(&literal))
        .unwrap();
    assert_eq!(
        report.outcomes[0].failure().map(ProviderFailure::kind),
        Some(FailureKind::ItemNotFound)
    );
}

#[test]
fn test_existing_property_needs_force() {
    let namespace = seeded_namespace();
    let first = request(&["HKCU:\\A"]);
    BatchExecutor::new(&namespace)
        .run(&first, &ExecutionContext::for_request(&first))
        .unwrap();

    let again = request(&["HKCU:\\B", "HKCU:\\A"]);
    let aborted = BatchExecutor::new(&namespace)
        .run(&again, &ExecutionContext::for_request(&again))
        .unwrap_err();
    assert!(matches!(aborted.source, FatalError::PropertyExists { .. }));
    assert_eq!(aborted.report.succeeded(), 1);

    let forced = request(&["HKCU:\\A"]).forced(true);
    let report = BatchExecutor::new(&namespace)
        .run(&forced, &ExecutionContext::for_request(&forced))
        .unwrap();
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_dynamic_parameters_come_from_first_path_provider() {
    let namespace = seeded_namespace();
    let ctx = ExecutionContext::default();

    let params = resolve_dynamic_parameters(
        &namespace,
        &["C:\\Temp".to_string(), "HKCU:\\".to_string()],
        "Ver",
        None,
        None,
        &ctx,
    )
    .unwrap();
    assert_eq!(params.parameters.len(), 1);

    let params = resolve_dynamic_parameters(
        &namespace,
        &["HKCU:\\".to_string(), "C:\\Temp".to_string()],
        "Ver",
        None,
        None,
        &ctx,
    )
    .unwrap();
    assert!(params.is_empty());

    // current location is C:\ by default
    let params = resolve_dynamic_parameters(&namespace, &[], "Ver", None, None, &ctx).unwrap();
    assert_eq!(params.parameters[0].name, "Stream");

    assert!(namespace
        .item_properties("C:\\Temp", &ctx)
        .unwrap()
        .is_empty());
}
