//! Property-type completion against the in-memory namespace

use crate::integration::test_utils::seeded_namespace;
use itemprop::completion::{ArgumentCompleter, FakeBoundParameters, PropertyTypeCompleter};
use itemprop::types::ExecutionContext;

const KINDS: [&str; 7] = [
    "String",
    "ExpandString",
    "Binary",
    "DWord",
    "MultiString",
    "QWord",
    "Unknown",
];

#[test]
fn test_registry_literal_path_offers_every_kind_in_order() {
    let namespace = seeded_namespace();
    let completer = PropertyTypeCompleter::new(&namespace, ExecutionContext::default());
    let bound = FakeBoundParameters::with_literal_path(vec!["HKCU:\\Software\\Vendor".into()]);

    let candidates = completer.complete("", &bound);
    let values: Vec<_> = candidates.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(values, KINDS);
    for candidate in &candidates {
        assert_eq!(candidate.value, candidate.display_label);
        assert!(!candidate.tooltip.is_empty(), "{} has no tooltip", candidate.value);
    }
    assert!(candidates[3].tooltip.contains("REG_DWORD"));
}

#[test]
fn test_current_node_on_filesystem_offers_nothing() {
    let namespace = seeded_namespace();
    let completer = PropertyTypeCompleter::new(&namespace, ExecutionContext::default());
    assert!(completer
        .complete("", &FakeBoundParameters::default())
        .is_empty());
}

#[test]
fn test_current_node_on_registry_offers_kinds() {
    let namespace = seeded_namespace();
    let ctx = ExecutionContext::default().with_current_location(Some("HKLM:\\System".into()));
    let completer = PropertyTypeCompleter::new(&namespace, ctx);
    assert_eq!(completer.complete("", &FakeBoundParameters::default()).len(), 7);
}

#[test]
fn test_unresolvable_paths_offer_nothing() {
    let namespace = seeded_namespace();
    let completer = PropertyTypeCompleter::new(&namespace, ExecutionContext::default());

    for path in ["HKCU:\\Nowhere", "Q:\\", "HKCU:\\Soft*\\Missing*"] {
        let bound = FakeBoundParameters::with_path(vec![path.into()]);
        assert!(completer.complete("", &bound).is_empty(), "{}", path);
    }
}

#[test]
fn test_first_path_that_resolves_decides() {
    let namespace = seeded_namespace();
    let completer = PropertyTypeCompleter::new(&namespace, ExecutionContext::default());

    let bound = FakeBoundParameters::with_path(vec!["HKCU:\\Missing".into(), "HKCU:\\A".into()]);
    assert_eq!(completer.complete("", &bound).len(), 7);

    let bound =
        FakeBoundParameters::with_literal_path(vec!["Q:\\Nope".into(), "HKLM:\\System".into()]);
    assert_eq!(completer.complete("", &bound).len(), 7);

    let bound = FakeBoundParameters::with_path(vec!["HKCU:\\Missing".into(), "C:\\Temp".into()]);
    assert!(completer.complete("", &bound).is_empty());
}

#[test]
fn test_wildcard_path_resolves_before_deciding() {
    let namespace = seeded_namespace();
    let completer = PropertyTypeCompleter::new(&namespace, ExecutionContext::default());
    let bound = FakeBoundParameters::with_path(vec!["HKCU:\\Soft*".into()]);

    let values: Vec<_> = completer
        .complete("m", &bound)
        .into_iter()
        .map(|c| c.value)
        .collect();
    assert_eq!(values, vec!["MultiString"]);
}

#[test]
fn test_completion_does_not_modify_namespace() {
    let namespace = seeded_namespace();
    let before = namespace.snapshot();
    let completer = PropertyTypeCompleter::new(&namespace, ExecutionContext::default());
    completer.complete("", &FakeBoundParameters::with_path(vec!["HKCU:\\A".into()]));
    completer.complete("", &FakeBoundParameters::with_path(vec!["HKCU:\\Gone".into()]));
    assert_eq!(namespace.snapshot(), before);
}
