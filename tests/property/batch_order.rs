//! Batch invariants over arbitrary path lists

use itemprop::batch::BatchExecutor;
use itemprop::error::{FatalError, GatewayError, ProviderFailure};
use itemprop::namespace::PropertyGateway;
use itemprop::types::{
    DynamicParameters, ExecutionContext, PropertyRecord, PropertyRequest, PropertyValue,
};
use proptest::prelude::*;
use std::cell::RefCell;

#[derive(Debug, Clone, Copy)]
enum Script {
    Succeed,
    Recoverable,
    Fatal,
}

struct ScriptedGateway {
    script: Vec<Script>,
    calls: RefCell<Vec<String>>,
}

impl PropertyGateway for ScriptedGateway {
    fn create_property(
        &self,
        path: &str,
        name: &str,
        _property_type: Option<&str>,
        _value: Option<&PropertyValue>,
        _ctx: &ExecutionContext,
    ) -> Result<Vec<PropertyRecord>, GatewayError> {
        let index = self.calls.borrow().len();
        self.calls.borrow_mut().push(path.to_string());
        match self.script[index] {
            Script::Succeed => Ok(vec![PropertyRecord {
                path: path.to_string(),
                name: name.to_string(),
                property_type: None,
                value: PropertyValue::Null,
                provider: "Test".to_string(),
            }]),
            Script::Recoverable => Err(ProviderFailure::ItemNotFound {
                path: path.to_string(),
            }
            .into()),
            Script::Fatal => Err(FatalError::Storage("scripted".to_string()).into()),
        }
    }

    fn create_property_dynamic_parameters(
        &self,
        _path: &str,
        _name: &str,
        _property_type: Option<&str>,
        _value: Option<&PropertyValue>,
        _ctx: &ExecutionContext,
    ) -> Result<DynamicParameters, GatewayError> {
        Ok(DynamicParameters::none())
    }
}

fn script_strategy() -> impl Strategy<Value = Script> {
    prop_oneof![
        4 => Just(Script::Succeed),
        3 => Just(Script::Recoverable),
        1 => Just(Script::Fatal),
    ]
}

proptest! {
    #[test]
    fn gateway_sees_paths_in_order_until_first_fatal(
        steps in prop::collection::vec(("[A-Za-z]{1,8}", script_strategy()), 1..20)
    ) {
        let paths: Vec<String> = steps.iter().map(|(p, _)| format!("HKCU:\\{}", p)).collect();
        let gateway = ScriptedGateway {
            script: steps.iter().map(|(_, s)| *s).collect(),
            calls: RefCell::new(Vec::new()),
        };
        let request = PropertyRequest::new(paths.clone(), "Ver").unwrap();
        let result = BatchExecutor::new(&gateway).run(&request, &ExecutionContext::default());

        let fatal_at = steps.iter().position(|(_, s)| matches!(s, Script::Fatal));
        let expected_calls = fatal_at.map(|i| i + 1).unwrap_or(paths.len());
        prop_assert_eq!(gateway.calls.borrow().clone(), paths[..expected_calls].to_vec());

        let recoverable_before = steps[..fatal_at.unwrap_or(paths.len())]
            .iter()
            .filter(|(_, s)| matches!(s, Script::Recoverable))
            .count();

        match (result, fatal_at) {
            (Ok(report), None) => {
                prop_assert_eq!(report.outcomes.len(), paths.len());
                prop_assert_eq!(report.failed(), recoverable_before);
                prop_assert_eq!(report.exit_code(), i32::from(recoverable_before > 0));
                for (outcome, path) in report.outcomes.iter().zip(&paths) {
                    prop_assert_eq!(outcome.path(), path.as_str());
                }
            }
            (Err(aborted), Some(index)) => {
                prop_assert_eq!(aborted.attempted, index + 1);
                prop_assert_eq!(&aborted.path, &paths[index]);
                prop_assert_eq!(aborted.report.outcomes.len(), index);
                prop_assert_eq!(aborted.report.failed(), recoverable_before);
            }
            (other, fatal) => prop_assert!(false, "unexpected {:?} with fatal at {:?}", other.is_ok(), fatal),
        }
    }
}
