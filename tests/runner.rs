//! Tests for the execution engine: dispatch, context threading, jumps and
//! the runtime failure modes.
mod common;
use bunki::error::{CheckerError, RuntimeError};
use bunki::prelude::*;
use common::*;
use std::sync::Arc;

fn build(value: Value) -> Arc<Flowchart> {
    let definition = serde_json::from_value(value).expect("definition should deserialize");
    Arc::new(
        FlowchartBuilder::new(definition)
            .build()
            .expect("flowchart should build"),
    )
}

/// A checker that returns whatever case value its criteria picks out of the
/// subject, unmodified.
fn echo_registry() -> ServiceRegistry {
    ServiceRegistry::new().with_checker(
        "echo",
        FnChecker::new(|subject: &Value, criteria, _context| {
            let field = criteria
                .and_then(Value::as_str)
                .ok_or_else(|| CheckerError::msg("criteria must name a subject field"))?;
            CaseValue::from_json(&subject[field])
                .ok_or_else(|| CheckerError::msg(format!("`{}` is not a case value", field)))
        }),
    )
}

#[test]
fn test_boolean_dispatch_routes_by_result() {
    let flowchart = build(json!({
        "entrypoint": {
            "checker": "echo",
            "criteria": "flag",
            "when@true": "took true",
            "when@false": "took false"
        }
    }));
    let runner = FlowchartRunner::new(echo_registry());

    let outcome = runner
        .satisfies(json!({"flag": true}), Arc::clone(&flowchart), Context::default())
        .unwrap();
    assert_eq!(outcome.result, CaseValue::Str("took true".to_owned()));

    let outcome = runner
        .satisfies(json!({"flag": false}), flowchart, Context::default())
        .unwrap();
    assert_eq!(outcome.result, CaseValue::Str("took false".to_owned()));
}

#[test]
fn test_result_outside_declared_set_is_no_case_match() {
    let flowchart = build(json!({
        "entrypoint": {
            "id": "root",
            "checker": "echo",
            "criteria": "flag",
            "when@true": true,
            "when@false": false
        }
    }));
    let runner = FlowchartRunner::new(echo_registry());

    let err = runner
        .satisfies(json!({"flag": "maybe"}), flowchart, Context::default())
        .unwrap_err();
    match &err {
        RuntimeError::NoCaseMatch { result, state } => {
            assert_eq!(result, &CaseValue::Str("maybe".to_owned()));
            // The decision that produced the unmatched value is on the trace.
            assert_eq!(
                state.history(),
                &[("root".to_owned(), CaseValue::Str("maybe".to_owned()))]
            );
        }
        other => panic!("expected a no-case-match error, got {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "no case found for result `maybe` at step `root`"
    );
}

#[test]
fn test_checker_failure_is_wrapped_with_state() {
    let flowchart = build(json!({
        "entrypoint": { "id": "root", "checker": "echo", "criteria": "missing" }
    }));
    let runner = FlowchartRunner::new(echo_registry());

    let err = runner
        .satisfies(json!({}), flowchart, Context::default())
        .unwrap_err();
    match &err {
        RuntimeError::CheckerFailed { checker_id, state, .. } => {
            assert_eq!(checker_id, "echo");
            assert_eq!(state.node_id(), "root");
            assert!(state.history().is_empty());
        }
        other => panic!("expected a checker-failed error, got {:?}", other),
    }
}

#[test]
fn test_unknown_checker_fails_as_service_error() {
    let flowchart = build(json!({
        "entrypoint": { "checker": "unregistered" }
    }));
    let runner = FlowchartRunner::new(echo_registry());

    let err = runner
        .satisfies(json!({}), flowchart, Context::default())
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Service(_)));
    assert!(err.state().is_none());
}

#[test]
fn test_end_without_result_returns_last_checker_result() {
    let flowchart = build(json!({
        "entrypoint": {
            "checker": "echo",
            "criteria": "tier",
            "cases": ["gold", "bronze"],
            "when@gold": { "end": {} },
            "when@bronze": { "end": { "result": "overridden" } }
        }
    }));
    let runner = FlowchartRunner::new(echo_registry());

    let outcome = runner
        .satisfies(json!({"tier": "gold"}), Arc::clone(&flowchart), Context::default())
        .unwrap();
    assert_eq!(outcome.result, CaseValue::Str("gold".to_owned()));

    let outcome = runner
        .satisfies(json!({"tier": "bronze"}), flowchart, Context::default())
        .unwrap();
    assert_eq!(outcome.result, CaseValue::Str("overridden".to_owned()));
}

#[test]
fn test_context_merge_is_cumulative_and_last_write_wins() {
    let flowchart = build(json!({
        "entrypoint": {
            "checker": "echo",
            "criteria": "flag",
            "context": { "stage": "entry", "entry_only": 1 },
            "when@true": {
                "checker": "echo",
                "criteria": "flag",
                "context": { "stage": "inner" },
                "when@true": { "end": { "context": { "stage": "end", "end_only": 2 } } },
                "when@false": false
            },
            "when@false": false
        },
        "context": { "stage": "flowchart", "tenant": "acme" }
    }));
    let runner = FlowchartRunner::new(echo_registry());

    let initial = Context::from_iter([
        ("stage".to_owned(), json!("initial")),
        ("caller".to_owned(), json!("test")),
    ]);
    let outcome = runner
        .satisfies(json!({"flag": true}), flowchart, initial)
        .unwrap();

    let context = outcome.state.context();
    assert_eq!(context.get("stage"), Some(&json!("end")));
    assert_eq!(context.get("caller"), Some(&json!("test")));
    assert_eq!(context.get("tenant"), Some(&json!("acme")));
    assert_eq!(context.get("entry_only"), Some(&json!(1)));
    assert_eq!(context.get("end_only"), Some(&json!(2)));
}

#[test]
fn test_goto_resumes_at_target_and_merges_context() {
    let flowchart = build(json!({
        "entrypoint": {
            "id": "first",
            "checker": "echo",
            "criteria": "flag",
            "when@true": { "goto": { "id": "landing", "context": { "via": "jump" } } },
            "when@false": {
                "id": "landing",
                "checker": "echo",
                "criteria": "other",
                "when@true": true,
                "when@false": false
            }
        }
    }));
    let runner = FlowchartRunner::new(echo_registry());

    let outcome = runner
        .satisfies(
            json!({"flag": true, "other": true}),
            flowchart,
            Context::default(),
        )
        .unwrap();

    assert_eq!(outcome.result, CaseValue::Bool(true));
    assert_eq!(
        bool_history(&outcome.state),
        vec![("first".to_owned(), true), ("landing".to_owned(), true)]
    );
    assert_eq!(outcome.state.context().get("via"), Some(&json!("jump")));
}

#[test]
fn test_goto_to_unregistered_id_fails() {
    let flowchart = build(json!({
        "entrypoint": {
            "id": "root",
            "checker": "echo",
            "criteria": "flag",
            "when@true": { "goto": "nowhere" },
            "when@false": false
        }
    }));
    let runner = FlowchartRunner::new(echo_registry());

    let err = runner
        .satisfies(json!({"flag": true}), flowchart, Context::default())
        .unwrap_err();
    match &err {
        RuntimeError::UnknownJumpTarget { target, state } => {
            assert_eq!(target, "nowhere");
            assert_eq!(bool_history(state), vec![("root".to_owned(), true)]);
        }
        other => panic!("expected an unknown-jump-target error, got {:?}", other),
    }
    assert_eq!(err.to_string(), "id `nowhere` not found");
}

#[test]
fn test_unhandled_step_aborts_the_run() {
    let flowchart = build(json!({
        "entrypoint": { "id": "root", "checker": "echo", "criteria": "flag", "when@true": true }
    }));
    let runner = FlowchartRunner::new(echo_registry());

    let err = runner
        .satisfies(json!({"flag": false}), flowchart, Context::default())
        .unwrap_err();
    match &err {
        RuntimeError::UnhandledStep { state } => {
            assert_eq!(bool_history(state), vec![("root".to_owned(), false)]);
        }
        other => panic!("expected an unhandled-step error, got {:?}", other),
    }
    assert_eq!(err.to_string(), "unhandled step at `root`");
}

#[test]
fn test_raise_error_carries_kind_and_merged_context() {
    let flowchart = build(json!({
        "entrypoint": {
            "id": "root",
            "checker": "echo",
            "criteria": "flag",
            "when@true": {
                "error": {
                    "message": "X",
                    "error-kind": "validation",
                    "context": { "detail": "flag was set" }
                }
            },
            "when@false": false
        }
    }));
    let runner = FlowchartRunner::new(echo_registry());

    let err = runner
        .satisfies(json!({"flag": true}), flowchart, Context::default())
        .unwrap_err();
    match &err {
        RuntimeError::Raised { message, kind, state } => {
            assert_eq!(message, "X");
            assert_eq!(kind.as_deref(), Some("validation"));
            assert_eq!(state.context().get("detail"), Some(&json!("flag was set")));
            assert_eq!(bool_history(state), vec![("root".to_owned(), true)]);
        }
        other => panic!("expected a raised error, got {:?}", other),
    }
    assert_eq!(err.to_string(), "X");
}

#[test]
fn test_evaluation_is_deterministic() {
    let flowchart = build(json!({
        "entrypoint": {
            "id": "a",
            "checker": "echo",
            "criteria": "flag",
            "when@true": {
                "id": "b",
                "checker": "echo",
                "criteria": "other",
                "when@true": true,
                "when@false": false
            },
            "when@false": false
        }
    }));
    let runner = FlowchartRunner::new(echo_registry());
    let subject = json!({"flag": true, "other": false});

    let first = runner
        .satisfies(subject.clone(), Arc::clone(&flowchart), Context::default())
        .unwrap();
    let second = runner
        .satisfies(subject, flowchart, Context::default())
        .unwrap();

    assert_eq!(first.result, second.result);
    assert_eq!(first.state.history(), second.state.history());
}

#[test]
fn test_last_result_tracks_most_recent_decision() {
    let flowchart = build(json!({
        "entrypoint": {
            "checker": "echo",
            "criteria": "flag",
            "when@true": {
                "checker": "echo",
                "criteria": "other",
                "when@true": true,
                "when@false": { "end": {} }
            },
            "when@false": false
        }
    }));
    let runner = FlowchartRunner::new(echo_registry());

    let outcome = runner
        .satisfies(json!({"flag": true, "other": false}), flowchart, Context::default())
        .unwrap();
    // `end` without a result falls back to the second decision's outcome.
    assert_eq!(outcome.result, CaseValue::Bool(false));
    assert_eq!(outcome.state.last_result(), Some(&CaseValue::Bool(false)));
}
