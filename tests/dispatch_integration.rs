use clipline::dispatch::{DispatchError, Dispatcher};
use clipline::editor::{ParameterError, Registry, ResponseKind};
use clipline::macros::{MacroError, MacroStore};

const MACROS: &str = r#"
{
  commands: [
    { name: "foo", description: "trim then align csv", steps: ["trim", "columnAlign 3 ,"] },
    { name: "tsv", steps: ["replace \\t , literal", "columnAlign 1 ,"] },
    { name: "stats", description: "count words", steps: ["count"] },
    { name: "broken", steps: ["upper", "sort sideways", "lower"] },
  ],
}
"#;

fn dispatcher_from_file() -> (tempfile::TempDir, Dispatcher) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("macros.json5");
    std::fs::write(&path, MACROS).unwrap();
    let store = MacroStore::load(Some(path.as_path()));
    (dir, Dispatcher::new(Registry::builtin(), store))
}

#[test]
fn test_macro_from_file_runs_two_steps_in_order() {
    let (_dir, dispatcher) = dispatcher_from_file();
    let outcome = dispatcher
        .dispatch("foo", " x,yy \nzzz,w".to_string())
        .unwrap();
    let names: Vec<_> = outcome.steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["trim", "columnAlign"]);
    assert_eq!(outcome.steps[1].args, vec!["3", ","]);
    assert_eq!(outcome.text, "x     yy\nzzz   w");
    assert!(outcome.responses.is_empty());
}

#[test]
fn test_macro_steps_use_tokenizer_escapes() {
    let (_dir, dispatcher) = dispatcher_from_file();
    let outcome = dispatcher
        .dispatch("TSV", "a\tbbb\ncc\td".to_string())
        .unwrap();
    assert_eq!(outcome.text, "a  bbb\ncc d");
    assert_eq!(outcome.responses.len(), 1);
    assert_eq!(outcome.responses[0].step, 1);
    assert_eq!(outcome.responses[0].kind, ResponseKind::Transient);
}

#[test]
fn test_persistent_response_requests_staying_open() {
    let (_dir, dispatcher) = dispatcher_from_file();
    let outcome = dispatcher.dispatch("stats", "a b c".to_string()).unwrap();
    assert_eq!(outcome.text, "a b c");
    assert!(outcome.stays_open());
    assert_eq!(outcome.responses[0].message, "1 lines, 3 words, 5 characters");
}

#[test]
fn test_failed_step_stops_chain_without_rollback() {
    let (_dir, dispatcher) = dispatcher_from_file();
    let failure = dispatcher
        .dispatch("broken", "Mixed".to_string())
        .unwrap_err();
    assert_eq!(failure.step, Some(2));
    // Step 1 applied, step 3 never ran.
    assert_eq!(failure.text, "MIXED");
    match &failure.error {
        DispatchError::Validation { editor, source } => {
            assert_eq!(editor, "sort");
            match source {
                ParameterError::Invalid {
                    name, expecting, ..
                } => {
                    assert_eq!(name, "Direction");
                    assert_eq!(expecting, "asc or desc");
                }
                other => panic!("unexpected parameter error: {other}"),
            }
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_command_with_empty_registry_and_store() {
    let dispatcher = Dispatcher::new(Registry::empty(), Ok(MacroStore::default()));
    let failure = dispatcher
        .dispatch("bogus arg", String::new())
        .unwrap_err();
    assert!(matches!(
        failure.error,
        DispatchError::UnknownCommand { ref name } if name == "bogus"
    ));
}

#[test]
fn test_unconfigured_store_is_distinct_from_unknown_command() {
    let dispatcher = Dispatcher::new(Registry::builtin(), MacroStore::load(None));
    let failure = dispatcher.dispatch("foo", String::new()).unwrap_err();
    assert!(matches!(
        failure.error,
        DispatchError::Config {
            source: MacroError::NotConfigured,
            ..
        }
    ));
}

#[test]
fn test_dispatches_share_one_dispatcher_across_threads() {
    let (_dir, dispatcher) = dispatcher_from_file();
    let dispatcher = std::sync::Arc::new(dispatcher);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let dispatcher = std::sync::Arc::clone(&dispatcher);
            std::thread::spawn(move || {
                dispatcher
                    .dispatch("upper", format!("run {i}"))
                    .unwrap()
                    .text
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("RUN {i}"));
    }
}
