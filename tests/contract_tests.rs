use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use oteltest::{ContractError, Headers, OtelTest, ScriptTest, Telemetry};
use serde_json::json;

// A hand-written test definition, the way a script author would provide one
struct FlaskTest {
    seen_spans: Option<usize>,
}

impl OtelTest for FlaskTest {
    fn environment_variables(&self) -> HashMap<String, String> {
        HashMap::from([("OTEL_SERVICE_NAME".to_string(), "flask-app".to_string())])
    }

    fn requirements(&self) -> Vec<String> {
        vec!["flask==3.0.0".to_string(), "opentelemetry-distro".to_string()]
    }

    fn wrapper_command(&self) -> String {
        "opentelemetry-instrument".to_string()
    }

    fn on_start(&mut self) -> Option<Duration> {
        Some(Duration::from_secs(10))
    }

    fn on_stop(&mut self, telemetry: &Telemetry, _stdout: &str, _stderr: &str, returncode: i32) {
        assert_eq!(returncode, 0);
        self.seen_spans = telemetry.num_spans().ok();
    }
}

fn run_callbacks(test: &mut dyn OtelTest, telemetry: &Telemetry) -> Option<Duration> {
    let wait = test.on_start();
    test.on_stop(telemetry, "out", "err", 0);
    wait
}

#[test]
fn test_trait_implementation_used_as_object() {
    let mut telemetry = Telemetry::new();
    telemetry.add_trace(
        json!({ "resourceSpans": [{ "scopeSpans": [{ "spans": [{ "name": "GET /" }] }] }] }),
        Headers::new(),
        12,
    );

    let mut test = FlaskTest { seen_spans: None };
    assert_eq!(test.wrapper_command(), "opentelemetry-instrument");
    assert_eq!(test.requirements().len(), 2);
    assert_eq!(
        test.environment_variables().get("OTEL_SERVICE_NAME").map(String::as_str),
        Some("flask-app")
    );

    let wait = run_callbacks(&mut test, &telemetry);
    assert_eq!(wait, Some(Duration::from_secs(10)));
    assert_eq!(test.seen_spans, Some(1));
}

#[test]
fn test_builder_complete() {
    let stops = Arc::new(Mutex::new(Vec::new()));
    let recorded = stops.clone();

    let mut test = ScriptTest::builder()
        .environment_variables([("OTEL_METRIC_EXPORT_INTERVAL", "100")])
        .requirements(["opentelemetry-sdk"])
        .wrapper_command("")
        .on_start(|| None)
        .on_stop(move |telemetry: &Telemetry, stdout: &str, _stderr: &str, returncode: i32| {
            recorded
                .lock()
                .unwrap()
                .push((telemetry.is_empty(), stdout.to_string(), returncode));
        })
        .build()
        .expect("All capabilities supplied");

    assert_eq!(test.wrapper_command(), "", "Empty runs the script directly");
    assert_eq!(test.requirements(), vec!["opentelemetry-sdk".to_string()]);
    assert_eq!(
        test.environment_variables().get("OTEL_METRIC_EXPORT_INTERVAL").map(String::as_str),
        Some("100")
    );

    let wait = run_callbacks(&mut test, &Telemetry::new());
    assert_eq!(wait, None, "Wait for the script to exit on its own");
    assert_eq!(*stops.lock().unwrap(), vec![(true, "out".to_string(), 0)]);
}

#[test]
fn test_builder_names_missing_capability() {
    let err = ScriptTest::builder()
        .environment_variables(Vec::<(String, String)>::new())
        .requirements(Vec::<String>::new())
        .wrapper_command("")
        .on_start(|| None)
        .build()
        .unwrap_err();
    assert_eq!(err, ContractError::Unimplemented("on_stop"));
    assert_eq!(
        err.to_string(),
        "test definition does not implement contract method `on_stop`"
    );

    let err = ScriptTest::builder()
        .requirements(Vec::<String>::new())
        .build()
        .unwrap_err();
    assert_eq!(err, ContractError::Unimplemented("environment_variables"));

    let err = ScriptTest::builder()
        .environment_variables(Vec::<(String, String)>::new())
        .requirements(Vec::<String>::new())
        .on_start(|| Some(Duration::from_millis(500)))
        .on_stop(|_: &Telemetry, _: &str, _: &str, _: i32| {})
        .build()
        .unwrap_err();
    assert_eq!(err, ContractError::Unimplemented("wrapper_command"));
}
