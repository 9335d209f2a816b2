use std::time::{Duration, Instant};

use oteltest::{Headers, Signal, TelemetryRecorder};
use serde_json::json;

fn span_export(task: usize, seq: usize) -> serde_json::Value {
    json!({
        "resourceSpans": [{
            "scopeSpans": [{ "spans": [{ "name": format!("task-{task}"), "seq": seq }] }]
        }]
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_lose_nothing() {
    let recorder = TelemetryRecorder::new();

    let mut handles = Vec::new();
    for task in 0..8 {
        let recorder = recorder.clone();
        handles.push(tokio::spawn(async move {
            for seq in 0..50 {
                recorder.record(Signal::Trace, span_export(task, seq), Headers::new());
                if seq % 10 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let telemetry = recorder.finish();
    assert_eq!(telemetry.len(Signal::Trace), 400);
    assert_eq!(telemetry.num_spans().unwrap(), 400);
    assert_eq!(telemetry.span_names().unwrap().len(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 3)]
async fn test_one_task_per_signal() {
    let recorder = TelemetryRecorder::new();

    let logs = {
        let recorder = recorder.clone();
        tokio::spawn(async move {
            for i in 0..20 {
                recorder.add_log(json!({ "resourceLogs": [] }), Headers::new(), i);
            }
        })
    };
    let metrics = {
        let recorder = recorder.clone();
        tokio::spawn(async move {
            for i in 0..20 {
                let export = json!({
                    "resourceMetrics": [{ "scopeMetrics": [{ "metrics": [{ "name": "requests" }] }] }]
                });
                recorder.add_metric(export, Headers::new(), i);
            }
        })
    };
    let traces = {
        let recorder = recorder.clone();
        tokio::spawn(async move {
            for i in 0..20 {
                recorder.add_trace(span_export(0, i as usize), Headers::new(), i);
            }
        })
    };
    logs.await.unwrap();
    metrics.await.unwrap();
    traces.await.unwrap();

    let telemetry = recorder.finish();
    assert_eq!(telemetry.len(Signal::Log), 20);
    assert_eq!(telemetry.num_metrics().unwrap(), 20);
    assert_eq!(telemetry.num_spans().unwrap(), 20);

    // A single task appends in order, so each list stays sorted by its timestamps
    let elapsed: Vec<u64> = telemetry
        .get_trace_requests()
        .iter()
        .map(|r| r.test_elapsed_ms())
        .collect();
    assert_eq!(elapsed, (0..20).collect::<Vec<u64>>());
}

#[test]
fn test_record_stamps_elapsed_time() {
    let started = Instant::now() - Duration::from_millis(250);
    let recorder = TelemetryRecorder::starting_at(started);

    recorder.record(Signal::Metric, json!({ "resourceMetrics": [] }), Headers::new());

    let telemetry = recorder.finish();
    let stamped = telemetry.get_metric_requests()[0].test_elapsed_ms();
    assert!(stamped >= 250, "Stamp should count from run start, got {}", stamped);
}

#[test]
fn test_snapshot_and_finish_with_live_clone() {
    let recorder = TelemetryRecorder::new();
    let other = recorder.clone();

    recorder.add_trace(span_export(0, 0), Headers::new(), 1);
    let snapshot = recorder.snapshot();
    other.add_trace(span_export(0, 1), Headers::new(), 2);

    assert_eq!(snapshot.len(Signal::Trace), 1, "Snapshot is a copy");

    // `other` is still alive, so finish copies instead of unwrapping
    let telemetry = recorder.finish();
    assert_eq!(telemetry.len(Signal::Trace), 2);
    assert_eq!(other.snapshot(), telemetry);
}

#[test]
fn test_signal_from_otlp_path() {
    assert_eq!(Signal::from_otlp_path("/v1/traces"), Some(Signal::Trace));
    assert_eq!(Signal::from_otlp_path("/v1/metrics/"), Some(Signal::Metric));
    assert_eq!(Signal::from_otlp_path("/v1/logs"), Some(Signal::Log));
    assert_eq!(Signal::from_otlp_path("/v2/traces"), None);
    assert_eq!(Signal::Metric.to_string(), "metrics");
    assert_eq!(Signal::Log.requests_key(), "log_requests");
}
