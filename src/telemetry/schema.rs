//! Traversal of the nested OTLP export payloads.
//!
//! Every export request nests its data points three levels deep:
//! `resource* -> scope* -> leaf*`. Queries on `Telemetry` walk that shape
//! exactly and report the first place where a payload diverges from it.

use std::collections::BTreeSet;

use serde_json::Value;

use super::request::Request;
use super::signal::Signal;
use crate::error::TelemetryError;

/// Key names of one signal's nesting levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSchema {
    pub resource: &'static str,
    pub scope: &'static str,
    pub leaf: &'static str,
}

pub const METRICS: ExportSchema = ExportSchema {
    resource: "resourceMetrics",
    scope: "scopeMetrics",
    leaf: "metrics",
};

pub const SPANS: ExportSchema = ExportSchema {
    resource: "resourceSpans",
    scope: "scopeSpans",
    leaf: "spans",
};

pub const LOG_RECORDS: ExportSchema = ExportSchema {
    resource: "resourceLogs",
    scope: "scopeLogs",
    leaf: "logRecords",
};

impl ExportSchema {
    pub fn for_signal(signal: Signal) -> ExportSchema {
        match signal {
            Signal::Log => LOG_RECORDS,
            Signal::Metric => METRICS,
            Signal::Trace => SPANS,
        }
    }
}

/// Locates errors: which request of which signal is being walked.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    signal: Signal,
    index: usize,
}

impl Cursor {
    fn missing(&self, path: String) -> TelemetryError {
        TelemetryError::MissingField {
            signal: self.signal,
            index: self.index,
            path,
        }
    }

    fn mismatch(&self, path: String, expected: &'static str) -> TelemetryError {
        TelemetryError::TypeMismatch {
            signal: self.signal,
            index: self.index,
            path,
            expected,
        }
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn array_field<'a>(
    value: &'a Value,
    key: &str,
    parent: &str,
    cursor: Cursor,
) -> Result<&'a [Value], TelemetryError> {
    let object = value.as_object().ok_or_else(|| {
        let path = if parent.is_empty() { "$".to_string() } else { parent.to_string() };
        cursor.mismatch(path, "an object")
    })?;
    match object.get(key) {
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(cursor.mismatch(join(parent, key), "an array")),
        None => Err(cursor.missing(join(parent, key))),
    }
}

/// Calls `visit` once per innermost leaf list, in arrival order. The path
/// handed to `visit` names the leaf list, e.g.
/// `resourceMetrics[0].scopeMetrics[1].metrics`.
fn walk_leaf_lists<'a, F>(
    signal: Signal,
    requests: &'a [Request],
    schema: ExportSchema,
    mut visit: F,
) -> Result<(), TelemetryError>
where
    F: FnMut(Cursor, &str, &'a [Value]) -> Result<(), TelemetryError>,
{
    for (index, request) in requests.iter().enumerate() {
        let cursor = Cursor { signal, index };
        let resources = array_field(request.message(), schema.resource, "", cursor)?;
        for (r, resource) in resources.iter().enumerate() {
            let resource_path = format!("{}[{r}]", schema.resource);
            let scopes = array_field(resource, schema.scope, &resource_path, cursor)?;
            for (s, scope) in scopes.iter().enumerate() {
                let scope_path = format!("{resource_path}.{}[{s}]", schema.scope);
                let leaves = array_field(scope, schema.leaf, &scope_path, cursor)?;
                visit(cursor, &join(&scope_path, schema.leaf), leaves)?;
            }
        }
    }
    Ok(())
}

/// Sum of the innermost list lengths over all requests.
pub fn count_leaves(
    signal: Signal,
    requests: &[Request],
    schema: ExportSchema,
) -> Result<usize, TelemetryError> {
    let mut out = 0;
    walk_leaf_lists(signal, requests, schema, |_, _, leaves| {
        out += leaves.len();
        Ok(())
    })?;
    Ok(out)
}

/// Distinct `name` fields of every leaf entry. Sorted by construction.
pub fn collect_names(
    signal: Signal,
    requests: &[Request],
    schema: ExportSchema,
) -> Result<BTreeSet<String>, TelemetryError> {
    let mut out = BTreeSet::new();
    walk_leaf_lists(signal, requests, schema, |cursor, path, leaves| {
        for (i, leaf) in leaves.iter().enumerate() {
            let entry_path = format!("{path}[{i}]");
            let object = leaf
                .as_object()
                .ok_or_else(|| cursor.mismatch(entry_path.clone(), "an object"))?;
            match object.get("name") {
                Some(Value::String(name)) => {
                    out.insert(name.clone());
                }
                Some(_) => return Err(cursor.mismatch(format!("{entry_path}.name"), "a string")),
                None => return Err(cursor.missing(format!("{entry_path}.name"))),
            }
        }
        Ok(())
    })?;
    Ok(out)
}
