use crate::model::{Evidence, EvidenceType};
use serde_json::Value;

/// What an expanded evidence entry renders, picked by evidence type.
#[derive(Clone, Debug, PartialEq)]
pub enum EvidenceBody {
    SchemaDiff {
        old_schema: String,
        new_schema: String,
        changes: Vec<String>,
    },
    Metrics {
        current: String,
        baseline: String,
    },
    Raw(String),
    Empty,
}

pub const NO_DATA: &str = "No data available for this evidence.";

pub fn render_evidence(evidence: &Evidence) -> EvidenceBody {
    match &evidence.data {
        Some(data) if !data.is_null() => render_data(&evidence.evidence_type, data),
        _ => EvidenceBody::Empty,
    }
}

fn render_data(kind: &EvidenceType, data: &Value) -> EvidenceBody {
    match kind {
        EvidenceType::SchemaDiff => schema_diff(data),
        EvidenceType::Metrics => EvidenceBody::Metrics {
            current: pretty_or_blank(data.get("currentMetrics")),
            baseline: pretty_or_blank(data.get("baselineMetrics")),
        },
        EvidenceType::SampleErrors | EvidenceType::Timeline | EvidenceType::Other(_) => {
            EvidenceBody::Raw(pretty(data))
        }
    }
}

fn schema_diff(data: &Value) -> EvidenceBody {
    let empty = Value::Object(Default::default());
    let old_schema = data.get("oldSchema").filter(|v| truthy(v)).unwrap_or(&empty);
    let new_schema = data.get("newSchema").filter(|v| truthy(v)).unwrap_or(&empty);
    let changes = data
        .get("changes")
        .and_then(Value::as_array)
        .map(|xs| xs.iter().map(describe_change).collect())
        .unwrap_or_default();

    EvidenceBody::SchemaDiff {
        old_schema: pretty(old_schema),
        new_schema: pretty(new_schema),
        changes,
    }
}

/// `removed: /field` or `changed: /field (from int to string)`.
pub fn describe_change(change: &Value) -> String {
    let mut line = format!(
        "{}: {}",
        inline(change.get("type")),
        inline(change.get("path"))
    );
    if let (Some(old), Some(new)) = (
        change.get("oldValue").filter(|v| truthy(v)),
        change.get("newValue").filter(|v| truthy(v)),
    ) {
        line.push_str(&format!(" (from {} to {})", inline(Some(old)), inline(Some(new))));
    }
    line
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn inline(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn pretty_or_blank(value: Option<&Value>) -> String {
    value.map(pretty).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn evidence(kind: EvidenceType, data: Option<Value>) -> Evidence {
        Evidence {
            id: "ev-1".into(),
            incident_id: Some("inc-1".into()),
            evidence_type: kind,
            data,
            created_at: Some("2024-05-01T10:00:05".into()),
        }
    }

    #[test]
    fn schema_diff_splits_old_new_and_changes() {
        let body = render_evidence(&evidence(
            EvidenceType::SchemaDiff,
            Some(json!({
                "oldSchema": {"id": "string"},
                "newSchema": {"id": "integer"},
                "changes": [
                    {"path": "/id", "type": "type_changed", "oldValue": "string", "newValue": "integer"},
                    {"path": "/email", "type": "removed"}
                ]
            })),
        ));

        let EvidenceBody::SchemaDiff {
            old_schema,
            new_schema,
            changes,
        } = body
        else {
            panic!("expected schema diff");
        };
        assert_eq!(old_schema, "{\n  \"id\": \"string\"\n}");
        assert_eq!(new_schema, "{\n  \"id\": \"integer\"\n}");
        assert_eq!(
            changes,
            vec![
                "type_changed: /id (from string to integer)".to_string(),
                "removed: /email".to_string(),
            ]
        );
    }

    #[test]
    fn schema_diff_defaults_missing_schemas_to_empty_object() {
        let body = render_evidence(&evidence(EvidenceType::SchemaDiff, Some(json!({}))));
        assert_eq!(
            body,
            EvidenceBody::SchemaDiff {
                old_schema: "{}".into(),
                new_schema: "{}".into(),
                changes: vec![],
            }
        );
    }

    #[test]
    fn change_range_needs_both_values_truthy() {
        let line = describe_change(&json!({"path": "/n", "type": "changed", "oldValue": 0, "newValue": 5}));
        assert_eq!(line, "changed: /n");
        let line = describe_change(&json!({"path": "/n", "type": "changed", "oldValue": 1, "newValue": 5}));
        assert_eq!(line, "changed: /n (from 1 to 5)");
    }

    #[test]
    fn metrics_shows_current_and_baseline() {
        let body = render_evidence(&evidence(
            EvidenceType::Metrics,
            Some(json!({
                "currentMetrics": {"p95": 900},
                "baselineMetrics": {"p95": 120}
            })),
        ));
        assert_eq!(
            body,
            EvidenceBody::Metrics {
                current: "{\n  \"p95\": 900\n}".into(),
                baseline: "{\n  \"p95\": 120\n}".into(),
            }
        );
    }

    #[test]
    fn metrics_without_baseline_renders_blank_side() {
        let body = render_evidence(&evidence(
            EvidenceType::Metrics,
            Some(json!({"currentMetrics": {"rps": 3}})),
        ));
        let EvidenceBody::Metrics { baseline, .. } = body else {
            panic!("expected metrics");
        };
        assert!(baseline.is_empty());
    }

    #[test]
    fn other_types_dump_raw_json() {
        for kind in [
            EvidenceType::SampleErrors,
            EvidenceType::Timeline,
            EvidenceType::Other("TRACE_SAMPLE".into()),
        ] {
            let body = render_evidence(&evidence(kind, Some(json!({"a": 1}))));
            assert_eq!(body, EvidenceBody::Raw("{\n  \"a\": 1\n}".into()));
        }
    }

    #[test]
    fn missing_data_is_empty() {
        assert_eq!(
            render_evidence(&evidence(EvidenceType::Metrics, None)),
            EvidenceBody::Empty
        );
        assert_eq!(
            render_evidence(&evidence(EvidenceType::Timeline, Some(Value::Null))),
            EvidenceBody::Empty
        );
    }
}
