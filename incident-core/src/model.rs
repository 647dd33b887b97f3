use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentStatus {
    Open,
    Acknowledged,
    Resolved,
}

impl IncidentStatus {
    pub const ALL: [IncidentStatus; 3] = [Self::Open, Self::Acknowledged, Self::Resolved];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Acknowledged => "ACKNOWLEDGED",
            Self::Resolved => "RESOLVED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentType {
    ErrorSpike,
    LatencyRegression,
    ContractBreak,
    TrafficDrop,
}

impl IncidentType {
    pub const ALL: [IncidentType; 4] = [
        Self::ErrorSpike,
        Self::LatencyRegression,
        Self::ContractBreak,
        Self::TrafficDrop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ErrorSpike => "ERROR_SPIKE",
            Self::LatencyRegression => "LATENCY_REGRESSION",
            Self::ContractBreak => "CONTRACT_BREAK",
            Self::TrafficDrop => "TRAFFIC_DROP",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

/// Severity as reported by the API. Values this dashboard does not know
/// about keep their text in `Unknown` and render with the neutral badge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    Unknown(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "LOW" => Self::Low,
            "MEDIUM" => Self::Medium,
            "HIGH" => Self::High,
            "CRITICAL" => Self::Critical,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Evidence kinds with a dedicated body. Anything else is kept verbatim in
/// `Other` and shown as raw JSON.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EvidenceType {
    SchemaDiff,
    Metrics,
    SampleErrors,
    Timeline,
    Other(String),
}

impl EvidenceType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::SchemaDiff => "SCHEMA_DIFF",
            Self::Metrics => "METRICS",
            Self::SampleErrors => "SAMPLE_ERRORS",
            Self::Timeline => "TIMELINE",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for EvidenceType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "SCHEMA_DIFF" => Self::SchemaDiff,
            "METRICS" => Self::Metrics,
            "SAMPLE_ERRORS" => Self::SampleErrors,
            "TIMELINE" => Self::Timeline,
            _ => Self::Other(raw),
        }
    }
}

impl From<EvidenceType> for String {
    fn from(kind: EvidenceType) -> Self {
        match kind {
            EvidenceType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Timestamps stay as the strings the API sent; `view::display_timestamp`
/// turns them into something readable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    #[serde(default)]
    pub endpoint_id: String,
    #[serde(rename = "type")]
    pub kind: IncidentType,
    pub status: IncidentStatus,
    pub severity: Severity,
    #[serde(default)]
    pub triggered_at: Option<String>,
    #[serde(default)]
    pub detected_at: Option<String>,
    #[serde(default)]
    pub acknowledged_at: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub id: String,
    #[serde(default)]
    pub incident_id: Option<String>,
    pub evidence_type: EvidenceType,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcaReport {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub incident_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub root_cause_summary: Option<String>,
    #[serde(default)]
    pub likely_trigger: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub affected_endpoints: Vec<String>,
    #[serde(default)]
    pub severity_reason: Option<String>,
    #[serde(default)]
    pub rollback_vs_patch_recommendation: Option<String>,
    #[serde(default)]
    pub recommended_fixes: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Mutations offered on the detail page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncidentAction {
    Acknowledge,
    Resolve,
}

impl IncidentAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Acknowledge => "Acknowledge",
            Self::Resolve => "Resolve",
        }
    }
}

/// Everything the detail page shows for one incident.
#[derive(Clone, Debug, PartialEq)]
pub struct IncidentDetail {
    pub incident: Incident,
    pub evidence: Vec<Evidence>,
    pub rca: Option<RcaReport>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub jwt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incident_decodes_api_shape() {
        let raw = serde_json::json!({
            "id": "5b1f3c2e-0000-4000-8000-000000000001",
            "endpointId": "GET /orders",
            "type": "LATENCY_REGRESSION",
            "status": "ACKNOWLEDGED",
            "severity": "HIGH",
            "triggeredAt": "2024-05-01T10:00:00",
            "detectedAt": "2024-05-01T10:00:05",
            "acknowledgedAt": "2024-05-01T10:03:00",
            "resolvedAt": null
        });
        let incident: Incident = serde_json::from_value(raw).expect("decode");
        assert_eq!(incident.kind, IncidentType::LatencyRegression);
        assert_eq!(incident.status, IncidentStatus::Acknowledged);
        assert_eq!(incident.severity, Severity::High);
        assert_eq!(incident.resolved_at, None);
    }

    #[test]
    fn unknown_severity_and_evidence_type_keep_api_text() {
        let sev: Severity = serde_json::from_value(serde_json::json!("SEV0")).expect("severity");
        assert_eq!(sev, Severity::Unknown("SEV0".into()));
        assert_eq!(sev.as_str(), "SEV0");
        let ev: EvidenceType =
            serde_json::from_value(serde_json::json!("TRACE_SAMPLE")).expect("evidence type");
        assert_eq!(ev, EvidenceType::Other("TRACE_SAMPLE".into()));
        assert_eq!(serde_json::to_value(&ev).expect("encode"), serde_json::json!("TRACE_SAMPLE"));
    }

    #[test]
    fn known_severity_decodes_to_its_variant() {
        let sev: Severity = serde_json::from_value(serde_json::json!("CRITICAL")).expect("severity");
        assert_eq!(sev, Severity::Critical);
        assert_eq!(serde_json::to_value(Severity::Low).expect("encode"), serde_json::json!("LOW"));
    }

    #[test]
    fn rca_report_tolerates_missing_lists() {
        let raw = serde_json::json!({
            "status": "COMPLETED",
            "rootCauseSummary": "connection pool exhausted",
            "confidence": 0.82
        });
        let report: RcaReport = serde_json::from_value(raw).expect("decode");
        assert!(report.recommended_fixes.is_empty());
        assert!(report.affected_endpoints.is_empty());
        assert_eq!(report.confidence, Some(0.82));
    }

    #[test]
    fn status_parse_rejects_lowercase() {
        assert_eq!(IncidentStatus::parse("OPEN"), Some(IncidentStatus::Open));
        assert_eq!(IncidentStatus::parse("open"), None);
        assert_eq!(IncidentType::parse("TRAFFIC_DROP"), Some(IncidentType::TrafficDrop));
    }
}
