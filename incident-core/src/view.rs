use crate::model::{Evidence, Incident, IncidentStatus, RcaReport, Severity};
use chrono::{DateTime, Local, NaiveDateTime};

pub const LOADING_INCIDENTS: &str = "Loading incidents...";
pub const LOADING_DETAIL: &str = "Loading incident details...";
pub const NOT_FOUND: &str = "Incident not found.";
pub const NO_RCA: &str = "No RCA report available.";
pub const NO_EVIDENCE: &str = "No evidence available.";

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Loading / error / loaded, the only states a page goes through.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Failed(String),
    Loaded(T),
}

impl<T> ViewState<T> {
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Self::Loaded(v),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(v) => Some(v),
            _ => None,
        }
    }

    pub fn error_text(&self) -> Option<String> {
        match self {
            Self::Failed(msg) => Some(format!("Error: {msg}")),
            _ => None,
        }
    }
}

pub fn severity_badge_class(severity: &Severity) -> &'static str {
    match severity {
        Severity::Low => "bg-blue-100 text-blue-800",
        Severity::Medium => "bg-yellow-100 text-yellow-800",
        Severity::High => "bg-orange-100 text-orange-800",
        Severity::Critical => "bg-red-100 text-red-800",
        Severity::Unknown(_) => "bg-gray-100 text-gray-800",
    }
}

/// First eight characters followed by an ellipsis.
pub fn short_id(id: &str) -> String {
    let head: String = id.chars().take(8).collect();
    format!("{head}...")
}

pub fn incident_href(id: &str) -> String {
    format!("/incidents/{id}")
}

/// Accepts RFC 3339 (converted to local time) and the zone-less
/// `2024-05-01T10:00:05[.fff]` form the API emits. Anything else is shown
/// as received.
pub fn display_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(DISPLAY_FORMAT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(DISPLAY_FORMAT).to_string();
    }
    raw.to_string()
}

fn display_opt(raw: Option<&String>) -> String {
    raw.map(|s| display_timestamp(s)).unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq)]
pub struct IncidentRow {
    pub id: String,
    pub short_id: String,
    pub endpoint: String,
    pub kind: &'static str,
    pub status: &'static str,
    pub severity: String,
    pub severity_class: &'static str,
    pub detected_at: String,
    pub href: String,
}

impl IncidentRow {
    pub fn from_incident(incident: &Incident) -> Self {
        Self {
            id: incident.id.clone(),
            short_id: short_id(&incident.id),
            endpoint: incident.endpoint_id.clone(),
            kind: incident.kind.as_str(),
            status: incident.status.as_str(),
            severity: incident.severity.as_str().to_string(),
            severity_class: severity_badge_class(&incident.severity),
            detected_at: display_opt(incident.detected_at.as_ref()),
            href: incident_href(&incident.id),
        }
    }
}

pub fn incident_rows(incidents: &[Incident]) -> Vec<IncidentRow> {
    incidents.iter().map(IncidentRow::from_incident).collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Actions {
    pub acknowledge: bool,
    pub resolve: bool,
}

pub fn available_actions(status: IncidentStatus) -> Actions {
    Actions {
        acknowledge: status == IncidentStatus::Open,
        resolve: matches!(status, IncidentStatus::Open | IncidentStatus::Acknowledged),
    }
}

/// Label/value pairs for the overview card. Acknowledged and resolved times
/// only appear once set.
pub fn overview_lines(incident: &Incident) -> Vec<(&'static str, String)> {
    let mut lines = vec![
        ("Endpoint ID", incident.endpoint_id.clone()),
        ("Type", incident.kind.as_str().to_string()),
        ("Status", incident.status.as_str().to_string()),
        ("Severity", incident.severity.as_str().to_string()),
        ("Detected At", display_opt(incident.detected_at.as_ref())),
    ];
    if let Some(ts) = &incident.acknowledged_at {
        lines.push(("Acknowledged At", display_timestamp(ts)));
    }
    if let Some(ts) = &incident.resolved_at {
        lines.push(("Resolved At", display_timestamp(ts)));
    }
    lines
}

pub fn timeline_entries(incident: &Incident) -> Vec<String> {
    [
        ("Triggered At", &incident.triggered_at),
        ("Detected At", &incident.detected_at),
        ("Acknowledged At", &incident.acknowledged_at),
        ("Resolved At", &incident.resolved_at),
    ]
    .into_iter()
    .filter_map(|(label, ts)| {
        ts.as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| format!("{label}: {}", display_timestamp(s)))
    })
    .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct RcaPanel {
    pub status: String,
    pub summary: String,
    pub likely_trigger: String,
    pub confidence: String,
    pub affected_endpoints: Option<String>,
    pub severity_reason: String,
    pub rollback_vs_patch: String,
    pub recommended_fixes: Vec<String>,
}

impl RcaPanel {
    pub fn from_report(report: &RcaReport) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            status: text(&report.status),
            summary: text(&report.root_cause_summary),
            likely_trigger: text(&report.likely_trigger),
            confidence: report.confidence.map(|c| c.to_string()).unwrap_or_default(),
            affected_endpoints: (!report.affected_endpoints.is_empty())
                .then(|| report.affected_endpoints.join(", ")),
            severity_reason: text(&report.severity_reason),
            rollback_vs_patch: text(&report.rollback_vs_patch_recommendation),
            recommended_fixes: report.recommended_fixes.clone(),
        }
    }
}

pub fn evidence_heading(evidence: &Evidence) -> String {
    format!(
        "Evidence Type: {} (Created: {})",
        evidence.evidence_type.as_str(),
        display_opt(evidence.created_at.as_ref())
    )
}

pub fn toggle_label(expanded: bool) -> &'static str {
    if expanded {
        "Collapse"
    } else {
        "Expand"
    }
}
