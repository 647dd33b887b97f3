use crate::model::{IncidentStatus, IncidentType};

/// List filters carried in the page query string. Severity is not
/// filterable because the incident API has no parameter for it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IncidentFilter {
    pub status: Option<IncidentStatus>,
    pub kind: Option<IncidentType>,
}

impl IncidentFilter {
    /// Reads `status` and `type` from a query string, with or without the
    /// leading `?`. Unknown and empty values are dropped.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut filter = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "status" => filter.status = IncidentStatus::parse(&value),
                "type" => filter.kind = IncidentType::parse(&value),
                _ => {}
            }
        }
        filter
    }

    pub fn to_query(&self) -> String {
        let mut out = url::form_urlencoded::Serializer::new(String::new());
        if let Some(status) = self.status {
            out.append_pair("status", status.as_str());
        }
        if let Some(kind) = self.kind {
            out.append_pair("type", kind.as_str());
        }
        out.finish()
    }

    /// API path for the incident list under this filter.
    pub fn incidents_path(&self) -> String {
        let query = self.to_query();
        if query.is_empty() {
            "/incidents".to_string()
        } else {
            format!("/incidents?{query}")
        }
    }

    /// Updates one filter from a `<select>` value, where `""` means "all".
    pub fn with_status_value(mut self, value: &str) -> Self {
        self.status = IncidentStatus::parse(value);
        self
    }

    pub fn with_type_value(mut self, value: &str) -> Self {
        self.kind = IncidentType::parse(value);
        self
    }

    pub fn status_value(&self) -> &'static str {
        self.status.map(IncidentStatus::as_str).unwrap_or("")
    }

    pub fn type_value(&self) -> &'static str {
        self.kind.map(IncidentType::as_str).unwrap_or("")
    }
}
