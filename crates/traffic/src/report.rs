//! Traffic report model and boundary parsing.
//!
//! Remote documents are loosely shaped: fields go missing, numbers arrive as
//! strings, timestamps come in several encodings. [`parse_report`] is the one
//! place that deals with that; everything downstream works on a validated
//! [`TrafficReport`].

use crate::time::normalize_timestamp;
use clearway_geo::Coordinate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Username shown when the reporter did not provide one.
pub const ANONYMOUS: &str = "Anonymous";

/// Kind of traffic incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Collision or breakdown
    Accident,
    /// Congestion
    Traffic,
    /// Road closed
    Roadblock,
    /// Road works
    Construction,
    /// Anything else, including unrecognised values
    #[default]
    Unknown,
}

impl ReportType {
    /// Lenient parse; unrecognised values map to [`ReportType::Unknown`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "accident" => Self::Accident,
            "traffic" => Self::Traffic,
            "roadblock" => Self::Roadblock,
            "construction" => Self::Construction,
            _ => Self::Unknown,
        }
    }

    /// Stored identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accident => "accident",
            Self::Traffic => "traffic",
            Self::Roadblock => "roadblock",
            Self::Construction => "construction",
            Self::Unknown => "unknown",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Accident => "Accident",
            Self::Traffic => "Traffic",
            Self::Roadblock => "Roadblock",
            Self::Construction => "Construction",
            Self::Unknown => "Other",
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-submitted traffic report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficReport {
    /// Store-assigned identity
    pub id: String,
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
    /// Reporter name
    pub username: String,
    /// Incident kind
    #[serde(rename = "type")]
    pub report_type: ReportType,
    /// Free-text comment
    pub comment: String,
    /// Creation time; `None` when missing or unparseable
    pub created_at_ms: Option<i64>,
}

impl TrafficReport {
    /// Report with defaults for everything but identity and position.
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
            username: ANONYMOUS.to_string(),
            report_type: ReportType::Unknown,
            comment: String::new(),
            created_at_ms: None,
        }
    }

    /// Builder-style method to set the creation time
    #[must_use]
    pub fn with_created_at(mut self, created_at_ms: i64) -> Self {
        self.created_at_ms = Some(created_at_ms);
        self
    }

    /// Builder-style method to set the incident kind
    #[must_use]
    pub fn with_type(mut self, report_type: ReportType) -> Self {
        self.report_type = report_type;
        self
    }

    /// Position as a coordinate.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// True if the position is a valid coordinate.
    pub fn has_valid_position(&self) -> bool {
        self.coordinate().is_valid()
    }

    /// Age at `now_ms`. A missing timestamp counts as brand new.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        self.created_at_ms
            .map_or(0, |created| now_ms.saturating_sub(created))
    }
}

/// A report with its distance from the query origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedReport {
    /// The report itself
    #[serde(flatten)]
    pub report: TrafficReport,
    /// Great-circle distance from the origin
    pub distance_km: f64,
}

/// Builds a report from a raw store document.
///
/// `lat`/`lng` must be JSON numbers forming a valid coordinate, otherwise the
/// document is rejected. Empty or missing text fields get their defaults. The
/// creation time is read from `timestamp`, then `createAt`, then `createdAt`,
/// taking the first one that is present and not falsy.
pub fn parse_report(id: &str, raw: &Value) -> Option<TrafficReport> {
    let doc = raw.as_object()?;
    if id.is_empty() {
        return None;
    }

    let lat = doc.get("lat").and_then(Value::as_f64)?;
    let lng = doc.get("lng").and_then(Value::as_f64)?;
    if !Coordinate::new(lat, lng).is_valid() {
        return None;
    }

    let text = |field: &str| {
        doc.get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    let created_at_ms = ["timestamp", "createAt", "createdAt"]
        .iter()
        .filter_map(|field| doc.get(*field))
        .find(|v| is_truthy(v))
        .and_then(normalize_timestamp);

    Some(TrafficReport {
        id: id.to_string(),
        lat,
        lng,
        username: text("username").unwrap_or(ANONYMOUS).to_string(),
        report_type: text("type").map(ReportType::parse).unwrap_or_default(),
        comment: text("comment").unwrap_or_default().to_string(),
        created_at_ms,
    })
}

/// Parses a batch of documents that carry their own `id` field.
///
/// Accepts either an array of documents or an object keyed by document id.
/// Unusable documents are skipped, never fatal to the batch.
pub fn parse_reports(raw: &Value) -> Vec<TrafficReport> {
    match raw {
        Value::Array(docs) => docs
            .iter()
            .filter_map(|doc| {
                let id = document_id(doc.get("id"));
                let report = id.as_deref().and_then(|id| parse_report(id, doc));
                if report.is_none() {
                    debug!(id = ?id, "Skipping unusable report document");
                }
                report
            })
            .collect(),
        Value::Object(docs) => docs
            .iter()
            .filter_map(|(id, doc)| {
                let report = parse_report(id, doc);
                if report.is_none() {
                    debug!(id = %id, "Skipping unusable report document");
                }
                report
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn document_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
