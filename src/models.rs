use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============ Request Models ============

/// Raw `/predict` body as submitted by clients.
///
/// Every field is optional at this layer so that a missing key surfaces as a
/// schema error naming the field, instead of an opaque deserialization failure.
/// Integer-valued fields are taken as JSON numbers and truncated toward zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicantPayload {
    pub income: Option<serde_json::Number>,
    pub loan_amount: Option<f64>,
    pub credit_history: Option<serde_json::Number>,
    pub age: Option<serde_json::Number>,
    pub gender: Option<String>,
    pub married: Option<String>,
    pub education: Option<String>,
    pub self_employed: Option<String>,
    pub dependents: Option<String>,
    pub property_area: Option<String>,
    pub loan_term: Option<serde_json::Number>,
}

/// Query parameters for `GET /history`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of rows to return. Clamped to the history window.
    pub limit: Option<u32>,
}

// ============ Pipeline Models ============

/// A validated applicant, keyed by canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub income: i64,
    pub loan_amount: f64,
    pub credit_history: i64,
    pub age: i64,
    pub gender: String,
    pub married: String,
    pub education: String,
    pub self_employed: String,
    pub dependents: String,
    pub property_area: String,
    pub loan_term: i64,
}

/// Applicant plus the derived debt-to-income and loan-to-age ratios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineeredRecord {
    #[serde(flatten)]
    pub applicant: ApplicantRecord,
    pub dti: f64,
    pub lta: f64,
}

/// Numeric model input, column-aligned to a model's declared schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub(crate) fn new(columns: Vec<String>, values: Vec<f64>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of a named column, if the vector carries it.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }
}

/// Binary outcome of a scored application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "Approved",
            Decision::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Approved" => Ok(Decision::Approved),
            "Rejected" => Ok(Decision::Rejected),
            other => Err(format!("unknown decision '{}'", other)),
        }
    }
}

// ============ Database Models ============

/// A scored application ready to be appended to the prediction log.
#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub record: EngineeredRecord,
    pub risk_score: f64,
    pub decision: Decision,
}

/// One row of the `predictions` audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Auto-assigned identity; increases with insertion order.
    pub id: i64,
    pub income: i64,
    pub loan_amount: f64,
    pub credit_history: i64,
    pub age: i64,
    pub gender: String,
    pub married: String,
    pub education: String,
    pub self_employed: String,
    pub dependents: String,
    pub property_area: String,
    pub loan_term: i64,
    pub dti: f64,
    pub lta: f64,
    pub risk_score: f64,
    pub decision: Decision,
    /// Time the row was written.
    pub created_at: DateTime<Utc>,
}

// ============ Response Models ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub risk_score: f64,
    pub decision: Decision,
}
