use crate::errors::{AppError, ResultExt};
use crate::models::{Decision, NewPrediction, PredictionRecord};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

/// Largest number of rows a history query returns.
pub const HISTORY_LIMIT: u32 = 200;

/// Raw `predictions` row; `decision` is stored as its label.
#[derive(Debug, FromRow)]
struct PredictionRow {
    id: i64,
    income: i64,
    loan_amount: f64,
    credit_history: i64,
    age: i64,
    gender: String,
    married: String,
    education: String,
    self_employed: String,
    dependents: String,
    property_area: String,
    loan_term: i64,
    dti: f64,
    lta: f64,
    risk_score: f64,
    decision: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PredictionRow> for PredictionRecord {
    type Error = AppError;

    fn try_from(row: PredictionRow) -> Result<Self, Self::Error> {
        let decision = row.decision.parse::<Decision>().map_err(|e| {
            AppError::InternalError(format!("prediction {} has {}", row.id, e))
        })?;

        Ok(PredictionRecord {
            id: row.id,
            income: row.income,
            loan_amount: row.loan_amount,
            credit_history: row.credit_history,
            age: row.age,
            gender: row.gender,
            married: row.married,
            education: row.education,
            self_employed: row.self_employed,
            dependents: row.dependents,
            property_area: row.property_area,
            loan_term: row.loan_term,
            dti: row.dti,
            lta: row.lta,
            risk_score: row.risk_score,
            decision,
            created_at: row.created_at,
        })
    }
}

/// Append-only audit log of scored applications.
///
/// Rows are only ever inserted. Identities come from SQLite `AUTOINCREMENT`, so
/// they grow with insertion order and are never reused.
#[derive(Clone)]
pub struct PredictionStore {
    pool: SqlitePool,
}

impl PredictionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persists one prediction and returns its identity.
    pub async fn append(&self, prediction: &NewPrediction) -> Result<i64, AppError> {
        let a = &prediction.record.applicant;

        let result = sqlx::query(
            r#"
            INSERT INTO predictions (
                income, loan_amount, credit_history, age,
                gender, married, education, self_employed, dependents, property_area,
                loan_term, dti, lta, risk_score, decision, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(a.income)
        .bind(a.loan_amount)
        .bind(a.credit_history)
        .bind(a.age)
        .bind(&a.gender)
        .bind(&a.married)
        .bind(&a.education)
        .bind(&a.self_employed)
        .bind(&a.dependents)
        .bind(&a.property_area)
        .bind(a.loan_term)
        .bind(prediction.record.dti)
        .bind(prediction.record.lta)
        .bind(prediction.risk_score)
        .bind(prediction.decision.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .context("Failed to insert prediction")?;

        let id = result.last_insert_rowid();
        tracing::debug!("Stored prediction {}", id);

        Ok(id)
    }

    /// Up to `limit` newest predictions, newest first.
    pub async fn recent(&self, limit: u32) -> Result<Vec<PredictionRecord>, AppError> {
        let rows = sqlx::query_as::<_, PredictionRow>(
            r#"
            SELECT id, income, loan_amount, credit_history, age,
                   gender, married, education, self_employed, dependents, property_area,
                   loan_term, dti, lta, risk_score, decision, created_at
            FROM predictions
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .context("Failed to load prediction history")?;

        rows.into_iter().map(PredictionRecord::try_from).collect()
    }

    /// Total number of stored predictions.
    pub async fn count(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM predictions")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count predictions")?;
        Ok(count)
    }
}
