/// Scoring pipeline shared by the HTTP handlers.
///
/// One request runs to completion through:
/// 1. Schema validation of the raw payload
/// 2. Ratio engineering
/// 3. Categorical encoding aligned to the model's columns
/// 4. Scoring and decision
/// 5. Persistence, before anything is returned to the caller
use crate::db_storage::{PredictionStore, HISTORY_LIMIT};
use crate::encoder;
use crate::errors::{AppError, ResultExt};
use crate::features;
use crate::model::RiskModel;
use crate::models::{
    ApplicantPayload, Decision, EngineeredRecord, NewPrediction, PredictionRecord,
};
use crate::schema;
use crate::scoring::ScoringAdapter;
use std::sync::Arc;

/// Outcome of a persisted prediction.
#[derive(Debug, Clone)]
pub struct ScoredPrediction {
    pub id: i64,
    pub record: EngineeredRecord,
    pub risk_score: f64,
    pub decision: Decision,
}

#[derive(Clone)]
pub struct PredictionService {
    scorer: ScoringAdapter,
    store: PredictionStore,
}

impl PredictionService {
    pub fn new(model: Arc<dyn RiskModel>, store: PredictionStore) -> Self {
        Self {
            scorer: ScoringAdapter::new(model),
            store,
        }
    }

    /// Scores one applicant and appends the result to the prediction log.
    ///
    /// Any failure before the insert leaves the log untouched; a failed insert
    /// fails the whole call.
    pub async fn predict(&self, payload: ApplicantPayload) -> Result<ScoredPrediction, AppError> {
        let applicant = schema::validate(payload)?;
        let record = features::engineer(applicant);
        let vector = encoder::encode(&record, self.scorer.model_columns())?;
        let (risk_score, decision) = self.scorer.score(&vector)?;

        tracing::info!(
            dti = record.dti,
            lta = record.lta,
            risk_score,
            %decision,
            "Scored application"
        );

        let prediction = NewPrediction {
            record,
            risk_score,
            decision,
        };
        let id = self
            .store
            .append(&prediction)
            .await
            .context("Prediction not persisted")?;

        Ok(ScoredPrediction {
            id,
            record: prediction.record,
            risk_score,
            decision,
        })
    }

    /// Newest predictions first; `limit` defaults to and is capped at [`HISTORY_LIMIT`].
    pub async fn history(&self, limit: Option<u32>) -> Result<Vec<PredictionRecord>, AppError> {
        let limit = limit.unwrap_or(HISTORY_LIMIT).clamp(1, HISTORY_LIMIT);
        self.store.recent(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::model::LogisticModel;
    use serde_json::json;

    async fn service() -> (PredictionService, PredictionStore) {
        let db = Database::in_memory().await.unwrap();
        let store = PredictionStore::new(db.pool);
        let service = PredictionService::new(Arc::new(LogisticModel::baseline()), store.clone());
        (service, store)
    }

    fn payload(value: serde_json::Value) -> ApplicantPayload {
        serde_json::from_value(value).unwrap()
    }

    fn reference() -> serde_json::Value {
        json!({
            "income": 5000, "loan_amount": 150, "credit_history": 1, "age": 30,
            "gender": "Male", "married": "Yes", "education": "Graduate",
            "self_employed": "No", "dependents": "0", "property_area": "Urban",
            "loan_term": 360
        })
    }

    #[tokio::test]
    async fn reference_applicant_is_scored_and_stored() {
        let (service, store) = service().await;
        let scored = service.predict(payload(reference())).await.unwrap();

        assert!((scored.record.dti - 0.03).abs() < 1e-12);
        assert_eq!(scored.record.lta, 5.0);
        assert!((0.0..=1.0).contains(&scored.risk_score));
        assert_eq!(scored.decision, Decision::from_probability(scored.risk_score));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn schema_error_persists_nothing() {
        let (service, store) = service().await;
        let mut body = reference();
        body.as_object_mut().unwrap().remove("loan_term");

        let err = service.predict(payload(body)).await.unwrap_err();
        assert_eq!(err.kind(), "schema_error");
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn history_limit_is_clamped() {
        let (service, _) = service().await;
        for _ in 0..3 {
            service.predict(payload(reference())).await.unwrap();
        }
        assert_eq!(service.history(Some(0)).await.unwrap().len(), 1);
        assert_eq!(service.history(Some(2)).await.unwrap().len(), 2);
        assert_eq!(service.history(None).await.unwrap().len(), 3);
    }
}
