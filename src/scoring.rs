use crate::errors::AppError;
use crate::model::RiskModel;
use crate::models::{Decision, FeatureVector};
use std::sync::Arc;

/// Probability at or above which an application is approved.
pub const APPROVAL_THRESHOLD: f64 = 0.5;

impl Decision {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= APPROVAL_THRESHOLD {
            Decision::Approved
        } else {
            Decision::Rejected
        }
    }
}

/// Turns model probabilities into decisions.
#[derive(Clone)]
pub struct ScoringAdapter {
    model: Arc<dyn RiskModel>,
}

impl ScoringAdapter {
    pub fn new(model: Arc<dyn RiskModel>) -> Self {
        Self { model }
    }

    /// Input columns of the wrapped model.
    pub fn model_columns(&self) -> &[String] {
        self.model.input_columns()
    }

    /// Scores one aligned vector.
    ///
    /// Model failures and probabilities outside `[0, 1]` are reported as
    /// `ScoringError`; nothing is retried.
    pub fn score(&self, features: &FeatureVector) -> Result<(f64, Decision), AppError> {
        let probability = self
            .model
            .predict_proba(features)
            .map_err(|e| AppError::ScoringError(format!("model invocation failed: {}", e)))?;

        if !(0.0..=1.0).contains(&probability) {
            return Err(AppError::ScoringError(format!(
                "model returned invalid probability {}",
                probability
            )));
        }

        Ok((probability, Decision::from_probability(probability)))
    }
}
