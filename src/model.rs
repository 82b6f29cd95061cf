//! The classifier capability the scoring pipeline depends on.
//!
//! A model declares its input columns and maps an aligned [`FeatureVector`] to
//! the probability of the positive (approve) class. It is loaded once at startup
//! and shared read-only between requests.

use crate::models::FeatureVector;
use crate::schema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Failure inside a model invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelError(pub String);

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ModelError {}

/// A trained binary classifier.
pub trait RiskModel: Send + Sync {
    /// Input columns, in the order `predict_proba` expects them.
    fn input_columns(&self) -> &[String];

    /// Probability of the positive class for one aligned vector.
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, ModelError>;
}

/// Standardized logistic regression.
///
/// `p = 1 / (1 + exp(-(intercept + Σ coef_i * (x_i - mean_i) / scale_i)))`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub columns: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

impl LogisticModel {
    /// Checks that the artifact is internally consistent.
    pub fn validate(&self) -> anyhow::Result<()> {
        let n = self.columns.len();
        if n == 0 {
            anyhow::bail!("model declares no input columns");
        }
        if self.coefficients.len() != n || self.means.len() != n || self.scales.len() != n {
            anyhow::bail!(
                "model has {} columns but {} coefficients, {} means, {} scales",
                n,
                self.coefficients.len(),
                self.means.len(),
                self.scales.len()
            );
        }
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].contains(column) {
                anyhow::bail!("duplicate model column '{}'", column);
            }
        }
        if let Some(i) = self.scales.iter().position(|s| *s == 0.0 || !s.is_finite()) {
            anyhow::bail!("scale for column '{}' must be finite and non-zero", self.columns[i]);
        }
        if !self.intercept.is_finite()
            || self.coefficients.iter().chain(&self.means).any(|v| !v.is_finite())
        {
            anyhow::bail!("model parameters must be finite");
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads the artifact at `path`, falling back to [`LogisticModel::baseline`]
    /// when no path is given or the file does not exist.
    pub fn load_or_baseline(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) if path.exists() => {
                let json = std::fs::read_to_string(path)?;
                let model = Self::from_json(&json)
                    .map_err(|e| anyhow::anyhow!("invalid model at {}: {}", path.display(), e))?;
                tracing::info!(
                    "Loaded model from {} ({} input columns)",
                    path.display(),
                    model.columns.len()
                );
                Ok(model)
            }
            Some(path) => {
                tracing::warn!(
                    "Model file {} not found, using baseline model",
                    path.display()
                );
                Ok(Self::baseline())
            }
            None => {
                tracing::info!("Using baseline model");
                Ok(Self::baseline())
            }
        }
    }

    /// Bootstrap model over the training column layout.
    ///
    /// Approval rises with income and credit history and falls with loan size and
    /// debt-to-income; categorical indicators carry no weight.
    pub fn baseline() -> Self {
        let columns = schema::training_columns();
        let mut coefficients = vec![0.0; columns.len()];
        let mut means = vec![0.0; columns.len()];
        let mut scales = vec![1.0; columns.len()];

        // (column, coefficient, mean, scale)
        let numeric = [
            (schema::INCOME, 1.2, 7000.0, 2900.0),
            (schema::LOAN_AMOUNT, -0.6, 275.0, 130.0),
            (schema::CREDIT_HISTORY, 0.9, 0.5, 0.5),
            (schema::AGE, 0.0, 40.0, 11.0),
            (schema::DTI, -0.3, 0.045, 0.035),
            (schema::LTA, 0.0, 7.5, 5.0),
        ];
        for (name, coef, mean, scale) in numeric {
            if let Some(i) = columns.iter().position(|c| c == name) {
                coefficients[i] = coef;
                means[i] = mean;
                scales[i] = scale;
            }
        }

        Self {
            columns,
            coefficients,
            intercept: 0.0,
            means,
            scales,
        }
    }
}

impl RiskModel for LogisticModel {
    fn input_columns(&self) -> &[String] {
        &self.columns
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        if features.columns() != self.columns.as_slice() {
            return Err(ModelError(format!(
                "expected {} aligned input columns, got {}",
                self.columns.len(),
                features.columns().len()
            )));
        }

        let logit = features
            .values()
            .iter()
            .zip(&self.coefficients)
            .zip(self.means.iter().zip(&self.scales))
            .fold(self.intercept, |acc, ((x, coef), (mean, scale))| {
                acc + coef * (x - mean) / scale
            });

        Ok(1.0 / (1.0 + (-logit).exp()))
    }
}
