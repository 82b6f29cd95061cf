//! Categorical encoding and model-schema alignment.
//!
//! Encoding happens in two explicit steps:
//! 1. `dummy_encode` turns an engineered record into named numeric columns, with
//!    one indicator per non-reference level of every categorical field.
//! 2. `align` projects those columns onto the model's declared input schema:
//!    declared indicator columns that were not produced are zero-filled, produced
//!    columns the model does not declare are dropped, and the result follows the
//!    model's column order exactly.
//!
//! A categorical value outside its training domain lights no indicator, which is
//! the same encoding as the reference level.

use crate::errors::AppError;
use crate::models::{EngineeredRecord, FeatureVector};
use crate::schema::{self, FieldValue};

/// Step 1: named numeric columns for a record, before alignment.
///
/// Columns follow the canonical field order; each categorical field expands in
/// place into its indicator columns.
pub fn dummy_encode(record: &EngineeredRecord) -> Vec<(String, f64)> {
    let mut columns: Vec<(String, f64)> = Vec::new();

    for field in schema::CANONICAL_ORDER {
        match schema::field_value(record, field) {
            Some(FieldValue::Numeric(value)) => columns.push((field.to_string(), value)),
            Some(FieldValue::Categorical(value)) => {
                let Some(domain) = schema::domain(field) else {
                    continue;
                };
                if !domain.contains(value) {
                    tracing::debug!(
                        "Unseen {} value '{}', encoding as reference level '{}'",
                        field,
                        value,
                        domain.reference_level()
                    );
                }
                for level in &domain.levels[1..] {
                    let active = if *level == value { 1.0 } else { 0.0 };
                    columns.push((schema::indicator_column(field, level), active));
                }
            }
            None => {}
        }
    }

    columns
}

/// Step 2: projects encoded columns onto `model_columns`, in that order.
///
/// Fails with `EncodingError` when the model declares a numeric column that the
/// record did not produce, or when a declared numeric value is not finite.
/// Missing indicator columns are never an error.
pub fn align(
    encoded: &[(String, f64)],
    model_columns: &[String],
) -> Result<FeatureVector, AppError> {
    let mut values = Vec::with_capacity(model_columns.len());

    for column in model_columns {
        let produced = encoded
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| *v);

        let value = match produced {
            Some(v) if v.is_finite() => v,
            Some(v) => {
                return Err(AppError::EncodingError(format!(
                    "feature '{}' is not a finite number ({})",
                    column, v
                )))
            }
            None if schema::is_indicator_column(column) => 0.0,
            None => {
                return Err(AppError::EncodingError(format!(
                    "required numeric feature '{}' is missing",
                    column
                )))
            }
        };
        values.push(value);
    }

    let dropped = encoded
        .iter()
        .filter(|(name, _)| !model_columns.contains(name))
        .count();
    if dropped > 0 {
        tracing::trace!("Dropped {} encoded column(s) not declared by the model", dropped);
    }

    Ok(FeatureVector::new(model_columns.to_vec(), values))
}

/// Encodes a record and aligns it to the model's declared input columns.
pub fn encode(
    record: &EngineeredRecord,
    model_columns: &[String],
) -> Result<FeatureVector, AppError> {
    let encoded = dummy_encode(record);
    align(&encoded, model_columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::engineer;
    use crate::models::ApplicantRecord;

    /// Total number of indicator columns the categorical domains can produce.
    fn indicator_width() -> usize {
        schema::CATEGORICAL_DOMAINS
            .iter()
            .map(|d| d.levels.len() - 1)
            .sum()
    }

    fn record(property_area: &str) -> EngineeredRecord {
        engineer(ApplicantRecord {
            income: 5000,
            loan_amount: 150.0,
            credit_history: 1,
            age: 30,
            gender: "Male".into(),
            married: "Yes".into(),
            education: "Graduate".into(),
            self_employed: "No".into(),
            dependents: "0".into(),
            property_area: property_area.into(),
            loan_term: 360,
        })
    }

    #[test]
    fn dummy_encode_marks_active_levels() {
        let encoded = dummy_encode(&record("Semiurban"));
        let get = |name: &str| encoded.iter().find(|(n, _)| n == name).map(|(_, v)| *v);

        assert_eq!(get("Gender_Male"), Some(1.0));
        assert_eq!(get("Married_Yes"), Some(1.0));
        assert_eq!(get("Education_Not Graduate"), Some(0.0));
        assert_eq!(get("Property_Area_Semiurban"), Some(1.0));
        assert_eq!(get("Property_Area_Urban"), Some(0.0));
        assert_eq!(get("Property_Area_Rural"), None);
        assert_eq!(get("Loan_Amount_Term"), Some(360.0));
        assert_eq!(encoded.len(), 7 + indicator_width());
    }

    #[test]
    fn dummy_encode_follows_canonical_order() {
        let encoded = dummy_encode(&record("Urban"));
        let names: Vec<&str> = encoded.iter().map(|(n, _)| n.as_str()).collect();

        assert_eq!(
            &names[..5],
            &["Income", "LoanAmount", "Credit_History", "Age", "Gender_Male"]
        );
        assert_eq!(&names[names.len() - 3..], &["Loan_Amount_Term", "dti", "lta"]);
    }

    #[test]
    fn aligned_vector_matches_model_schema() {
        let model_columns = schema::training_columns();
        let vector = encode(&record("Urban"), &model_columns).unwrap();

        assert_eq!(vector.columns(), &model_columns[..]);
        assert_eq!(vector.get("Income"), Some(5000.0));
        assert_eq!(vector.get("lta"), Some(5.0));
        assert_eq!(vector.get("Property_Area_Urban"), Some(1.0));
        // Not a model input
        assert_eq!(vector.get("Loan_Amount_Term"), None);
    }

    #[test]
    fn unseen_category_falls_back_to_reference() {
        let model_columns = schema::training_columns();
        let vector = encode(&record("Moon"), &model_columns).unwrap();

        assert_eq!(vector.get("Property_Area_Semiurban"), Some(0.0));
        assert_eq!(vector.get("Property_Area_Urban"), Some(0.0));
        assert_eq!(vector.values().len(), model_columns.len());
    }

    #[test]
    fn undeclared_indicator_is_zero_filled() {
        let model_columns = vec![
            "Income".to_string(),
            "Property_Area_Moon".to_string(),
            "dti".to_string(),
        ];
        let vector = encode(&record("Urban"), &model_columns).unwrap();

        assert_eq!(vector.values(), &[5000.0, 0.0, 0.03]);
    }

    #[test]
    fn missing_numeric_feature_is_an_encoding_error() {
        let model_columns = vec!["Income".to_string(), "CoapplicantIncome".to_string()];
        let err = encode(&record("Urban"), &model_columns).unwrap_err();

        assert_eq!(err.kind(), "encoding_error");
        assert!(err.to_string().contains("CoapplicantIncome"));
    }

    #[test]
    fn non_finite_numeric_is_an_encoding_error() {
        let encoded = vec![("LoanAmount".to_string(), f64::NAN)];
        let err = align(&encoded, &["LoanAmount".to_string()]).unwrap_err();
        assert_eq!(err.kind(), "encoding_error");
    }

    #[test]
    fn encoding_is_deterministic() {
        let model_columns = schema::training_columns();
        let r = record("Rural");
        assert_eq!(
            encode(&r, &model_columns).unwrap(),
            encode(&r, &model_columns).unwrap()
        );
    }
}
