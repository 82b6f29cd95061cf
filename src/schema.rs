//! Canonical field naming, ordering and categorical domains.
//!
//! Everything the pipeline knows about column names lives here: the mapping from
//! the public JSON keys to the canonical names the model was trained on, the
//! canonical field order, and the fixed category ordering of every categorical
//! field. The first level of each domain is its reference level.

use crate::errors::AppError;
use crate::models::{ApplicantPayload, ApplicantRecord, EngineeredRecord};

pub const INCOME: &str = "Income";
pub const LOAN_AMOUNT: &str = "LoanAmount";
pub const CREDIT_HISTORY: &str = "Credit_History";
pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const MARRIED: &str = "Married";
pub const EDUCATION: &str = "Education";
pub const SELF_EMPLOYED: &str = "Self_Employed";
pub const DEPENDENTS: &str = "Dependents";
pub const PROPERTY_AREA: &str = "Property_Area";
pub const LOAN_TERM: &str = "Loan_Amount_Term";
pub const DTI: &str = "dti";
pub const LTA: &str = "lta";

/// External (JSON) name to canonical name, in canonical order.
pub const FIELD_MAP: [(&str, &str); 11] = [
    ("income", INCOME),
    ("loan_amount", LOAN_AMOUNT),
    ("credit_history", CREDIT_HISTORY),
    ("age", AGE),
    ("gender", GENDER),
    ("married", MARRIED),
    ("education", EDUCATION),
    ("self_employed", SELF_EMPLOYED),
    ("dependents", DEPENDENTS),
    ("property_area", PROPERTY_AREA),
    ("loan_term", LOAN_TERM),
];

/// Canonical field order, raw fields followed by derived ratios.
pub const CANONICAL_ORDER: [&str; 13] = [
    INCOME,
    LOAN_AMOUNT,
    CREDIT_HISTORY,
    AGE,
    GENDER,
    MARRIED,
    EDUCATION,
    SELF_EMPLOYED,
    DEPENDENTS,
    PROPERTY_AREA,
    LOAN_TERM,
    DTI,
    LTA,
];

/// Numeric features every model is expected to consume.
pub const REQUIRED_NUMERIC_FEATURES: [&str; 6] =
    [INCOME, LOAN_AMOUNT, CREDIT_HISTORY, AGE, DTI, LTA];

/// Ordered category levels of one categorical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoricalDomain {
    pub field: &'static str,
    pub levels: &'static [&'static str],
}

impl CategoricalDomain {
    /// The omitted baseline level.
    pub fn reference_level(&self) -> &'static str {
        self.levels[0]
    }

    /// Indicator columns this field contributes, reference level excluded.
    pub fn indicator_columns(&self) -> impl Iterator<Item = String> + '_ {
        self.levels[1..]
            .iter()
            .map(move |level| indicator_column(self.field, level))
    }

    pub fn contains(&self, level: &str) -> bool {
        self.levels.iter().any(|l| *l == level)
    }
}

/// Category orderings fixed at training time.
pub static CATEGORICAL_DOMAINS: [CategoricalDomain; 6] = [
    CategoricalDomain {
        field: GENDER,
        levels: &["Female", "Male"],
    },
    CategoricalDomain {
        field: MARRIED,
        levels: &["No", "Yes"],
    },
    CategoricalDomain {
        field: EDUCATION,
        levels: &["Graduate", "Not Graduate"],
    },
    CategoricalDomain {
        field: SELF_EMPLOYED,
        levels: &["No", "Yes"],
    },
    CategoricalDomain {
        field: DEPENDENTS,
        levels: &["0", "1", "2", "3+"],
    },
    CategoricalDomain {
        field: PROPERTY_AREA,
        levels: &["Rural", "Semiurban", "Urban"],
    },
];

pub fn domain(field: &str) -> Option<&'static CategoricalDomain> {
    CATEGORICAL_DOMAINS.iter().find(|d| d.field == field)
}

pub fn indicator_column(field: &str, level: &str) -> String {
    format!("{}_{}", field, level)
}

/// Whether `column` is a dummy indicator of one of the categorical fields.
pub fn is_indicator_column(column: &str) -> bool {
    CATEGORICAL_DOMAINS.iter().any(|d| {
        column
            .strip_prefix(d.field)
            .is_some_and(|rest| rest.starts_with('_'))
    })
}

/// Column layout of the training matrix: numeric features, then the dummy
/// columns of each categorical field in domain order.
pub fn training_columns() -> Vec<String> {
    REQUIRED_NUMERIC_FEATURES
        .iter()
        .map(|c| c.to_string())
        .chain(CATEGORICAL_DOMAINS.iter().flat_map(|d| d.indicator_columns()))
        .collect()
}

/// One canonical field of an engineered record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Numeric(f64),
    Categorical(&'a str),
}

/// Value of a canonical field, or `None` for a name outside [`CANONICAL_ORDER`].
pub fn field_value<'a>(record: &'a EngineeredRecord, field: &str) -> Option<FieldValue<'a>> {
    let a = &record.applicant;
    let value = match field {
        INCOME => FieldValue::Numeric(a.income as f64),
        LOAN_AMOUNT => FieldValue::Numeric(a.loan_amount),
        CREDIT_HISTORY => FieldValue::Numeric(a.credit_history as f64),
        AGE => FieldValue::Numeric(a.age as f64),
        GENDER => FieldValue::Categorical(a.gender.as_str()),
        MARRIED => FieldValue::Categorical(a.married.as_str()),
        EDUCATION => FieldValue::Categorical(a.education.as_str()),
        SELF_EMPLOYED => FieldValue::Categorical(a.self_employed.as_str()),
        DEPENDENTS => FieldValue::Categorical(a.dependents.as_str()),
        PROPERTY_AREA => FieldValue::Categorical(a.property_area.as_str()),
        LOAN_TERM => FieldValue::Numeric(a.loan_term as f64),
        DTI => FieldValue::Numeric(record.dti),
        LTA => FieldValue::Numeric(record.lta),
        _ => return None,
    };
    Some(value)
}

/// Validates a raw payload into an [`ApplicantRecord`].
///
/// Raw fields are never defaulted: every absent or null field is reported in a
/// single `SchemaError`, by its external name.
pub fn validate(payload: ApplicantPayload) -> Result<ApplicantRecord, AppError> {
    // Presence flags in FIELD_MAP order
    let present = [
        payload.income.is_some(),
        payload.loan_amount.is_some(),
        payload.credit_history.is_some(),
        payload.age.is_some(),
        payload.gender.is_some(),
        payload.married.is_some(),
        payload.education.is_some(),
        payload.self_employed.is_some(),
        payload.dependents.is_some(),
        payload.property_area.is_some(),
        payload.loan_term.is_some(),
    ];

    match payload {
        ApplicantPayload {
            income: Some(income),
            loan_amount: Some(loan_amount),
            credit_history: Some(credit_history),
            age: Some(age),
            gender: Some(gender),
            married: Some(married),
            education: Some(education),
            self_employed: Some(self_employed),
            dependents: Some(dependents),
            property_area: Some(property_area),
            loan_term: Some(loan_term),
        } => Ok(ApplicantRecord {
            income: truncate_to_int(&income),
            loan_amount,
            credit_history: truncate_to_int(&credit_history),
            age: truncate_to_int(&age),
            gender,
            married,
            education,
            self_employed,
            dependents,
            property_area,
            loan_term: truncate_to_int(&loan_term),
        }),
        _ => {
            let missing: Vec<&str> = FIELD_MAP
                .iter()
                .zip(present)
                .filter(|(_, present)| !present)
                .map(|((external, _), _)| *external)
                .collect();
            Err(AppError::SchemaError(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }
}

/// Integer value of a JSON number, fractional part dropped.
fn truncate_to_int(n: &serde_json::Number) -> i64 {
    n.as_i64()
        .unwrap_or_else(|| n.as_f64().map(|f| f.trunc() as i64).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> ApplicantPayload {
        serde_json::from_value(value).unwrap()
    }

    fn full_payload() -> serde_json::Value {
        json!({
            "income": 5000, "loan_amount": 150, "credit_history": 1, "age": 30,
            "gender": "Male", "married": "Yes", "education": "Graduate",
            "self_employed": "No", "dependents": "0", "property_area": "Urban",
            "loan_term": 360
        })
    }

    #[test]
    fn raw_fields_lead_the_canonical_order() {
        let mapped: Vec<&str> = FIELD_MAP.iter().map(|(_, canonical)| *canonical).collect();
        assert_eq!(&CANONICAL_ORDER[..FIELD_MAP.len()], &mapped[..]);
        assert_eq!(&CANONICAL_ORDER[FIELD_MAP.len()..], &[DTI, LTA]);
    }

    #[test]
    fn every_canonical_field_has_a_value() {
        let record = crate::features::engineer(validate(payload(full_payload())).unwrap());
        for field in CANONICAL_ORDER {
            assert!(field_value(&record, field).is_some(), "{}", field);
        }
        assert_eq!(field_value(&record, LOAN_TERM), Some(FieldValue::Numeric(360.0)));
        assert_eq!(
            field_value(&record, PROPERTY_AREA),
            Some(FieldValue::Categorical("Urban"))
        );
        assert_eq!(field_value(&record, "Property_Area_Urban"), None);
    }

    #[test]
    fn validates_complete_payload() {
        let record = validate(payload(full_payload())).unwrap();
        assert_eq!(record.income, 5000);
        assert_eq!(record.loan_amount, 150.0);
        assert_eq!(record.property_area, "Urban");
        assert_eq!(record.loan_term, 360);
    }

    #[test]
    fn reports_all_missing_fields() {
        let mut body = full_payload();
        body.as_object_mut().unwrap().remove("income");
        body.as_object_mut().unwrap().remove("property_area");

        let err = validate(payload(body)).unwrap_err();
        assert_eq!(err.kind(), "schema_error");
        assert_eq!(
            err.to_string(),
            "Schema error: missing required field(s): income, property_area"
        );
    }

    #[test]
    fn null_counts_as_missing() {
        let mut body = full_payload();
        body["age"] = serde_json::Value::Null;
        assert!(validate(payload(body)).is_err());
    }

    #[test]
    fn fractional_integers_are_truncated() {
        let mut body = full_payload();
        body["income"] = json!(5000.9);
        body["age"] = json!(-30.5);
        let record = validate(payload(body)).unwrap();
        assert_eq!(record.income, 5000);
        assert_eq!(record.age, -30);
    }

    #[test]
    fn training_columns_drop_reference_levels() {
        let cols = training_columns();
        assert_eq!(&cols[..6], &REQUIRED_NUMERIC_FEATURES.map(String::from)[..]);
        assert!(cols.contains(&"Gender_Male".to_string()));
        assert!(!cols.contains(&"Gender_Female".to_string()));
        assert!(cols.contains(&"Dependents_3+".to_string()));
        assert!(!cols.contains(&"Property_Area_Rural".to_string()));
        assert!(!cols.contains(&"Loan_Amount_Term".to_string()));
        assert_eq!(cols.len(), 6 + 1 + 1 + 1 + 1 + 3 + 2);
    }

    #[test]
    fn indicator_detection() {
        assert!(is_indicator_column("Property_Area_Moon"));
        assert!(is_indicator_column("Education_Not Graduate"));
        assert!(!is_indicator_column("Income"));
        assert!(!is_indicator_column("Loan_Amount_Term"));
        assert!(!is_indicator_column("Gender"));
    }
}
