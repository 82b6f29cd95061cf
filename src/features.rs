use crate::models::{ApplicantRecord, EngineeredRecord};

/// `numerator / denominator`, or exactly `0.0` when the denominator is zero.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Derives the debt-to-income and loan-to-age ratios.
///
/// Raw values are not range-checked; negative or zero inputs go through as-is
/// and only a zero denominator is special-cased.
pub fn engineer(applicant: ApplicantRecord) -> EngineeredRecord {
    let dti = safe_ratio(applicant.loan_amount, applicant.income as f64);
    let lta = safe_ratio(applicant.loan_amount, applicant.age as f64);

    EngineeredRecord { applicant, dti, lta }
}
