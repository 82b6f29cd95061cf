//! Writes the baseline model artifact as JSON, as a starting point for `MODEL_PATH`.

use loan_risk_api::model::LogisticModel;
use std::env;

/// Main entry point for the export utility.
///
/// Writes to the path given as the first argument, or prints to stdout.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let json = LogisticModel::baseline().to_json()?;

    match env::args().nth(1) {
        Some(path) => {
            std::fs::write(&path, json)?;
            tracing::info!("Baseline model written to {}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}
