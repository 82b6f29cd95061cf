//! Loan Risk Scoring API Library
//!
//! This library scores loan applications: it validates applicant fields,
//! derives debt-to-income and loan-to-age ratios, encodes categorical fields
//! against the model's input schema, obtains an approval probability, and keeps
//! an append-only log of every prediction.
//!
//! # Modules
//!
//! - `api`: Router assembly and HTTP handlers.
//! - `core`: Pipeline logic, models and errors.
//! - `data`: Data access layer.
//! - `integrations`: The classifier capability.
//! - `config`: Configuration management.
//! - `db`: Database connection and schema setup.
//! - `db_storage`: Prediction log storage.
//! - `encoder`: Categorical encoding and column alignment.
//! - `errors`: Error handling types.
//! - `features`: Ratio engineering.
//! - `handlers`: HTTP request handlers.
//! - `model`: Model trait and the logistic model artifact.
//! - `models`: Core data models.
//! - `schema`: Canonical field names and categorical domains.
//! - `scoring`: Probability to decision mapping.
//! - `services`: End-to-end prediction pipeline.

pub mod api;
pub mod core;
pub mod data;
pub mod integrations;

// Re-export primary modules for shared use in tests and other binaries
pub mod config;
pub mod db;
pub mod db_storage;
pub mod encoder;
pub mod errors;
pub mod features;
pub mod handlers;
pub mod model;
pub mod models;
pub mod schema;
pub mod scoring;
pub mod services;
