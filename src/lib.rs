//! Weather-normalized energy savings evaluation.
//!
//! A [`meter::DefaultResidentialMeter`] fits degree-day models to a
//! project's baseline and reporting consumption, projects both onto a
//! normal weather year, and reports savings per fuel. Every intermediate
//! value lands in a [`store::ResultStore`] keyed by name and tags.

pub mod config;
pub mod data;
pub mod error;
/// Composable evaluation stages and the residential pipeline.
pub mod meter;
pub mod model;
pub mod store;

pub use config::MeterSettings;
pub use error::EvaluationError;
pub use meter::{DefaultResidentialMeter, SavingsOutcome, savings_outcome};
pub use store::ResultStore;
