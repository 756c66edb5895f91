//! Checklist generation and document-requirement rules for housing-subsidy applications.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
