//! Compliance scoring, calendar classification and list filtering for genba
//! (5S workplace) reporting.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
