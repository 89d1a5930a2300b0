//! Consolidated reconciliation report.
//!
//! Pure aggregation used by the report and the reconcilable project listing.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::ReportService;
pub use types::*;
