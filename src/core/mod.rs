//! Core business logic: reference data, fusion and aggregate metrics

pub mod analytics;
pub mod config;
pub mod fusion;
pub mod index;
pub mod log;

// Re-export main types for cleaner imports
pub use analytics::PortfolioMetrics;
pub use fusion::{FusedEntry, FusedResult, FusionError, compute_weights};
pub use index::{IndexRecord, ReferenceTable, ReturnBasis};
