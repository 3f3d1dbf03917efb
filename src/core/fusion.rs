//! Blends expected returns with probability-up estimates into portfolio weights.
use crate::core::index::{ReferenceTable, ReturnBasis};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FusionError {
    #[error("Selection is empty, at least one index is required")]
    EmptySelection,
    #[error("Unknown index: {0}")]
    UnknownIndex(String),
    #[error("Cannot normalize zero total of fused scores")]
    ZeroTotal,
    #[error("Cannot normalize non-finite total of fused scores: {0}")]
    NonFiniteTotal(f64),
}

/// Fused score and weight of one selected index, with the inputs that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedEntry {
    pub index: String,
    pub expected_return: f64,
    pub probability_up: f64,
    pub fused_score: f64,
    pub weight: f64,
}

/// Output of [`compute_weights`]. Entries are unique by name and follow the
/// order in which names first appeared in the selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedResult {
    pub basis: ReturnBasis,
    pub entries: Vec<FusedEntry>,
    pub total_fused_score: f64,
}

impl FusedResult {
    pub fn fused_scores(&self) -> HashMap<&str, f64> {
        self.entries
            .iter()
            .map(|e| (e.index.as_str(), e.fused_score))
            .collect()
    }

    pub fn weights(&self) -> HashMap<&str, f64> {
        self.entries
            .iter()
            .map(|e| (e.index.as_str(), e.weight))
            .collect()
    }

    pub fn get(&self, index: &str) -> Option<&FusedEntry> {
        self.entries.iter().find(|e| e.index == index)
    }
}

/// Computes `fused = expected_return * probability_up` for every selected index
/// and normalizes the fused scores into weights that sum to 1.
///
/// Fails without a partial result if the selection is empty, names an index
/// missing from `table`, or the fused scores sum to zero (or a non-finite value).
pub fn compute_weights<S: AsRef<str>>(
    table: &ReferenceTable,
    selection: &[S],
    basis: ReturnBasis,
) -> Result<FusedResult, FusionError> {
    if selection.is_empty() {
        return Err(FusionError::EmptySelection);
    }

    let mut entries: Vec<FusedEntry> = Vec::with_capacity(selection.len());
    for name in selection {
        let name = name.as_ref();
        if entries.iter().any(|e| e.index == name) {
            debug!("Skipping duplicate selection of {}", name);
            continue;
        }
        let record = table
            .get(name)
            .ok_or_else(|| FusionError::UnknownIndex(name.to_string()))?;
        let expected_return = record.expected_return(basis);
        entries.push(FusedEntry {
            index: record.name.clone(),
            expected_return,
            probability_up: record.probability_up,
            fused_score: expected_return * record.probability_up,
            weight: 0.0,
        });
    }

    let total: f64 = entries.iter().map(|e| e.fused_score).sum();
    if total == 0.0 {
        return Err(FusionError::ZeroTotal);
    }
    if !total.is_finite() {
        return Err(FusionError::NonFiniteTotal(total));
    }

    for entry in &mut entries {
        entry.weight = entry.fused_score / total;
    }
    debug!(?basis, total, count = entries.len(), "Computed fused weights");

    Ok(FusedResult {
        basis,
        entries,
        total_fused_score: total,
    })
}
