//! Aggregate metrics over a fused selection.
use crate::core::fusion::FusedResult;
use serde::Serialize;

/// Summary scalars displayed under the weights table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortfolioMetrics {
    /// Sum of weights as a percentage; 100 up to rounding.
    pub total_weight_pct: f64,
    pub average_expected_return: f64,
    pub average_probability_up: f64,
}

impl PortfolioMetrics {
    pub fn from_result(result: &FusedResult) -> Self {
        let count = result.entries.len() as f64;
        let (weight, ret, prob) = result.entries.iter().fold((0.0, 0.0, 0.0), |acc, e| {
            (
                acc.0 + e.weight,
                acc.1 + e.expected_return,
                acc.2 + e.probability_up,
            )
        });
        PortfolioMetrics {
            total_weight_pct: weight * 100.0,
            average_expected_return: ret / count,
            average_probability_up: prob / count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fusion::compute_weights;
    use crate::core::index::{ReferenceTable, ReturnBasis};

    #[test]
    fn test_metrics_for_two_indices() {
        let result = compute_weights(
            ReferenceTable::builtin(),
            &["S&P 500", "NIKKEI 225"],
            ReturnBasis::Capm,
        )
        .unwrap();
        let metrics = PortfolioMetrics::from_result(&result);

        assert!((metrics.total_weight_pct - 100.0).abs() < 1e-7);
        let expected_avg_return = (0.13942497472444942 + 0.1472031516218701) / 2.0;
        assert!((metrics.average_expected_return - expected_avg_return).abs() < 1e-12);
        assert!((metrics.average_probability_up - (0.9975 + 0.6274) / 2.0).abs() < 1e-12);
        assert_eq!(format!("{:.2}%", metrics.total_weight_pct), "100.00%");
        assert_eq!(format!("{:.4}", metrics.average_expected_return), "0.1433");
    }
}
