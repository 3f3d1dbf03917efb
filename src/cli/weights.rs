use super::ui;
use crate::core::{FusedResult, PortfolioMetrics, ReferenceTable, ReturnBasis, compute_weights};
use anyhow::{Context, Result};
use comfy_table::Cell;
use serde::Serialize;
use tracing::{debug, info};

const DISTRIBUTION_BAR_WIDTH: usize = 40;

#[derive(Serialize)]
struct WeightsReport<'a> {
    #[serde(flatten)]
    result: &'a FusedResult,
    metrics: PortfolioMetrics,
}

impl FusedResult {
    /// Per-index results table with fixed display precision.
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Index"),
            ui::header_cell(&self.basis.to_string()),
            ui::header_cell("Probability Up"),
            ui::header_cell("Fused E[R]"),
            ui::header_cell("Weight (%)"),
        ]);

        for entry in &self.entries {
            table.add_row(vec![
                Cell::new(&entry.index),
                ui::number_cell(format!("{:.6}", entry.expected_return)),
                ui::number_cell(format!("{:.4}", entry.probability_up)),
                ui::number_cell(format!("{:.6}", entry.fused_score)),
                ui::format_percentage_cell(entry.weight * 100.0, |w| format!("{w:.2}")),
            ]);
        }

        table.to_string()
    }

    /// One proportional bar per index, sized by its weight.
    pub fn display_distribution(&self, bar_width: usize) -> String {
        let label_width = self
            .entries
            .iter()
            .map(|e| e.index.chars().count())
            .max()
            .unwrap_or(0);

        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                format!(
                    "{:<label_width$}  {} {:>6.2}%",
                    entry.index,
                    ui::share_bar(entry.weight, bar_width, i),
                    entry.weight * 100.0
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl PortfolioMetrics {
    pub fn display(&self, basis: ReturnBasis) -> String {
        [
            (
                "Total Weight".to_string(),
                format!("{:.2}%", self.total_weight_pct),
            ),
            (
                format!("Average {basis}"),
                format!("{:.4}", self.average_expected_return),
            ),
            (
                "Average Probability Up".to_string(),
                format!("{:.4}", self.average_probability_up),
            ),
        ]
        .iter()
        .map(|(label, value)| {
            format!(
                "{}: {}",
                ui::style_text(label, ui::StyleType::TotalLabel),
                ui::style_text(value, ui::StyleType::TotalValue)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
    }
}

/// Renders the weights view for `selection`, or the advisory when it is empty.
pub fn render(
    table: &ReferenceTable,
    selection: &[String],
    basis: ReturnBasis,
    json: bool,
) -> Result<String> {
    if selection.is_empty() {
        return Ok(ui::style_text(
            "Please select at least one index.",
            ui::StyleType::Warning,
        ));
    }

    info!(?selection, %basis, "Calculating portfolio weights");
    let result = compute_weights(table, selection, basis)?;
    let metrics = PortfolioMetrics::from_result(&result);
    debug!(?metrics, "Computed portfolio metrics");

    if json {
        let report = WeightsReport {
            result: &result,
            metrics,
        };
        return serde_json::to_string_pretty(&report).context("Failed to serialize weights");
    }

    let mut output = format!(
        "\n{}\n\n{}\n\n",
        ui::style_text("Portfolio Weight Calculator", ui::StyleType::Title),
        ui::style_text("Portfolio Analysis Results", ui::StyleType::Heading)
    );
    output.push_str(&result.display_as_table());
    output.push_str(&format!(
        "\n\n{}\n\n",
        ui::style_text("Weight Distribution", ui::StyleType::Heading)
    ));
    output.push_str(&result.display_distribution(DISTRIBUTION_BAR_WIDTH));
    output.push_str(&format!(
        "\n{}\n{}\n\n",
        ui::separator(),
        ui::style_text("Portfolio Metrics", ui::StyleType::Heading)
    ));
    output.push_str(&metrics.display(basis));

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FusionError;

    fn sample() -> FusedResult {
        compute_weights(
            ReferenceTable::builtin(),
            &["S&P 500", "NIKKEI 225"],
            ReturnBasis::Capm,
        )
        .unwrap()
    }

    #[test]
    fn test_table_uses_display_precision() {
        let output = console::strip_ansi_codes(&sample().display_as_table()).to_string();
        assert!(output.contains("CAPM_6m"));
        assert!(output.contains("S&P 500"));
        assert!(output.contains("0.139425"));
        assert!(output.contains("0.9975"));
        assert!(output.contains("0.139076"));
        assert!(output.contains("60.09"));
        assert!(output.contains("39.91"));
    }

    #[test]
    fn test_distribution_lists_every_index() {
        let output = console::strip_ansi_codes(&sample().display_distribution(10)).to_string();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("S&P 500"));
        assert!(lines[0].contains("██████░░░░"));
        assert!(lines[0].ends_with("60.09%"));
        assert!(lines[1].starts_with("NIKKEI 225"));
        assert!(lines[1].contains("████░░░░░░"));
    }

    #[test]
    fn test_metrics_display() {
        let result = sample();
        let metrics = PortfolioMetrics::from_result(&result);
        let output = console::strip_ansi_codes(&metrics.display(result.basis)).to_string();
        assert!(output.contains("Total Weight: 100.00%"));
        assert!(output.contains("Average CAPM_6m: 0.1433"));
        assert!(output.contains("Average Probability Up:"));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let result = sample();
        let report = WeightsReport {
            result: &result,
            metrics: PortfolioMetrics::from_result(&result),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["basis"], "capm");
        assert_eq!(value["entries"][0]["index"], "S&P 500");
        assert!(value["entries"][1]["weight"].as_f64().unwrap() > 0.39);
        assert!(value["metrics"]["total_weight_pct"].as_f64().is_some());
    }

    #[test]
    fn test_render_with_empty_selection_warns() {
        let output = render(ReferenceTable::builtin(), &[], ReturnBasis::Capm, false).unwrap();
        assert_eq!(
            console::strip_ansi_codes(&output),
            "Please select at least one index."
        );
    }

    #[test]
    fn test_render_with_unknown_index_fails() {
        let selection = vec!["Dow Jones".to_string()];
        let err = render(ReferenceTable::builtin(), &selection, ReturnBasis::Capm, false)
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<FusionError>(),
            Some(&FusionError::UnknownIndex("Dow Jones".to_string()))
        );
    }
}
