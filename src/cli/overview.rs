use super::ui;
use crate::core::{ReferenceTable, ReturnBasis};
use comfy_table::Cell;
use tracing::info;

const OVERVIEW_BAR_WIDTH: usize = 30;

/// Expected returns (%) by period for every index, with a bar per period
/// scaled against the largest return in the table.
pub fn render(table: &ReferenceTable) -> String {
    let max_return = table
        .records()
        .iter()
        .flat_map(|r| ReturnBasis::PERIODS.map(|p| r.expected_return(p)))
        .fold(0.0_f64, f64::max);

    let mut output = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Index")];
    header.extend(
        ReturnBasis::PERIODS
            .iter()
            .map(|p| ui::header_cell(&format!("{p} (%)"))),
    );
    header.push(ui::header_cell(""));
    output.set_header(header);

    for record in table.records() {
        let mut row = vec![Cell::new(&record.name)];
        let mut bars = Vec::with_capacity(ReturnBasis::PERIODS.len());
        for (slot, period) in ReturnBasis::PERIODS.iter().enumerate() {
            let value = record.expected_return(*period);
            row.push(ui::number_cell(format!("{:.2}", value * 100.0)));
            let fraction = if max_return > 0.0 {
                value / max_return
            } else {
                0.0
            };
            bars.push(ui::share_bar(fraction, OVERVIEW_BAR_WIDTH, slot));
        }
        row.push(Cell::new(bars.join("\n")));
        output.add_row(row);
    }

    output.to_string()
}

/// Title followed by the overview table.
pub fn render_overview(table: &ReferenceTable) -> String {
    info!(count = table.len(), "Rendering expected returns overview");
    format!(
        "\n{}\n\n{}",
        ui::style_text("Expected Returns Overview", ui::StyleType::Title),
        render(table)
    )
}

/// One line per selectable index with its CAPM estimate and probability-up.
pub fn render_indices(table: &ReferenceTable) -> String {
    table
        .records()
        .iter()
        .map(|record| {
            format!(
                "{}  {}",
                record.name,
                ui::style_text(
                    &format!(
                        "capm {:.4}, p(up) {:.4}",
                        record.capm, record.probability_up
                    ),
                    ui::StyleType::Subtle
                )
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
