use invest_catalog::{DeltaReport, Instance, Selection, SolutionSummary};
use std::{fmt::Write, time::Duration};

const RULE_WIDTH: usize = 80;

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// One line per selected item followed by the totals.
pub fn selection_table(
    instance: &Instance,
    selection: &Selection,
    summary: &SolutionSummary,
    elapsed: Duration,
) -> String {
    let items = instance.catalog.items();
    let costs = instance.catalog.exact_costs();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<20} {:>14} {:>14} {:>10}",
        "Identifier", "Cost (€)", "Profit (€)", "Return %"
    );
    let _ = writeln!(out, "{}", rule());
    for &i in &selection.items {
        let item = &items[i];
        let _ = writeln!(
            out,
            "{:<20} {:>14} {:>14.2} {:>10.2}",
            item.id,
            costs[i].to_string(),
            item.profit,
            item.return_rate() * 100.0
        );
    }
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "Items: {}", summary.item_count);
    let _ = writeln!(out, "Total cost: {}€", summary.total_cost);
    let _ = writeln!(out, "Total profit: {:.2}€", summary.total_profit);
    let _ = writeln!(out, "Total return: {:.2}%", summary.return_rate());
    let _ = writeln!(out, "Elapsed: {:.4}s", elapsed.as_secs_f64());
    out
}

/// A labelled result row for [`comparison_table`]. `elapsed` is `None` for
/// results that were not timed here.
pub struct ComparisonRow<'a> {
    pub label: &'a str,
    pub elapsed: Option<Duration>,
    pub summary: &'a SolutionSummary,
}

pub fn comparison_table(rows: &[ComparisonRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<15} {:>10} {:>12} {:>12} {:>10} {:>8}",
        "Algorithm", "Time (s)", "Cost (€)", "Profit (€)", "Return %", "Items"
    );
    let _ = writeln!(out, "{}", rule());
    for row in rows {
        let elapsed = row
            .elapsed
            .map(|e| format!("{:.4}", e.as_secs_f64()))
            .unwrap_or_else(|| "N/A".to_string());
        let _ = writeln!(
            out,
            "{:<15} {:>10} {:>12.2} {:>12.2} {:>10.2} {:>8}",
            row.label,
            elapsed,
            row.summary.total_cost.to_f64(),
            row.summary.total_profit,
            row.summary.return_rate(),
            row.summary.item_count
        );
    }
    out
}

pub fn delta_lines(label: &str, delta: &DeltaReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Differences with {}:", label);
    let _ = writeln!(out, "Profit: {:+.2}€", delta.profit_delta);
    let _ = writeln!(out, "Return: {:+.2}%", delta.return_delta);
    let _ = writeln!(out, "Budget use: {:+.2}€", delta.cost_delta.to_f64());
    let _ = writeln!(out, "Items: {:+}", delta.item_count_delta);
    out
}
