//! Parsing of free-text reference reports, e.g.
//!
//! ```text
//! Share-ABCD Share-EFGH
//! Total cost: 498.76€
//! Profit: 196.61€
//! ```
//!
//! `Total return:` is accepted in place of `Profit:`.

use anyhow::{anyhow, Context, Result};
use invest_catalog::SolutionSummary;
use invest_utils::Amount;
use std::{fs, path::Path};

const COST_LABEL: &str = "Total cost: ";
const PROFIT_LABELS: [&str; 2] = ["Profit: ", "Total return: "];
const IDENTIFIER_PREFIX: &str = "Share-";

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceReport {
    pub total_cost: Amount,
    pub total_profit: f64,
    pub identifiers: Vec<String>,
}

impl ReferenceReport {
    pub fn parse(text: &str) -> Result<Self> {
        let total_cost = labelled_value(text, COST_LABEL)?;
        let total_cost = Amount::from_f64(total_cost)
            .map_err(|e| anyhow!("Unusable total cost ({}): {}", total_cost, e))?;
        let profit_label = PROFIT_LABELS
            .iter()
            .find(|label| text.contains(label.trim_end()))
            .ok_or_else(|| anyhow!("Missing '{}' or '{}'", PROFIT_LABELS[0], PROFIT_LABELS[1]))?;
        let total_profit = labelled_value(text, profit_label)?;

        let identifiers = text
            .split(IDENTIFIER_PREFIX)
            .skip(1)
            .filter_map(|rest| rest.split_whitespace().next())
            .map(|suffix| format!("{}{}", IDENTIFIER_PREFIX, suffix))
            .collect();

        Ok(Self {
            total_cost,
            total_profit,
            identifiers,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read reference report: {:?}", path.as_ref()))?;
        Self::parse(&text)
            .with_context(|| format!("Failed to parse reference report: {:?}", path.as_ref()))
    }

    pub fn summary(&self) -> SolutionSummary {
        SolutionSummary::new(self.total_cost, self.total_profit, self.identifiers.len())
    }
}

/// Number following `label`, up to the currency sign or end of line.
fn labelled_value(text: &str, label: &str) -> Result<f64> {
    let (_, rest) = text
        .split_once(label)
        .ok_or_else(|| anyhow!("Missing '{}'", label.trim_end()))?;
    let value = rest
        .split(|c: char| c == '€' || c == '\n')
        .next()
        .unwrap_or_default()
        .trim();
    value
        .parse()
        .with_context(|| format!("Non-numeric value after '{}': '{}'", label.trim_end(), value))
}
