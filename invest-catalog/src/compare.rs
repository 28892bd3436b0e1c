use invest_utils::Amount;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SolutionSummary {
    pub total_cost: Amount,
    pub total_profit: f64,
    pub item_count: usize,
}

impl SolutionSummary {
    pub fn new(total_cost: Amount, total_profit: f64, item_count: usize) -> Self {
        Self {
            total_cost,
            total_profit,
            item_count,
        }
    }

    /// Total profit as a percentage of total cost, 0 when nothing was bought.
    pub fn return_rate(&self) -> f64 {
        let cost = self.total_cost.to_f64();
        if cost > 0.0 {
            self.total_profit / cost * 100.0
        } else {
            0.0
        }
    }
}

/// Candidate minus reference, field by field.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DeltaReport {
    pub profit_delta: f64,
    pub cost_delta: Amount,
    pub return_delta: f64,
    pub item_count_delta: i64,
}

impl DeltaReport {
    pub fn profit_agrees(&self, tolerance: f64) -> bool {
        self.profit_delta.abs() <= tolerance
    }
}

pub fn compare(candidate: &SolutionSummary, reference: &SolutionSummary) -> DeltaReport {
    DeltaReport {
        profit_delta: candidate.total_profit - reference.total_profit,
        cost_delta: candidate.total_cost - reference.total_cost,
        return_delta: candidate.return_rate() - reference.return_rate(),
        item_count_delta: candidate.item_count as i64 - reference.item_count as i64,
    }
}
