use crate::serializable_struct;
use invest_utils::Amount;
use serde::{Deserialize, Serialize};

serializable_struct! {
    OutputData {
        algorithm: String,
        dataset: String,
        budget: Amount,
        selection: Vec<String>,
        total_cost: Amount,
        total_profit: f64,
        elapsed_secs: f64,
        subsets_examined: Option<u64>,
        precision_gap: Option<f64>,
    }
}

impl OutputData {
    /// Total profit as a percentage of total cost.
    pub fn return_rate(&self) -> f64 {
        let cost = self.total_cost.to_f64();
        if cost > 0.0 {
            self.total_profit / cost * 100.0
        } else {
            0.0
        }
    }
}
