//! Bounded 0/1 knapsack over a value table indexed by (items considered,
//! capacity in minor units).
//!
//! `dp[i][w]` is the best profit using the first `i` items within `w` cents.
//! `keep[i][w]` is set only when taking item `i` is strictly better than
//! leaving it out, so ties favour exclusion. Time and space are
//! O(n * (W + 1)); see [`crate::rolling`] for the O(W) value buffer.

use crate::{
    capacity::{discretize, Capacity, DEFAULT_MAX_CELLS},
    SolveError,
};
use invest_catalog::{Instance, Selection};
use invest_utils::Amount;
use tracing::{debug, warn};

/// Relative difference between table and reconstructed profit still
/// attributed to floating point summation order.
pub const PROFIT_TOLERANCE: f64 = 1e-9;

/// The reconstructed selection does not add up to the profit the value table
/// reported, either because the exact budget check rejected an item the
/// table kept or because the profit sums drifted apart.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecisionMismatch {
    pub table_profit: f64,
    pub reconstructed_profit: f64,
    /// Catalog indices the table kept but the exact budget check rejected.
    pub skipped: Vec<usize>,
}

impl PrecisionMismatch {
    pub fn gap(&self) -> f64 {
        self.table_profit - self.reconstructed_profit
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Knapsack {
    pub selection: Selection,
    /// `dp[n][W]`, the optimum according to the value table.
    pub total_profit: f64,
    pub total_cost: Amount,
    pub precision_mismatch: Option<PrecisionMismatch>,
}

pub fn knapsack(instance: &Instance) -> Result<Knapsack, SolveError> {
    knapsack_within(instance, DEFAULT_MAX_CELLS)
}

/// Like [`knapsack`], but refuses with [`SolveError::Capacity`] when the
/// table would exceed `max_cells`.
pub fn knapsack_within(instance: &Instance, max_cells: usize) -> Result<Knapsack, SolveError> {
    let num_items = instance.catalog.len();
    let rows = num_items + 1;
    let capacity = discretize(instance, rows, max_cells)?;
    let columns = capacity.columns;
    let items = instance.catalog.items();

    let mut dp = capacity.allocate(capacity.cells(), 0.0f64)?;
    let mut keep = capacity.allocate(capacity.cells(), false)?;

    for i in 1..=num_items {
        let cost = capacity.costs[i - 1];
        let profit = items[i - 1].profit;
        let prev_row = (i - 1) * columns;
        let row = i * columns;

        for w in 0..columns {
            let exclude = dp[prev_row + w];
            if cost <= w {
                let include = profit + dp[prev_row + w - cost];
                if include > exclude {
                    dp[row + w] = include;
                    keep[row + w] = true;
                    continue;
                }
            }
            dp[row + w] = exclude;
        }
    }

    let table_profit = dp[num_items * columns + capacity.max_weight()];
    debug!(rows, columns, table_profit, "Value table filled");
    Ok(reconstruct(
        instance,
        &capacity,
        table_profit,
        |i, w| keep[i * columns + w],
    ))
}

/// Walks the keep table from item `n` down to `1` at capacity `W`. An item
/// is taken only if the running exact cost stays within the exact budget.
pub(crate) fn reconstruct(
    instance: &Instance,
    capacity: &Capacity,
    table_profit: f64,
    kept: impl Fn(usize, usize) -> bool,
) -> Knapsack {
    let items = instance.catalog.items();
    let costs = instance.catalog.exact_costs();

    let mut w = capacity.max_weight();
    let mut total_cost = Amount::ZERO;
    let mut selected = Vec::new();
    let mut skipped = Vec::new();

    for i in (1..=items.len()).rev() {
        if !kept(i, w) {
            continue;
        }
        match total_cost.checked_add(costs[i - 1]) {
            Some(cost) if cost <= capacity.budget => {
                selected.push(i - 1);
                total_cost = cost;
                w -= capacity.costs[i - 1];
            }
            _ => skipped.push(i - 1),
        }
    }
    selected.reverse();

    let reconstructed_profit: f64 = selected.iter().map(|&i| items[i].profit).sum();
    let drift = (table_profit - reconstructed_profit).abs();
    let precision_mismatch = if !skipped.is_empty()
        || drift > PROFIT_TOLERANCE * table_profit.abs().max(1.0)
    {
        let mismatch = PrecisionMismatch {
            table_profit,
            reconstructed_profit,
            skipped,
        };
        warn!(
            table_profit,
            reconstructed_profit,
            gap = mismatch.gap(),
            skipped = ?mismatch.skipped,
            "Reconstructed selection disagrees with value table"
        );
        Some(mismatch)
    } else {
        None
    };

    Knapsack {
        selection: Selection { items: selected },
        total_profit: table_profit,
        total_cost,
        precision_mismatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invest_catalog::{Catalog, Item};

    fn single_item(cost: f64, budget: f64) -> (Instance, Capacity) {
        let catalog = Catalog::new(vec![Item::new("A", cost, 1.0).unwrap()]).unwrap();
        let instance = Instance::new(catalog, budget);
        let capacity = Capacity {
            budget: Amount::from_f64(budget).unwrap(),
            rows: 2,
            columns: 35,
            costs: vec![34],
        };
        (instance, capacity)
    }

    #[test]
    fn test_guard_skips_kept_item_over_budget() {
        let (instance, capacity) = single_item(0.34, 0.33);
        let result = reconstruct(&instance, &capacity, 1.0, |_, _| true);

        assert!(result.selection.is_empty());
        assert_eq!(result.total_cost, Amount::ZERO);
        assert_eq!(result.total_profit, 1.0);
        let mismatch = result.precision_mismatch.unwrap();
        assert_eq!(mismatch.skipped, vec![0]);
        assert_eq!(mismatch.reconstructed_profit, 0.0);
        assert_eq!(mismatch.gap(), 1.0);
    }

    #[test]
    fn test_profit_drift_is_reported() {
        let (instance, capacity) = single_item(0.34, 0.34);
        let result = reconstruct(&instance, &capacity, 5.0, |_, _| false);

        let mismatch = result.precision_mismatch.unwrap();
        assert!(mismatch.skipped.is_empty());
        assert_eq!(mismatch.gap(), 5.0);
    }

    #[test]
    fn test_consistent_reconstruction_has_no_mismatch() {
        let (instance, capacity) = single_item(0.34, 0.34);
        let result = reconstruct(&instance, &capacity, 1.0, |_, w| w == 34);

        assert_eq!(result.selection.items, vec![0]);
        assert_eq!(result.precision_mismatch, None);
    }
}
