//! Exhaustive enumeration of every non-empty subset.
//!
//! Subsets are visited by increasing size and, within a size, in
//! lexicographic order of catalog indices. A feasible subset replaces the
//! incumbent only when its profit is strictly greater, so the earliest
//! enumerated subset wins ties. Exponential in the catalog size: meant for
//! validating the DP solvers on small instances.

use crate::{capacity::exact_budget, Interrupt, SolveError};
use invest_catalog::{Instance, Selection};
use invest_utils::Amount;
use tracing::debug;

/// Number of subsets between two polls of the [`Interrupt`].
pub const DEFAULT_CHECK_INTERVAL: u64 = 4096;

#[derive(Debug, Clone, PartialEq)]
pub struct Enumeration {
    pub selection: Selection,
    pub total_profit: f64,
    pub subsets_examined: u64,
}

pub fn find_best_subset(instance: &Instance) -> Result<Enumeration, SolveError> {
    search(instance, &Interrupt::never(), DEFAULT_CHECK_INTERVAL, &mut |_| {})
}

/// Runs the enumeration, calling `on_improvement` with every new incumbent.
///
/// When `interrupt` fires the search stops with [`SolveError::Interrupted`];
/// the last incumbent passed to `on_improvement` is the best subset found so
/// far.
pub fn search(
    instance: &Instance,
    interrupt: &Interrupt,
    check_interval: u64,
    on_improvement: &mut dyn FnMut(&Enumeration),
) -> Result<Enumeration, SolveError> {
    let budget = exact_budget(instance)?;
    let items = instance.catalog.items();
    let costs = instance.catalog.exact_costs();
    let num_items = items.len();
    let check_interval = check_interval.max(1);

    let mut best = Enumeration {
        selection: Selection::new(),
        total_profit: 0.0,
        subsets_examined: 0,
    };
    let mut examined: u64 = 0;
    let mut combo: Vec<usize> = Vec::with_capacity(num_items);

    for size in 1..=num_items {
        combo.clear();
        combo.extend(0..size);
        loop {
            if examined % check_interval == 0 && interrupt.is_triggered() {
                debug!(examined, best_profit = best.total_profit, "Enumeration interrupted");
                return Err(SolveError::Interrupted {
                    subsets_examined: examined,
                });
            }
            examined += 1;

            // overflow can only mean the subset is far beyond any budget
            let total_cost = combo
                .iter()
                .try_fold(Amount::ZERO, |acc, &i| acc.checked_add(costs[i]));
            if matches!(total_cost, Some(cost) if cost <= budget) {
                let total_profit: f64 = combo.iter().map(|&i| items[i].profit).sum();
                if total_profit > best.total_profit {
                    best.selection = Selection {
                        items: combo.clone(),
                    };
                    best.total_profit = total_profit;
                    best.subsets_examined = examined;
                    on_improvement(&best);
                }
            }

            if !next_combination(&mut combo, num_items) {
                break;
            }
        }
    }

    best.subsets_examined = examined;
    debug!(
        num_items,
        examined,
        best_profit = best.total_profit,
        "Enumeration complete"
    );
    Ok(best)
}

/// Advances `combo` to the next k-combination of `0..n` in lexicographic
/// order. Returns false once the last combination has been passed.
fn next_combination(combo: &mut [usize], n: usize) -> bool {
    let k = combo.len();
    let mut i = k;
    while i > 0 {
        i -= 1;
        if combo[i] < n - k + i {
            combo[i] += 1;
            for j in i + 1..k {
                combo[j] = combo[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::next_combination;

    #[test]
    fn test_next_combination_lexicographic() {
        let mut combo = vec![0, 1];
        let mut seen = vec![combo.clone()];
        while next_combination(&mut combo, 4) {
            seen.push(combo.clone());
        }
        assert_eq!(
            seen,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }

    #[test]
    fn test_next_combination_full_size() {
        let mut combo = vec![0, 1, 2];
        assert!(!next_combination(&mut combo, 3));
    }
}
