//! The DP solver with the capacity dimension rolled into one buffer.
//!
//! Items are folded into a single `W + 1` value buffer from high capacity to
//! low, so `values[w - cost]` still holds the previous row when it is read.
//! Inclusion decisions go to a bit-packed keep table (`n * (W + 1)` bits),
//! which makes the reconstruction and tie-breaking identical to
//! [`crate::dynamic::knapsack`] at a fraction of the memory.

use crate::{
    capacity::{discretize, Capacity, DEFAULT_MAX_CELLS},
    dynamic::{reconstruct, Knapsack},
    SolveError,
};
use invest_catalog::Instance;
use tracing::debug;

struct KeepBits {
    columns: usize,
    words: Vec<u64>,
}

impl KeepBits {
    fn new(capacity: &Capacity, rows: usize) -> Result<Self, SolveError> {
        let columns = capacity.columns;
        Ok(Self {
            columns,
            words: capacity.allocate((rows * columns + 63) / 64, 0u64)?,
        })
    }

    fn set(&mut self, row: usize, w: usize) {
        let bit = row * self.columns + w;
        self.words[bit / 64] |= 1u64 << (bit % 64);
    }

    fn get(&self, row: usize, w: usize) -> bool {
        let bit = row * self.columns + w;
        self.words[bit / 64] & (1u64 << (bit % 64)) != 0
    }
}

pub fn knapsack(instance: &Instance) -> Result<Knapsack, SolveError> {
    knapsack_within(instance, DEFAULT_MAX_CELLS)
}

/// Like [`knapsack`], but refuses with [`SolveError::Capacity`] when the
/// keep table would exceed `max_cells` bits.
pub fn knapsack_within(instance: &Instance, max_cells: usize) -> Result<Knapsack, SolveError> {
    let num_items = instance.catalog.len();
    let capacity = discretize(instance, num_items + 1, max_cells)?;
    let columns = capacity.columns;
    let items = instance.catalog.items();

    let mut values = capacity.allocate(columns, 0.0f64)?;
    // row i - 1 holds the decisions for item i
    let mut keep = KeepBits::new(&capacity, num_items)?;

    for (i, item) in items.iter().enumerate() {
        let cost = capacity.costs[i];
        for w in (cost..columns).rev() {
            let include = item.profit + values[w - cost];
            if include > values[w] {
                values[w] = include;
                keep.set(i, w);
            }
        }
    }

    let table_profit = values[capacity.max_weight()];
    debug!(
        num_items,
        columns,
        keep_bytes = keep.words.len() * 8,
        table_profit,
        "Rolling value buffer filled"
    );
    Ok(reconstruct(instance, &capacity, table_profit, |i, w| {
        keep.get(i - 1, w)
    }))
}
