use crate::SolveError;
use invest_catalog::Instance;
use invest_utils::{Amount, Rounding};

/// Largest table, in cells, the DP solvers will allocate unless a
/// `max_cells` hyperparameter says otherwise. About 2.4 GB for the full
/// value and keep tables.
pub const DEFAULT_MAX_CELLS: usize = 1 << 28;

/// An instance mapped onto integer minor units: the budget is floored, item
/// costs are already whole cents.
#[derive(Debug, Clone)]
pub(crate) struct Capacity {
    pub budget: Amount,
    pub rows: usize,
    pub columns: usize,
    pub costs: Vec<usize>,
}

impl Capacity {
    pub fn max_weight(&self) -> usize {
        self.columns - 1
    }

    pub fn cells(&self) -> usize {
        self.rows * self.columns
    }

    fn too_large(&self) -> SolveError {
        SolveError::Capacity {
            rows: self.rows,
            columns: self.columns,
        }
    }

    /// Allocates `len` copies of `value`, reporting allocator failure as
    /// [`SolveError::Capacity`] instead of aborting.
    pub fn allocate<T: Clone>(&self, len: usize, value: T) -> Result<Vec<T>, SolveError> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(len)
            .map_err(|_| self.too_large())?;
        buffer.resize(len, value);
        Ok(buffer)
    }
}

pub(crate) fn exact_budget(instance: &Instance) -> Result<Amount, SolveError> {
    let invalid = SolveError::InvalidBudget {
        budget: instance.budget,
    };
    if !instance.budget.is_finite() || instance.budget < 0.0 {
        return Err(invalid);
    }
    Amount::from_f64(instance.budget).map_err(|_| invalid)
}

/// Validates the budget and checks that a table of `rows` x `W + 1` cells
/// stays within `max_cells`.
pub(crate) fn discretize(
    instance: &Instance,
    rows: usize,
    max_cells: usize,
) -> Result<Capacity, SolveError> {
    let budget = exact_budget(instance)?;
    let too_large = |columns: usize| SolveError::Capacity { rows, columns };

    let max_weight = usize::try_from(budget.to_minor_units(Rounding::Floor))
        .map_err(|_| too_large(usize::MAX))?;
    let columns = max_weight.checked_add(1).ok_or_else(|| too_large(usize::MAX))?;
    match rows.checked_mul(columns) {
        Some(cells) if cells <= max_cells => {}
        _ => return Err(too_large(columns)),
    }

    let costs = instance
        .catalog
        .exact_costs()
        .iter()
        .map(|cost| cost.to_minor_units(Rounding::HalfUp) as usize)
        .collect();

    Ok(Capacity {
        budget,
        rows,
        columns,
        costs,
    })
}
