#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    #[error("Invalid budget ({budget}): must be a finite, non-negative amount")]
    InvalidBudget { budget: f64 },

    #[error("Search interrupted after {subsets_examined} subsets")]
    Interrupted { subsets_examined: u64 },

    #[error("Value table of {rows} x {columns} cells does not fit in memory")]
    Capacity { rows: usize, columns: usize },
}
