use anyhow::anyhow;
use invest_catalog::{Instance, Selection};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

pub mod brute_force;
mod capacity;
pub use capacity::DEFAULT_MAX_CELLS;
pub mod dynamic;
mod error;
pub use error::*;
mod interrupt;
pub use interrupt::*;
pub mod rolling;

use brute_force::Enumeration;
use dynamic::{Knapsack, PrecisionMismatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    BruteForce,
    Dynamic,
    Rolling,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::BruteForce,
        Algorithm::Dynamic,
        Algorithm::Rolling,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::BruteForce => "brute_force",
            Algorithm::Dynamic => "dynamic",
            Algorithm::Rolling => "rolling",
        }
    }

    /// Solves `instance`, handing every improved selection to
    /// `save_solution`. If the search is interrupted the last saved outcome
    /// is the best one found.
    ///
    /// Recognised hyperparameters: `check_interval` (brute_force) and
    /// `max_cells` (dynamic, rolling).
    pub fn solve(
        &self,
        instance: &Instance,
        interrupt: &Interrupt,
        hyperparameters: &Option<Map<String, Value>>,
        save_solution: &mut dyn FnMut(&Outcome),
    ) -> Result<Outcome, SolveError> {
        let hyperparameter = |name: &str| {
            hyperparameters
                .as_ref()
                .and_then(|h| h.get(name))
                .and_then(Value::as_u64)
        };
        let max_cells = hyperparameter("max_cells")
            .and_then(|cells| usize::try_from(cells).ok())
            .unwrap_or(DEFAULT_MAX_CELLS);
        let outcome = match self {
            Algorithm::BruteForce => {
                let check_interval =
                    hyperparameter("check_interval").unwrap_or(brute_force::DEFAULT_CHECK_INTERVAL);
                let best =
                    brute_force::search(instance, interrupt, check_interval, &mut |incumbent| {
                        save_solution(&Outcome::from(incumbent.clone()))
                    })?;
                return Ok(best.into());
            }
            Algorithm::Dynamic => Outcome::from(dynamic::knapsack_within(instance, max_cells)?),
            Algorithm::Rolling => Outcome::from(rolling::knapsack_within(instance, max_cells)?),
        };
        save_solution(&outcome);
        Ok(outcome)
    }
}

impl FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brute_force" | "bruteforce" => Ok(Algorithm::BruteForce),
            "dynamic" | "knapsack" => Ok(Algorithm::Dynamic),
            "rolling" => Ok(Algorithm::Rolling),
            _ => Err(anyhow!(
                "Unknown algorithm '{}', expected one of {:?}",
                s,
                Algorithm::ALL.map(|a| a.name())
            )),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Solver-independent view of a result.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub selection: Selection,
    pub total_profit: f64,
    pub subsets_examined: Option<u64>,
    pub precision_mismatch: Option<PrecisionMismatch>,
}

impl From<Enumeration> for Outcome {
    fn from(enumeration: Enumeration) -> Self {
        Self {
            selection: enumeration.selection,
            total_profit: enumeration.total_profit,
            subsets_examined: Some(enumeration.subsets_examined),
            precision_mismatch: None,
        }
    }
}

impl From<Knapsack> for Outcome {
    fn from(knapsack: Knapsack) -> Self {
        Self {
            selection: knapsack.selection,
            total_profit: knapsack.total_profit,
            subsets_examined: None,
            precision_mismatch: knapsack.precision_mismatch,
        }
    }
}
