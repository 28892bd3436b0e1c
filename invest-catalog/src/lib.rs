use anyhow::{anyhow, Result};
use invest_utils::{Amount, Rounding};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub mod compare;
pub use compare::*;
pub mod ingest;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub cost: f64,
    pub profit: f64,
}

impl Item {
    /// The cost is rounded half-up to whole cents.
    pub fn new(id: impl Into<String>, cost: f64, profit: f64) -> Result<Self> {
        let mut item = Self {
            id: id.into(),
            cost,
            profit,
        };
        item.cost = item.validate()?.to_f64();
        Ok(item)
    }

    /// Checks the invariants and returns the cost in whole cents.
    fn validate(&self) -> Result<Amount> {
        if !(self.cost.is_finite() && self.cost > 0.0) {
            return Err(anyhow!("Item '{}' has non-positive cost ({})", self.id, self.cost));
        }
        if !(self.profit.is_finite() && self.profit > 0.0) {
            return Err(anyhow!(
                "Item '{}' has non-positive profit ({})",
                self.id,
                self.profit
            ));
        }
        let cost = Amount::from_f64(self.cost)
            .map_err(|e| anyhow!("Item '{}' has unusable cost: {}", self.id, e))?;
        let cost = cost
            .round_to_minor_units(Rounding::HalfUp)
            .ok_or_else(|| anyhow!("Item '{}' cost is out of range ({})", self.id, self.cost))?;
        if !cost.is_positive() {
            return Err(anyhow!("Item '{}' cost rounds to zero ({})", self.id, self.cost));
        }
        Ok(cost)
    }

    /// Profit per unit of cost.
    pub fn return_rate(&self) -> f64 {
        self.profit / self.cost
    }
}

/// Validated, ordered list of items. Immutable once built. Every cost is
/// held in whole cents, so all solvers and [`Instance::verify_selection`]
/// see the same amounts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Vec<Item>", into = "Vec<Item>")]
pub struct Catalog {
    items: Vec<Item>,
    costs: Vec<Amount>,
}

impl Catalog {
    pub fn new(mut items: Vec<Item>) -> Result<Self> {
        let costs = items
            .iter_mut()
            .map(|item| {
                let cost = item.validate()?;
                item.cost = cost.to_f64();
                Ok(cost)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { items, costs })
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            costs: Vec::new(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item costs in whole cents, index-aligned with `items()`.
    pub fn exact_costs(&self) -> &[Amount] {
        &self.costs
    }
}

impl TryFrom<Vec<Item>> for Catalog {
    type Error = anyhow::Error;

    fn try_from(items: Vec<Item>) -> Result<Self> {
        Catalog::new(items)
    }
}

impl From<Catalog> for Vec<Item> {
    fn from(catalog: Catalog) -> Self {
        catalog.items
    }
}

/// Unordered subset of catalog items, stored as catalog indices.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub items: Vec<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Indices in ascending order, for order-insensitive comparisons.
    pub fn sorted(&self) -> Vec<usize> {
        let mut items = self.items.clone();
        items.sort_unstable();
        items
    }

    pub fn identifiers<'a>(&self, catalog: &'a Catalog) -> Vec<&'a str> {
        self.items
            .iter()
            .filter_map(|&i| catalog.items().get(i))
            .map(|item| item.id.as_str())
            .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Track {
    pub num_items: usize,
    pub budget: f64,
}

/// A catalog together with the budget it must be invested under.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Instance {
    pub catalog: Catalog,
    pub budget: f64,
}

impl Instance {
    pub fn new(catalog: Catalog, budget: f64) -> Self {
        Self { catalog, budget }
    }

    pub fn exact_budget(&self) -> Result<Amount> {
        Amount::from_f64(self.budget).map_err(|e| anyhow!("Budget ({}) is unusable: {}", self.budget, e))
    }

    /// Deterministic synthetic catalog: costs between 1.00 and 100.00 with
    /// whole cents, profits between 1% and 40% of cost rounded to the cent.
    pub fn generate_instance(seed: &[u8; 32], track: &Track) -> Result<Self> {
        let mut rng = SmallRng::from_seed(seed.clone());
        let items = (0..track.num_items)
            .map(|i| {
                let cost_cents: i64 = rng.gen_range(100..=10_000);
                let percentage: i64 = rng.gen_range(1..=40);
                let profit_cents = (cost_cents * percentage + 50) / 100;
                Item::new(
                    format!("Share-{:04}", i + 1),
                    cost_cents as f64 / 100.0,
                    profit_cents as f64 / 100.0,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Instance {
            catalog: Catalog::new(items)?,
            budget: track.budget,
        })
    }

    pub fn summarize(&self, selection: &Selection) -> Result<SolutionSummary> {
        let mut total_cost = Amount::ZERO;
        let mut total_profit = 0.0;
        for &index in &selection.items {
            let item = self
                .catalog
                .items()
                .get(index)
                .ok_or_else(|| anyhow!("Item ({}) is out of bounds", index))?;
            total_cost = total_cost
                .checked_add(self.catalog.exact_costs()[index])
                .ok_or_else(|| anyhow!("Total cost overflows at item ({})", index))?;
            total_profit += item.profit;
        }
        Ok(SolutionSummary::new(
            total_cost,
            total_profit,
            selection.items.len(),
        ))
    }

    pub fn verify_selection(&self, selection: &Selection) -> Result<SolutionSummary> {
        let unique: HashSet<usize> = selection.items.iter().cloned().collect();
        if unique.len() != selection.items.len() {
            return Err(anyhow!("Duplicate items selected."));
        }

        let summary = self.summarize(selection)?;
        let budget = self.exact_budget()?;
        if summary.total_cost > budget {
            return Err(anyhow!(
                "Total cost ({}) exceeded budget ({})",
                summary.total_cost,
                budget
            ));
        }
        Ok(summary)
    }
}
