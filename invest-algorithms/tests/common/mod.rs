#![allow(dead_code)]

use invest_catalog::{Catalog, Instance, Item};
use rand::{rngs::SmallRng, Rng, SeedableRng};

pub fn instance(items: &[(&str, f64, f64)], budget: f64) -> Instance {
    let items = items
        .iter()
        .map(|&(id, cost, profit)| Item::new(id, cost, profit).unwrap())
        .collect();
    Instance::new(Catalog::new(items).unwrap(), budget)
}

/// Items A(100, 60), B(200, 100), C(120, 90) under a budget of 300.
pub fn abc_instance() -> Instance {
    instance(
        &[("A", 100.0, 60.0), ("B", 200.0, 100.0), ("C", 120.0, 90.0)],
        300.0,
    )
}

/// Whole-cent costs and whole-unit profits, so every profit sum is exact in
/// floating point regardless of summation order.
pub fn random_integral_instance(seed: u64, num_items: usize) -> Instance {
    let mut rng = SmallRng::seed_from_u64(seed);
    let items: Vec<Item> = (0..num_items)
        .map(|i| {
            let cost_cents: u32 = rng.gen_range(1..=5_000);
            let profit: u32 = rng.gen_range(1..=60);
            Item::new(format!("I{}", i), cost_cents as f64 / 100.0, profit as f64).unwrap()
        })
        .collect();
    let total: f64 = items.iter().map(|i| i.cost).sum();
    let budget_cents: u32 = rng.gen_range(0..=(total * 100.0) as u32);
    Instance::new(Catalog::new(items).unwrap(), budget_cents as f64 / 100.0)
}

pub fn seed_bytes(seed: u8) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[0] = seed;
    bytes[31] = seed.wrapping_mul(31);
    bytes
}
