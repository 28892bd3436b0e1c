use crate::serializable_struct;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_BUDGET: f64 = 500.0;
pub const DEFAULT_ALGORITHM: &str = "dynamic";
pub const DEFAULT_DATA_DIR: &str = "data";

serializable_struct! {
    RunSettings {
        dataset: String,
        budget: Option<f64>,
        algorithm: Option<String>,
        timeout_ms: Option<u64>,
        hyperparameters: Option<Map<String, Value>>,
    }
}

impl RunSettings {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            budget: None,
            algorithm: None,
            timeout_ms: None,
            hyperparameters: None,
        }
    }

    pub fn budget(&self) -> f64 {
        self.budget.unwrap_or(DEFAULT_BUDGET)
    }

    pub fn algorithm(&self) -> &str {
        self.algorithm.as_deref().unwrap_or(DEFAULT_ALGORITHM)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// `foo.csv` is used as a path, anything else resolves to
    /// `<data_dir>/<name>.csv`.
    pub fn dataset_path(&self, data_dir: &Path) -> PathBuf {
        if self.dataset.ends_with(".csv") {
            PathBuf::from(&self.dataset)
        } else {
            data_dir.join(format!("{}.csv", self.dataset))
        }
    }
}
