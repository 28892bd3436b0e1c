//! CSV ingestion.
//!
//! Two layouts are recognised from the header row:
//!
//! * `name,price,profit` where `profit` is an absolute amount,
//! * `Actions #,Coût par action (en euros),Bénéfice (après 2 ans)` where the
//!   profit column is a percentage of cost (`"12%"` or `"12"`).
//!
//! Rows that are not valid UTF-8 or carry unparsable, non-finite or
//! non-positive values are skipped and counted. Everything returned is a
//! valid [`Catalog`].

use crate::{Catalog, Item};
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord, Writer};
use serde::Serialize;
use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};
use tracing::{debug, warn};

pub const ABSOLUTE_HEADERS: [&str; 3] = ["name", "price", "profit"];
pub const PERCENTAGE_HEADERS: [&str; 3] = [
    "Actions #",
    "Coût par action (en euros)",
    "Bénéfice (après 2 ans)",
];

/// Column layout resolved once from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSchema {
    Absolute {
        name: usize,
        price: usize,
        profit: usize,
    },
    Percentage {
        name: usize,
        cost: usize,
        profit_pct: usize,
    },
}

impl RecordSchema {
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == wanted)
        };
        let [name, price, profit] = ABSOLUTE_HEADERS.map(|h| position(h));
        if let (Some(name), Some(price), Some(profit)) = (name, price, profit) {
            return Ok(RecordSchema::Absolute {
                name,
                price,
                profit,
            });
        }
        let [name, cost, profit_pct] = PERCENTAGE_HEADERS.map(|h| position(h));
        if let (Some(name), Some(cost), Some(profit_pct)) = (name, cost, profit_pct) {
            return Ok(RecordSchema::Percentage {
                name,
                cost,
                profit_pct,
            });
        }
        Err(anyhow!(
            "Unrecognised header row: {:?}",
            headers.iter().collect::<Vec<_>>()
        ))
    }

    /// Normalises one data row into an [`Item`].
    pub fn parse_record(&self, record: &StringRecord) -> Result<Item> {
        let field = |index: usize| {
            record
                .get(index)
                .map(str::trim)
                .ok_or_else(|| anyhow!("Missing column {}", index))
        };
        let number = |index: usize| -> Result<f64> {
            let text = field(index)?;
            text.trim_end_matches('%')
                .trim()
                .parse::<f64>()
                .with_context(|| format!("Non-numeric value '{}'", text))
        };

        let (name, cost, profit) = match *self {
            RecordSchema::Absolute {
                name,
                price,
                profit,
            } => (field(name)?, number(price)?, number(profit)?),
            RecordSchema::Percentage {
                name,
                cost,
                profit_pct,
            } => {
                let cost = number(cost)?;
                let percentage = number(profit_pct)?;
                (field(name)?, cost, cost * percentage / 100.0)
            }
        };
        if name.is_empty() {
            return Err(anyhow!("Empty identifier"));
        }
        Item::new(name, cost, profit)
    }
}

#[derive(Debug, Clone)]
pub struct Ingested {
    pub catalog: Catalog,
    pub schema: RecordSchema,
    pub rejected: usize,
}

pub fn read_catalog<R: Read>(reader: R) -> Result<Ingested> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let schema = RecordSchema::from_headers(reader.headers().context("Failed to read header row")?)?;

    let mut items = Vec::new();
    let mut rejected = 0;
    for (row, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            // the reader cannot move past a failing source
            Err(e) if e.is_io_error() => {
                return Err(e).with_context(|| format!("Failed to read row {}", row + 1))
            }
            Err(e) => {
                debug!(row = row + 1, error = %e, "Skipping undecodable row");
                rejected += 1;
                continue;
            }
        };
        match schema.parse_record(&record) {
            Ok(item) => items.push(item),
            Err(e) => {
                debug!(row = row + 1, error = %e, "Skipping row");
                rejected += 1;
            }
        }
    }
    if rejected > 0 {
        warn!(rejected, accepted = items.len(), "Skipped invalid rows");
    }

    Ok(Ingested {
        catalog: Catalog::new(items)?,
        schema,
        rejected,
    })
}

pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Ingested> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open file: {:?}", path.as_ref()))?;
    read_catalog(file).with_context(|| format!("Failed to load catalog: {:?}", path.as_ref()))
}

#[derive(Serialize)]
struct AbsoluteRow<'a> {
    name: &'a str,
    price: f64,
    profit: f64,
}

/// Writes `catalog` in the `name,price,profit` layout.
pub fn write_catalog<W: Write>(writer: W, catalog: &Catalog) -> Result<()> {
    let mut writer = Writer::from_writer(writer);
    for item in catalog.items() {
        writer.serialize(AbsoluteRow {
            name: &item.id,
            price: item.cost,
            profit: item.profit,
        })?;
    }
    writer.flush()?;
    Ok(())
}
