//! Product acquisition.
//!
//! Fetching and parsing the listing pages happens outside this crate. The
//! scraper hands over its result as a CSV export with the header
//! `name,availability,price,link`, which [`CsvProductSource`] reads.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::product::NewProduct;
use crate::domain::types::{ProductAvailability, ProductLink, ProductName, ProductPrice};

#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("failed to read product export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse product export: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid product on line {line}: {message}")]
    InvalidRecord { line: usize, message: String },
    #[error("product source unavailable: {0}")]
    Unavailable(String),
}

/// Anything that can produce the product list of one acquisition cycle.
///
/// An empty list means the listing had no products. Failures must be
/// reported as errors, never as an empty list.
pub trait ProductSource {
    fn fetch_all_data(&self) -> Result<Vec<NewProduct>, AcquisitionError>;
}

impl<F> ProductSource for F
where
    F: Fn() -> Result<Vec<NewProduct>, AcquisitionError>,
{
    fn fetch_all_data(&self) -> Result<Vec<NewProduct>, AcquisitionError> {
        self()
    }
}

/// Reads products from a CSV export on disk.
#[derive(Debug, Clone)]
pub struct CsvProductSource {
    path: PathBuf,
}

impl CsvProductSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProductSource for CsvProductSource {
    fn fetch_all_data(&self) -> Result<Vec<NewProduct>, AcquisitionError> {
        let file = File::open(&self.path)?;
        parse_products(file)
    }
}

#[derive(Debug, Deserialize)]
struct CsvProductRow {
    name: String,
    #[serde(default)]
    availability: String,
    #[serde(default)]
    price: String,
    #[serde(default)]
    link: String,
}

/// Parses a CSV product export. Row order is preserved.
pub fn parse_products<R: Read>(reader: R) -> Result<Vec<NewProduct>, AcquisitionError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut products = Vec::new();

    for (index, result) in rdr.deserialize::<CsvProductRow>().enumerate() {
        let row = result?;
        // Line 1 is the header.
        let name = ProductName::new(row.name).map_err(|e| AcquisitionError::InvalidRecord {
            line: index + 2,
            message: e.to_string(),
        })?;

        products.push(NewProduct {
            name,
            availability: ProductAvailability::new(row.availability),
            price: ProductPrice::new(row.price),
            link: ProductLink::new(row.link),
        });
    }

    Ok(products)
}
