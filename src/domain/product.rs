use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::domain::types::{ProductAvailability, ProductLink, ProductName, ProductPrice, RunId};

/// A product observed by one acquisition cycle, before it is assigned a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: ProductName,
    pub availability: ProductAvailability,
    pub price: ProductPrice,
    pub link: ProductLink,
}

/// A stored product row belonging to a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i32,
    pub run_id: RunId,
    pub name: ProductName,
    pub availability: ProductAvailability,
    pub price: ProductPrice,
    pub link: ProductLink,
}

/// Observed attributes of a product within one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductAttributes {
    pub availability: ProductAvailability,
    pub price: ProductPrice,
    pub link: ProductLink,
}

impl From<NewProduct> for (ProductName, ProductAttributes) {
    fn from(product: NewProduct) -> Self {
        (
            product.name,
            ProductAttributes {
                availability: product.availability,
                price: product.price,
                link: product.link,
            },
        )
    }
}

impl From<Product> for (ProductName, ProductAttributes) {
    fn from(product: Product) -> Self {
        (
            product.name,
            ProductAttributes {
                availability: product.availability,
                price: product.price,
                link: product.link,
            },
        )
    }
}

/// By-name projection of a run, the input of the diff engine.
///
/// Built with last-write-wins: when a run contains the same name twice, the
/// later record replaces the earlier one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<ProductName, ProductAttributes>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects records in insertion order onto a by-name mapping.
    pub fn from_products<I, P>(products: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<(ProductName, ProductAttributes)>,
    {
        Self(products.into_iter().map(Into::into).collect())
    }

    pub fn insert(&mut self, name: ProductName, attributes: ProductAttributes) {
        self.0.insert(name, attributes);
    }

    pub fn get(&self, name: &ProductName) -> Option<&ProductAttributes> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &ProductName) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, ProductName, ProductAttributes> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a ProductName, &'a ProductAttributes);
    type IntoIter = btree_map::Iter<'a, ProductName, ProductAttributes>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(ProductName, ProductAttributes)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (ProductName, ProductAttributes)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
