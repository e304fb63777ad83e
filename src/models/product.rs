use diesel::prelude::*;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::domain::types::{
    ProductAvailability, ProductLink, ProductName, ProductPrice, RunId, TypeConstraintError,
};

/// Diesel model representing a row in the `product` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::product)]
pub struct Product {
    pub id: i32,
    pub run_timestamp: String,
    pub name: String,
    pub availability: String,
    pub price: String,
    pub link: String,
}

/// Insertable form of [`Product`] tagged with the run it belongs to.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::product)]
pub struct NewProduct<'a> {
    pub run_timestamp: &'a str,
    pub name: &'a str,
    pub availability: &'a str,
    pub price: &'a str,
    pub link: &'a str,
}

impl<'a> NewProduct<'a> {
    pub fn for_run(run_id: &'a RunId, product: &'a DomainNewProduct) -> Self {
        Self {
            run_timestamp: run_id.as_str(),
            name: product.name.as_str(),
            availability: product.availability.as_str(),
            price: product.price.as_str(),
            link: product.link.as_str(),
        }
    }
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id,
            run_id: RunId::new(product.run_timestamp)?,
            name: ProductName::new(product.name)?,
            availability: ProductAvailability::new(product.availability),
            price: ProductPrice::new(product.price),
            link: ProductLink::new(product.link),
        })
    }
}
