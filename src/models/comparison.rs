use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::comparison::{
    NewComparison as DomainNewComparison, StoredComparison as DomainStoredComparison,
};
use crate::domain::types::{RunId, TypeConstraintError};

/// Diesel model representing the `comparison_log` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::comparison_log)]
pub struct Comparison {
    pub id: i32,
    pub ts1: Option<String>,
    pub ts2: Option<String>,
    pub new_count: i32,
    pub removed_count: i32,
    pub updated_count: i32,
    pub new_items: String,
    pub removed_items: String,
    pub updated_items: String,
    pub log_time: NaiveDateTime,
}

/// Insertable form of [`Comparison`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::comparison_log)]
pub struct NewComparison<'a> {
    pub ts1: Option<&'a str>,
    pub ts2: Option<&'a str>,
    pub new_count: i32,
    pub removed_count: i32,
    pub updated_count: i32,
    pub new_items: &'a str,
    pub removed_items: &'a str,
    pub updated_items: &'a str,
    pub log_time: NaiveDateTime,
}

impl<'a> From<&'a DomainNewComparison> for NewComparison<'a> {
    fn from(comparison: &'a DomainNewComparison) -> Self {
        Self {
            ts1: comparison.ts1.as_ref().map(RunId::as_str),
            ts2: comparison.ts2.as_ref().map(RunId::as_str),
            new_count: comparison.new_count,
            removed_count: comparison.removed_count,
            updated_count: comparison.updated_count,
            new_items: &comparison.new_items,
            removed_items: &comparison.removed_items,
            updated_items: &comparison.updated_items,
            log_time: comparison.log_time,
        }
    }
}

impl TryFrom<Comparison> for DomainStoredComparison {
    type Error = TypeConstraintError;

    fn try_from(comparison: Comparison) -> Result<Self, Self::Error> {
        Ok(Self {
            id: comparison.id.try_into()?,
            ts1: comparison.ts1,
            ts2: comparison.ts2,
            new_count: comparison.new_count,
            removed_count: comparison.removed_count,
            updated_count: comparison.updated_count,
            new_items: comparison.new_items,
            removed_items: comparison.removed_items,
            updated_items: comparison.updated_items,
            log_time: comparison.log_time,
        })
    }
}
