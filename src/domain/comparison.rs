//! Diff results and their persisted comparison log form.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::product::ProductAttributes;
use crate::domain::types::{
    ComparisonId, ProductAvailability, ProductLink, ProductName, ProductPrice, RunId,
    TypeConstraintError,
};

/// A field of an updated product: either carried through or an old/new pair.
///
/// Serialized untagged, so an unchanged field is the bare value and a changed
/// one is `{"old": .., "new": ..}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldChange<T> {
    Changed { old: T, new: T },
    Unchanged(T),
}

impl<T> FieldChange<T> {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }

    /// Value observed in the later run.
    pub fn current(&self) -> &T {
        match self {
            Self::Changed { new, .. } => new,
            Self::Unchanged(value) => value,
        }
    }

    /// Value observed in the earlier run.
    pub fn previous(&self) -> &T {
        match self {
            Self::Changed { old, .. } => old,
            Self::Unchanged(value) => value,
        }
    }
}

/// Detail of a product whose availability or price changed between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdatedProduct {
    pub availability: FieldChange<ProductAvailability>,
    pub price: FieldChange<ProductPrice>,
    /// Link from the later run.
    pub link: ProductLink,
}

/// Three-way classification of two snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunDiff {
    pub new_items: BTreeMap<ProductName, ProductAttributes>,
    pub removed_items: BTreeMap<ProductName, ProductAttributes>,
    pub updated_items: BTreeMap<ProductName, UpdatedProduct>,
}

impl RunDiff {
    pub fn new_count(&self) -> usize {
        self.new_items.len()
    }

    pub fn removed_count(&self) -> usize {
        self.removed_items.len()
    }

    pub fn updated_count(&self) -> usize {
        self.updated_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.new_items.is_empty() && self.removed_items.is_empty() && self.updated_items.is_empty()
    }
}

/// Data required to append a row to the comparison log.
///
/// The item maps are encoded to JSON here and stay opaque text until the
/// reporting side decodes them.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComparison {
    pub ts1: Option<RunId>,
    pub ts2: Option<RunId>,
    pub new_count: i32,
    pub removed_count: i32,
    pub updated_count: i32,
    pub new_items: String,
    pub removed_items: String,
    pub updated_items: String,
    pub log_time: NaiveDateTime,
}

impl NewComparison {
    /// Encodes `diff` for storage. Counts are taken from the maps themselves.
    pub fn from_diff(
        ts1: Option<RunId>,
        ts2: Option<RunId>,
        diff: &RunDiff,
        log_time: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            ts1,
            ts2,
            new_count: count(diff.new_count())?,
            removed_count: count(diff.removed_count())?,
            updated_count: count(diff.updated_count())?,
            new_items: encode(&diff.new_items)?,
            removed_items: encode(&diff.removed_items)?,
            updated_items: encode(&diff.updated_items)?,
            log_time,
        })
    }
}

fn count(len: usize) -> Result<i32, TypeConstraintError> {
    i32::try_from(len)
        .map_err(|_| TypeConstraintError::InvalidValue(format!("item count {len} overflows")))
}

fn encode<T: Serialize>(items: &T) -> Result<String, TypeConstraintError> {
    serde_json::to_string(items).map_err(|e| TypeConstraintError::InvalidValue(e.to_string()))
}

/// A comparison log row as stored. Run columns and payloads are kept as raw
/// text until [`StoredComparison::decode`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredComparison {
    pub id: ComparisonId,
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

/// A comparison log row with its payloads decoded.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonRecord {
    pub id: ComparisonId,
    pub ts1: Option<RunId>,
    pub ts2: Option<RunId>,
    pub diff: RunDiff,
    pub log_time: NaiveDateTime,
}

/// A comparison log row whose stored payload cannot be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("comparison log record {id} has corrupt {field}: {message}")]
pub struct CorruptLogRecord {
    pub id: ComparisonId,
    pub field: &'static str,
    pub message: String,
}

impl StoredComparison {
    /// Validates the run columns, decodes the JSON payloads and checks them
    /// against the stored counts.
    ///
    /// An empty payload decodes to an empty mapping.
    pub fn decode(&self) -> Result<ComparisonRecord, CorruptLogRecord> {
        let ts1 = self.decode_run("ts1", self.ts1.as_deref())?;
        let ts2 = self.decode_run("ts2", self.ts2.as_deref())?;

        let diff = RunDiff {
            new_items: self.decode_payload("new_items", &self.new_items)?,
            removed_items: self.decode_payload("removed_items", &self.removed_items)?,
            updated_items: self.decode_payload("updated_items", &self.updated_items)?,
        };

        self.check_count("new_count", self.new_count, diff.new_count())?;
        self.check_count("removed_count", self.removed_count, diff.removed_count())?;
        self.check_count("updated_count", self.updated_count, diff.updated_count())?;

        Ok(ComparisonRecord {
            id: self.id,
            ts1,
            ts2,
            diff,
            log_time: self.log_time,
        })
    }

    fn decode_run(
        &self,
        field: &'static str,
        value: Option<&str>,
    ) -> Result<Option<RunId>, CorruptLogRecord> {
        value
            .map(RunId::new)
            .transpose()
            .map_err(|e| CorruptLogRecord {
                id: self.id,
                field,
                message: e.to_string(),
            })
    }

    fn decode_payload<T>(&self, field: &'static str, payload: &str) -> Result<T, CorruptLogRecord>
    where
        T: DeserializeOwned + Default,
    {
        if payload.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(payload).map_err(|e| CorruptLogRecord {
            id: self.id,
            field,
            message: e.to_string(),
        })
    }

    fn check_count(
        &self,
        field: &'static str,
        stored: i32,
        decoded: usize,
    ) -> Result<(), CorruptLogRecord> {
        if usize::try_from(stored).ok() == Some(decoded) {
            Ok(())
        } else {
            Err(CorruptLogRecord {
                id: self.id,
                field,
                message: format!("stored count {stored} but payload holds {decoded} items"),
            })
        }
    }
}
