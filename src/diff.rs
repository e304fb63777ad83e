//! Run comparison engine.
//!
//! [`compare`] classifies two snapshots into new, removed and updated
//! products. It performs no I/O and is total over any pair of snapshots,
//! including identical ones.

use crate::domain::comparison::{FieldChange, RunDiff, UpdatedProduct};
use crate::domain::product::{ProductAttributes, Snapshot};

/// Compares the earlier snapshot `run1` against the later snapshot `run2`.
///
/// - `new_items`: names only in `run2`, with `run2`'s attributes.
/// - `removed_items`: names only in `run1`, with `run1`'s attributes.
/// - `updated_items`: names in both whose availability or price differs.
///   Changed fields carry an old/new pair, unchanged ones the plain value.
///   The link comes from `run2`; a link change alone is not an update.
pub fn compare(run1: &Snapshot, run2: &Snapshot) -> RunDiff {
    let mut diff = RunDiff::default();

    for (name, later) in run2 {
        match run1.get(name) {
            None => {
                diff.new_items.insert(name.clone(), later.clone());
            }
            Some(earlier) => {
                if let Some(updated) = updated_product(earlier, later) {
                    diff.updated_items.insert(name.clone(), updated);
                }
            }
        }
    }

    for (name, earlier) in run1 {
        if !run2.contains(name) {
            diff.removed_items.insert(name.clone(), earlier.clone());
        }
    }

    diff
}

fn updated_product(earlier: &ProductAttributes, later: &ProductAttributes) -> Option<UpdatedProduct> {
    let availability_same = earlier.availability.same_as(&later.availability);
    let price_same = earlier.price.same_as(&later.price);

    if availability_same && price_same {
        return None;
    }

    Some(UpdatedProduct {
        availability: field_change(availability_same, &earlier.availability, &later.availability),
        price: field_change(price_same, &earlier.price, &later.price),
        link: later.link.clone(),
    })
}

fn field_change<T: Clone>(same: bool, old: &T, new: &T) -> FieldChange<T> {
    if same {
        FieldChange::Unchanged(new.clone())
    } else {
        FieldChange::Changed {
            old: old.clone(),
            new: new.clone(),
        }
    }
}
