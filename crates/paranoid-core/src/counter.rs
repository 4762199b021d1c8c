//! Counter-cache maintenance for belongs-to associations.

use paranoid_expr::FilterExpr;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::Error;
use crate::record::ParanoidRecord;
use crate::store::StoreTransaction;

/// Decrement counter caches on the targets of the record's belongs-to
/// associations after a destroy made `affected` rows invisible.
///
/// The association that triggered the current destroy is skipped: its
/// counter already accounts for the parent losing the whole collection,
/// and decrementing again would double-count.
pub(crate) fn decrement_counters(
    tx: &mut dyn StoreTransaction,
    catalog: &Catalog,
    record: &ParanoidRecord,
    affected: u64,
) -> Result<(), Error> {
    if affected == 0 {
        return Ok(());
    }

    for assoc in catalog.belongs_to_of(record.entity()) {
        let Some(counter_column) = &assoc.counter_cache else {
            continue;
        };
        if record.destroyed_by() == Some(assoc.foreign_key.as_str()) {
            continue;
        }
        let Some(owner_key) = record.field(&assoc.foreign_key) else {
            continue;
        };
        if owner_key.is_null() {
            continue;
        }

        let target = catalog.entity(&assoc.target)?;
        let Some(pk_field) = target.primary_key.first() else {
            continue;
        };
        let filters = [FilterExpr::Eq {
            field: pk_field.clone(),
            value: owner_key.clone(),
        }];

        let delta = -(affected as i64);
        let adjusted = tx.adjust_counter(&assoc.target, &filters, counter_column, delta)?;
        debug!(
            association = %assoc.name,
            target = %assoc.target,
            column = %counter_column,
            delta,
            rows = adjusted,
            "decremented counter cache"
        );
    }
    Ok(())
}
