//! Cascading destroy and recover across dependent relationships.
//!
//! Runs inside the caller's transaction. Only relationships registered
//! in the catalog participate, and only when the resolved target type
//! is itself soft-delete aware. Dependent cascade-destroy is always the
//! permanent form: the parent may be soft-deleted, but its dependents'
//! rows are removed outright.

use paranoid_expr::{FilterExpr, SimpleFilter, Value};
use tracing::debug;

use crate::catalog::{CascadePolicy, ColumnType, DependencyDef};
use crate::error::Error;
use crate::lifecycle::{Lifecycle, ResolvedRecover};
use crate::record::ParanoidRecord;
use crate::scope::deleted_filter;
use crate::store::StoreTransaction;

/// Equality predicates tying a dependency's rows to one source record.
///
/// One predicate per join column pair; a composite-key association
/// contributes several.
pub(crate) fn association_filters(
    dep: &DependencyDef,
    record: &ParanoidRecord,
) -> Result<Vec<FilterExpr>, Error> {
    dep.join
        .iter()
        .map(|(dependent_field, owner_field)| {
            let value = record.field(owner_field).cloned().ok_or_else(|| {
                Error::MissingField {
                    entity: record.entity().to_string(),
                    field: owner_field.clone(),
                }
            })?;
            Ok(FilterExpr::Eq {
                field: dependent_field.clone(),
                value,
            })
        })
        .collect()
}

/// Destroy every dependent of `record`, recursively.
///
/// No visibility filter is applied: dependents not yet deleted must be
/// destroyed along with already-deleted ones.
pub(crate) fn destroy_dependents(
    lifecycle: &Lifecycle,
    tx: &mut dyn StoreTransaction,
    record: &ParanoidRecord,
) -> Result<(), Error> {
    for dep in lifecycle.catalog().dependents_of(record.entity()) {
        let target = lifecycle.catalog().resolve_target(dep, record)?;
        if !lifecycle.catalog().is_paranoid(&target) {
            continue;
        }
        let filters = association_filters(dep, record)?;

        match dep.cascade {
            CascadePolicy::DeleteAll => {
                let removed = tx.delete_where(&target, &filters)?;
                debug!(
                    relation = %dep.name,
                    target = %target,
                    rows = removed,
                    "bulk-removed dependents"
                );
            }
            CascadePolicy::Destroy => {
                let triggered_by = dep.join.first().map(|(dependent_field, _)| dependent_field);
                for row in tx.select(&target, &filters)? {
                    let mut dependent = ParanoidRecord::from_row(target.clone(), row);
                    if let Some(fk) = triggered_by {
                        dependent = dependent.with_destroyed_by(fk.clone());
                    }
                    lifecycle.destroy_in_tx(tx, &mut dependent, true)?;
                }
            }
        }
    }
    Ok(())
}

/// Recover the deleted dependents of `record`, recursively, passing the
/// resolved options through unchanged.
///
/// When both sides carry a time-typed column, only dependents whose
/// deletion timestamp falls within the window of the parent's own
/// deletion timestamp are recovered; the rest stay deleted. Any other
/// column pairing recovers without a window restriction.
pub(crate) fn recover_dependents(
    lifecycle: &Lifecycle,
    tx: &mut dyn StoreTransaction,
    record: &ParanoidRecord,
    resolved: ResolvedRecover,
) -> Result<(), Error> {
    let parent_config = lifecycle.catalog().config_for(record.entity())?;

    for dep in lifecycle.catalog().dependents_of(record.entity()) {
        if dep.cascade != CascadePolicy::Destroy {
            // Bulk-removed dependents have no rows left to recover.
            continue;
        }
        let target = lifecycle.catalog().resolve_target(dep, record)?;
        if !lifecycle.catalog().is_paranoid(&target) {
            continue;
        }
        let target_config = lifecycle.catalog().config_for(&target)?;

        let mut filters = vec![deleted_filter(target_config)];
        filters.extend(association_filters(dep, record)?);

        if parent_config.column_type == ColumnType::Time
            && target_config.column_type == ColumnType::Time
        {
            if let Some(parent_ts) = record.paranoid_value(parent_config).as_timestamp() {
                let window = resolved.window.as_micros() as i64;
                filters.push(FilterExpr::and(vec![
                    SimpleFilter::ge(
                        target_config.column.as_str(),
                        Value::Timestamp(parent_ts - window),
                    ),
                    SimpleFilter::le(
                        target_config.column.as_str(),
                        Value::Timestamp(parent_ts + window),
                    ),
                ]));
            }
        }

        let rows = tx.select(&target, &filters)?;
        debug!(
            relation = %dep.name,
            target = %target,
            rows = rows.len(),
            "recovering dependents"
        );
        for row in rows {
            let mut dependent = ParanoidRecord::from_row(target.clone(), row);
            lifecycle.recover_in_tx(tx, &mut dependent, resolved)?;
        }
    }
    Ok(())
}
