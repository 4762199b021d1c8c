//! Per-record lifecycle operations.
//!
//! Each top-level operation runs inside one store transaction: hooks,
//! cascaded dependents and the record's own mutation commit or roll
//! back together. A hook veto is an expected failure and is reported
//! as [`Outcome::Aborted`] rather than an error; storage failures
//! surface to the caller as [`Error`].

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::catalog::{Catalog, ParanoidConfig};
use crate::cascade;
use crate::counter;
use crate::error::Error;
use crate::hooks::{HookEvent, HookRegistry};
use crate::predicate;
use crate::record::ParanoidRecord;
use crate::store::{Store, StoreTransaction};
use crate::time;

/// Result of a lifecycle operation that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The deletion marker was applied; the row remains recoverable.
    SoftDeleted,
    /// The row was permanently removed and the record frozen.
    HardDeleted,
    /// The deletion marker was cleared.
    Recovered,
    /// Recovery requested on a record that was not deleted.
    AlreadyActive,
    /// A hook vetoed the operation; the transaction rolled back and the
    /// record was left unchanged.
    Aborted {
        /// The event whose hook vetoed.
        event: HookEvent,
        /// The reason the hook gave.
        reason: String,
    },
}

/// Caller overrides for [`Lifecycle::recover`].
///
/// Unset options fall back to the entity type's configuration.
#[derive(Debug, Clone, Default)]
pub struct RecoverOptions {
    /// Whether to cascade recovery to dependents.
    pub recursive: Option<bool>,
    /// Bound for time-windowed dependent recovery.
    pub recovery_window: Option<Duration>,
}

impl RecoverOptions {
    /// Options deferring everything to the configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override whether recovery cascades to dependents.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = Some(recursive);
        self
    }

    /// Override the recovery window.
    pub fn recovery_window(mut self, window: Duration) -> Self {
        self.recovery_window = Some(window);
        self
    }

    fn resolve(&self, config: &ParanoidConfig) -> ResolvedRecover {
        ResolvedRecover {
            recursive: self.recursive.unwrap_or(config.recursive),
            window: self.recovery_window.unwrap_or(config.recovery_window),
        }
    }
}

/// Recovery options with configuration defaults applied, passed through
/// the cascade unchanged.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedRecover {
    pub(crate) recursive: bool,
    pub(crate) window: Duration,
}

/// The soft-delete lifecycle engine for one catalog and store.
pub struct Lifecycle {
    catalog: Arc<Catalog>,
    hooks: Arc<HookRegistry>,
    store: Arc<dyn Store>,
}

impl Lifecycle {
    /// Create an engine over a catalog, hook registry and store.
    pub fn new(catalog: Arc<Catalog>, hooks: Arc<HookRegistry>, store: Arc<dyn Store>) -> Self {
        Self {
            catalog,
            hooks,
            store,
        }
    }

    /// The entity catalog this engine operates on.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The hook registry.
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// The persistence backend.
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Whether a record is deleted per its entity type's configuration.
    pub fn is_deleted(&self, record: &ParanoidRecord) -> Result<bool, Error> {
        let config = self.catalog.config_for(record.entity())?;
        Ok(predicate::is_deleted(config, &record.paranoid_value(config)))
    }

    /// True unless the record is new or has been hard-destroyed.
    pub fn is_persisted(&self, record: &ParanoidRecord) -> bool {
        record.is_persisted()
    }

    /// Soft-destroy a record: apply the deletion marker, cascading
    /// destroy to dependents first.
    ///
    /// Destroying a record that is already deleted escalates to
    /// [`Lifecycle::destroy_fully`], so calling destroy twice removes
    /// the row permanently on the second call.
    pub fn destroy(&self, record: &mut ParanoidRecord) -> Result<Outcome, Error> {
        if self.is_deleted(record)? {
            debug!(
                entity = record.entity(),
                "destroy on a deleted record escalates to permanent removal"
            );
            return self.destroy_fully(record);
        }
        self.run_destroy(record, false)
    }

    /// Permanently remove a record's row, cascading destroy to
    /// dependents first. Freezes the record on success.
    pub fn destroy_fully(&self, record: &mut ParanoidRecord) -> Result<Outcome, Error> {
        self.run_destroy(record, true)
    }

    fn run_destroy(&self, record: &mut ParanoidRecord, hard: bool) -> Result<Outcome, Error> {
        let snapshot = record.clone();
        let result = self
            .store
            .with_transaction(&mut |tx| self.destroy_in_tx(tx, record, hard));

        match result {
            Ok(()) => {
                if hard {
                    record.freeze();
                    Ok(Outcome::HardDeleted)
                } else {
                    Ok(Outcome::SoftDeleted)
                }
            }
            Err(Error::HookVeto { event, reason }) => {
                *record = snapshot;
                Ok(Outcome::Aborted { event, reason })
            }
            Err(e) => {
                *record = snapshot;
                Err(e)
            }
        }
    }

    /// Destroy within an already-open transaction. Cascaded dependents
    /// re-enter here with `hard = true`.
    pub(crate) fn destroy_in_tx(
        &self,
        tx: &mut dyn StoreTransaction,
        record: &mut ParanoidRecord,
        hard: bool,
    ) -> Result<(), Error> {
        self.hooks.run(HookEvent::BeforeDestroy, record)?;
        cascade::destroy_dependents(self, tx, record)?;

        let config = self.catalog.config_for(record.entity())?;
        let marker = config.delete_now_value(time::now_micros());

        let mut affected = 0;
        if record.is_persisted() {
            let entity = self.catalog.entity(record.entity())?;
            let filters = record.pk_filters(entity)?;
            affected = if hard {
                tx.delete_where(record.entity(), &filters)?
            } else {
                tx.update_where(
                    record.entity(),
                    &filters,
                    &[(config.column.clone(), marker.clone())],
                )?
            };
        }

        counter::decrement_counters(tx, &self.catalog, record, affected)?;
        if !hard {
            record.set_field(&config.column, marker)?;
        }
        self.hooks.run(HookEvent::AfterDestroy, record)?;
        Ok(())
    }

    /// Recover a soft-deleted record: clear the deletion marker,
    /// cascading recovery to dependents first when resolved recursive.
    ///
    /// Recovering a record that is not deleted is a no-op reported as
    /// [`Outcome::AlreadyActive`].
    pub fn recover(
        &self,
        record: &mut ParanoidRecord,
        options: RecoverOptions,
    ) -> Result<Outcome, Error> {
        if !self.is_deleted(record)? {
            return Ok(Outcome::AlreadyActive);
        }
        let resolved = options.resolve(self.catalog.config_for(record.entity())?);

        let snapshot = record.clone();
        let result = self
            .store
            .with_transaction(&mut |tx| self.recover_in_tx(tx, record, resolved));

        match result {
            Ok(()) => Ok(Outcome::Recovered),
            Err(Error::HookVeto { event, reason }) => {
                *record = snapshot;
                Ok(Outcome::Aborted { event, reason })
            }
            Err(e) => {
                *record = snapshot;
                Err(e)
            }
        }
    }

    /// Recover within an already-open transaction.
    ///
    /// The cascade runs before the parent's marker is cleared, so the
    /// window filter can still read the parent's deletion timestamp.
    pub(crate) fn recover_in_tx(
        &self,
        tx: &mut dyn StoreTransaction,
        record: &mut ParanoidRecord,
        resolved: ResolvedRecover,
    ) -> Result<(), Error> {
        self.hooks.run(HookEvent::BeforeRecover, record)?;
        if resolved.recursive {
            cascade::recover_dependents(self, tx, record, resolved)?;
        }

        let config = self.catalog.config_for(record.entity())?;
        let active = config.active_value();
        if record.is_persisted() {
            let entity = self.catalog.entity(record.entity())?;
            let filters = record.pk_filters(entity)?;
            tx.update_where(
                record.entity(),
                &filters,
                &[(config.column.clone(), active.clone())],
            )?;
        }
        record.set_field(&config.column, active)?;
        self.hooks.run(HookEvent::AfterRecover, record)?;
        Ok(())
    }
}
