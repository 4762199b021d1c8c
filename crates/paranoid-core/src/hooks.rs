//! Lifecycle hook registry.
//!
//! Hooks are registered per entity type and per lifecycle event, and
//! invoked in registration order. The first hook to return an error
//! aborts the sequence, which rolls back the enclosing transaction.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::Error;
use crate::record::ParanoidRecord;

/// A lifecycle event a hook can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    /// Before a destroy (soft or hard) mutates anything.
    BeforeDestroy,
    /// After a destroy has applied its mutations.
    AfterDestroy,
    /// Before a recovery mutates anything.
    BeforeRecover,
    /// After a recovery has applied its mutations.
    AfterRecover,
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookEvent::BeforeDestroy => "before-destroy",
            HookEvent::AfterDestroy => "after-destroy",
            HookEvent::BeforeRecover => "before-recover",
            HookEvent::AfterRecover => "after-recover",
        };
        f.write_str(name)
    }
}

/// A registered hook. Returning `Err(reason)` vetoes the operation.
pub type Hook = dyn Fn(&ParanoidRecord) -> Result<(), String> + Send + Sync;

/// Registry of lifecycle hooks keyed by (entity type, event).
#[derive(Default)]
pub struct HookRegistry {
    hooks: DashMap<(String, HookEvent), Vec<Arc<Hook>>>,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook for an entity type and event.
    pub fn register<F>(&self, entity: impl Into<String>, event: HookEvent, hook: F)
    where
        F: Fn(&ParanoidRecord) -> Result<(), String> + Send + Sync + 'static,
    {
        self.hooks
            .entry((entity.into(), event))
            .or_default()
            .push(Arc::new(hook));
    }

    /// Run all hooks for an event against a record, in registration order.
    pub fn run(&self, event: HookEvent, record: &ParanoidRecord) -> Result<(), Error> {
        let key = (record.entity().to_string(), event);
        if let Some(hooks) = self.hooks.get(&key) {
            for hook in hooks.iter() {
                if let Err(reason) = hook(record) {
                    return Err(Error::HookVeto { event, reason });
                }
            }
        }
        Ok(())
    }
}
