//! Relationship declarations between entity types.

use serde::{Deserialize, Serialize};

/// Cascade behavior declared on a dependent relationship.
///
/// Only relationships carrying one of these policies participate in
/// cascaded destroy/recover; undeclared relationships are never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadePolicy {
    /// Destroy dependents through their own lifecycle (hooks included).
    Destroy,
    /// Remove dependent rows in bulk.
    DeleteAll,
}

/// How the target type of a dependency is determined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DependentTarget {
    /// A statically declared target type.
    Fixed(String),
    /// Target type read from a discriminator field on the source record,
    /// resolved against the closed set of registered entities.
    Polymorphic {
        /// Field on the source record holding the target type name.
        discriminator_field: String,
    },
}

/// A dependent relationship declaration.
///
/// Dependents are matched by equality on the join column pairs; several
/// pairs express a composite-key association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyDef {
    /// Relationship name (unique within the owner).
    pub name: String,
    /// Owning (source) entity type.
    pub owner: String,
    /// Target resolution rule.
    pub target: DependentTarget,
    /// Declared cascade policy.
    pub cascade: CascadePolicy,
    /// `(dependent_field, owner_field)` join column pairs.
    pub join: Vec<(String, String)>,
}

impl DependencyDef {
    /// Declare a destroy-on-parent-delete dependency on a fixed target.
    pub fn destroy(
        name: impl Into<String>,
        owner: impl Into<String>,
        target: impl Into<String>,
        dependent_field: impl Into<String>,
        owner_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            target: DependentTarget::Fixed(target.into()),
            cascade: CascadePolicy::Destroy,
            join: vec![(dependent_field.into(), owner_field.into())],
        }
    }

    /// Declare a dependency whose target is read from a discriminator field.
    pub fn polymorphic(
        name: impl Into<String>,
        owner: impl Into<String>,
        discriminator_field: impl Into<String>,
        dependent_field: impl Into<String>,
        owner_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            target: DependentTarget::Polymorphic {
                discriminator_field: discriminator_field.into(),
            },
            cascade: CascadePolicy::Destroy,
            join: vec![(dependent_field.into(), owner_field.into())],
        }
    }

    /// Append a join column pair (composite-key association).
    pub fn with_join(
        mut self,
        dependent_field: impl Into<String>,
        owner_field: impl Into<String>,
    ) -> Self {
        self.join.push((dependent_field.into(), owner_field.into()));
        self
    }

    /// Set the cascade policy.
    pub fn with_cascade(mut self, cascade: CascadePolicy) -> Self {
        self.cascade = cascade;
        self
    }
}

/// A belongs-to declaration, carried for counter-cache maintenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BelongsToDef {
    /// Association name (unique within the owner).
    pub name: String,
    /// Owning (source) entity type.
    pub owner: String,
    /// Target entity type.
    pub target: String,
    /// Foreign key field on the owner referencing the target.
    pub foreign_key: String,
    /// Counter column on the target, when a counter cache is kept.
    pub counter_cache: Option<String>,
}

impl BelongsToDef {
    /// Declare a belongs-to association.
    pub fn new(
        name: impl Into<String>,
        owner: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            target: target.into(),
            foreign_key: foreign_key.into(),
            counter_cache: None,
        }
    }

    /// Keep a counter cache in the given column on the target.
    pub fn with_counter_cache(mut self, column: impl Into<String>) -> Self {
        self.counter_cache = Some(column.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroy_dependency() {
        let dep = DependencyDef::destroy("comments", "Post", "Comment", "post_id", "id");

        assert_eq!(dep.cascade, CascadePolicy::Destroy);
        assert_eq!(dep.target, DependentTarget::Fixed("Comment".into()));
        assert_eq!(dep.join, vec![("post_id".to_string(), "id".to_string())]);
    }

    #[test]
    fn test_polymorphic_dependency() {
        let dep =
            DependencyDef::polymorphic("attachment", "Post", "attachable_type", "owner_id", "id");

        match dep.target {
            DependentTarget::Polymorphic {
                ref discriminator_field,
            } => assert_eq!(discriminator_field, "attachable_type"),
            ref other => panic!("expected polymorphic target, got {other:?}"),
        }
    }

    #[test]
    fn test_composite_join() {
        let dep = DependencyDef::destroy("entries", "Ledger", "Entry", "ledger_id", "id")
            .with_join("tenant_id", "tenant_id");

        assert_eq!(dep.join.len(), 2);
    }

    #[test]
    fn test_belongs_to_counter_cache() {
        let assoc =
            BelongsToDef::new("post", "Comment", "Post", "post_id").with_counter_cache("comments_count");

        assert_eq!(assoc.counter_cache.as_deref(), Some("comments_count"));
    }
}
