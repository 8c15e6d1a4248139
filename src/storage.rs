// Copyright (c) 2025 - Cowboy AI, Inc.
//! Storage Collaborator Seams
//!
//! The composition core owns no persistence. Entities, their ancestry, and
//! their facet instances live behind these traits, implemented by whatever
//! storage backend the application uses. The core calls them during
//! resolution and attribute assembly and forwards their errors unchanged.
//!
//! # Consistency
//!
//! A single resolution fetches the ancestry chain exactly once and treats it
//! as a snapshot. Backings are not required to tolerate concurrent mutation
//! of the ancestry mid-resolution; callers serialize such mutations
//! externally.

use crate::attributes::Attributes;
use crate::definition::FacetDefinition;
use crate::instance::FacetInstance;

/// Read access to entities and their facet instances
///
/// `Entity` is whatever handle the backend uses for a base entity (an id, a
/// loaded row, a test double). `Error` is the backend's own failure type;
/// the core never converts or swallows it.
pub trait FacetBacking {
    /// Handle for one base entity
    type Entity;

    /// Backend failure type, propagated unchanged through the core
    type Error: std::error::Error + Send + Sync;

    /// The entity's facet instance for this definition, if one is attached
    fn facet_for(
        &self,
        entity: &Self::Entity,
        definition: &FacetDefinition,
    ) -> Result<Option<FacetInstance>, Self::Error>;

    /// The entity's own (non-facet) attributes
    fn own_attributes(&self, entity: &Self::Entity) -> Result<Attributes, Self::Error>;

    /// Whether the target model's underlying storage has been provisioned
    ///
    /// Only consulted by the binder's schema-evolution guard. Backends
    /// without a provisioning window keep the default.
    fn is_storage_ready(&self, _target_model: &str) -> bool {
        true
    }
}

/// Read access to the ancestry of tree-structured entities (hostgroups)
pub trait AncestryBacking: FacetBacking {
    /// The entity's ancestor chain, **root-first**: the farthest ancestor at
    /// index 0, the immediate parent last. The entity itself is not
    /// included. Roots return an empty chain.
    ///
    /// The resolver walks this reversed (nearest-first); a reversed chain
    /// silently flips inheritance precedence, so the ordering is part of the
    /// contract.
    fn ancestors_of(&self, entity: &Self::Entity) -> Result<Vec<Self::Entity>, Self::Error>;
}
