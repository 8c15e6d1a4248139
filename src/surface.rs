// Copyright (c) 2025 - Cowboy AI, Inc.
//! Facet-Bearing Entity Surface
//!
//! Read-model views over one base entity: which facet instances it carries,
//! paired with their definitions, and the combined attribute dictionary -
//! the entity's own attributes plus one typed sub-mapping per attached
//! facet. The sub-mappings are keyed by [`FacetName`] rather than by
//! string-composed `"<facet>_attributes"` keys; the merge semantics are the
//! same either way.
//!
//! All fetches of facet instances go through [`EntitySurface::facet_instance`],
//! which applies the binder's storage-readiness guard: during a
//! schema-evolution window an unprovisioned target model yields `None` plus
//! a diagnostic instead of an error. Outside that window, storage failures
//! propagate unchanged.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

use crate::attributes::{AttributeValue, Attributes};
use crate::definition::{BaseKind, FacetDefinition, FacetName};
use crate::instance::FacetInstance;
use crate::registry::FacetRegistry;
use crate::storage::FacetBacking;

/// Combined attribute read-model for one entity
///
/// This is a convenience view for callers, not the persistence format.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EntityAttributes {
    /// The entity's own (non-facet) attributes
    pub own: Attributes,

    /// One sub-mapping per attached facet, volatile bookkeeping fields
    /// stripped
    pub facets: BTreeMap<FacetName, Attributes>,
}

/// Entity-level facet operations for one base-entity kind
///
/// Obtained from [`FacetRegistry::surface`]; borrows the registry, so it is
/// as shareable as the registry itself.
pub struct EntitySurface<'a> {
    registry: &'a FacetRegistry,
    kind: BaseKind,
}

impl<'a> EntitySurface<'a> {
    pub(crate) fn new(registry: &'a FacetRegistry, kind: BaseKind) -> Self {
        Self { registry, kind }
    }

    /// The kind this surface serves
    pub fn kind(&self) -> BaseKind {
        self.kind
    }

    /// Fetch an entity's facet instance, honoring the storage-readiness
    /// guard
    ///
    /// Returns `Ok(None)` when the definition does not configure this kind,
    /// when the entity has no instance, or when the target model's storage
    /// is not yet provisioned (with a warning). Genuine storage errors
    /// propagate unchanged.
    pub fn facet_instance<B: FacetBacking>(
        &self,
        backing: &B,
        entity: &B::Entity,
        definition: &FacetDefinition,
    ) -> Result<Option<FacetInstance>, B::Error> {
        let Some(config) = definition.configuration(self.kind) else {
            return Ok(None);
        };

        if !backing.is_storage_ready(&config.target_model) {
            warn!(
                facet = %definition.name(),
                target_model = %config.target_model,
                "storage for facet not provisioned yet, skipping the facet data"
            );
            return Ok(None);
        }

        backing.facet_for(entity, definition)
    }

    /// All facet instances currently attached to the entity
    ///
    /// One per bound definition with a non-absent instance, in registration
    /// order.
    pub fn facets<B: FacetBacking>(
        &self,
        backing: &B,
        entity: &B::Entity,
    ) -> Result<Vec<FacetInstance>, B::Error> {
        Ok(self
            .facets_with_definitions(backing, entity)?
            .into_iter()
            .map(|(instance, _)| instance)
            .collect())
    }

    /// Attached facet instances paired with the definitions that produced
    /// them
    ///
    /// Definitions without an instance for this entity are excluded, never
    /// represented as empty pairs.
    pub fn facets_with_definitions<B: FacetBacking>(
        &self,
        backing: &B,
        entity: &B::Entity,
    ) -> Result<Vec<(FacetInstance, Arc<FacetDefinition>)>, B::Error> {
        let mut pairs = Vec::new();
        for definition in self.registry.definitions_for(self.kind) {
            if let Some(instance) = self.facet_instance(backing, entity, definition)? {
                pairs.push((instance, Arc::clone(definition)));
            }
        }
        Ok(pairs)
    }

    /// The combined attribute dictionary for the entity
    ///
    /// The entity's own attributes plus, for every attached facet, that
    /// facet's attributes with the volatile bookkeeping fields
    /// (`created_at`, `updated_at`) stripped.
    pub fn attributes<B: FacetBacking>(
        &self,
        backing: &B,
        entity: &B::Entity,
    ) -> Result<EntityAttributes, B::Error> {
        let own = backing.own_attributes(entity)?;
        let mut facets = BTreeMap::new();
        for (instance, definition) in self.facets_with_definitions(backing, entity)? {
            facets.insert(
                definition.name().clone(),
                instance.attributes.without_volatile(),
            );
        }
        Ok(EntityAttributes { own, facets })
    }

    /// Invoke a compatibility-property forwarder against the entity's facet
    ///
    /// Looks up the binding for `facet`, fetches the entity's instance
    /// through the readiness guard, and delegates to the forwarding function
    /// installed at bind time. Returns `Ok(None)` when no instance is
    /// attached or the property was never declared.
    pub fn forward_property<B: FacetBacking>(
        &self,
        backing: &B,
        entity: &B::Entity,
        facet: &FacetName,
        property: &str,
    ) -> Result<Option<AttributeValue>, B::Error> {
        let Some(binding) = self.registry.binding(self.kind, facet) else {
            return Ok(None);
        };
        let Ok(definition) = self.registry.lookup(facet) else {
            return Ok(None);
        };
        let instance = self.facet_instance(backing, entity, definition)?;
        Ok(binding.forward(property, instance.as_ref()))
    }
}
