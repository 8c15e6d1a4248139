// Copyright (c) 2025 - Cowboy AI, Inc.
//! Shared test fixtures: an in-memory storage backing over a hostgroup tree

// Each test binary uses a different slice of the fixture surface.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use host_facets::{
    AncestryBacking, Attributes, FacetBacking, FacetDefinition, FacetInstance,
};
use thiserror::Error;
use uuid::Uuid;

/// Failure type of the in-memory backing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("entity not found: {0}")]
    NotFound(Uuid),
}

/// In-memory entities, ancestry links, and facet instances
///
/// Nodes are plain `Uuid`s. Ancestry is a parent link per node; facet
/// instances are keyed by `(node, facet name)`.
#[derive(Debug, Default)]
pub struct InMemoryBacking {
    nodes: HashSet<Uuid>,
    parents: HashMap<Uuid, Uuid>,
    own: HashMap<Uuid, Attributes>,
    facets: HashMap<(Uuid, String), FacetInstance>,
    unprovisioned: HashSet<String>,
}

impl InMemoryBacking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node, optionally linked under a parent
    pub fn add_node(&mut self, parent: Option<Uuid>) -> Uuid {
        let id = Uuid::now_v7();
        self.nodes.insert(id);
        if let Some(parent) = parent {
            self.parents.insert(id, parent);
        }
        id
    }

    /// Set a node's own (non-facet) attributes
    pub fn set_own_attributes(&mut self, node: Uuid, attributes: Attributes) {
        self.own.insert(node, attributes);
    }

    /// Attach a facet instance with the given attributes to a node
    pub fn attach_facet(&mut self, node: Uuid, facet: &str, attributes: Attributes) {
        self.facets.insert(
            (node, facet.to_string()),
            FacetInstance::with_attributes(node, attributes),
        );
    }

    /// Mark a target model's storage as not yet provisioned
    pub fn mark_unprovisioned(&mut self, target_model: &str) {
        self.unprovisioned.insert(target_model.to_string());
    }
}

impl FacetBacking for InMemoryBacking {
    type Entity = Uuid;
    type Error = StoreError;

    fn facet_for(
        &self,
        entity: &Uuid,
        definition: &FacetDefinition,
    ) -> Result<Option<FacetInstance>, StoreError> {
        if !self.nodes.contains(entity) {
            return Err(StoreError::NotFound(*entity));
        }
        Ok(self
            .facets
            .get(&(*entity, definition.name().as_str().to_string()))
            .cloned())
    }

    fn own_attributes(&self, entity: &Uuid) -> Result<Attributes, StoreError> {
        if !self.nodes.contains(entity) {
            return Err(StoreError::NotFound(*entity));
        }
        Ok(self.own.get(entity).cloned().unwrap_or_default())
    }

    fn is_storage_ready(&self, target_model: &str) -> bool {
        !self.unprovisioned.contains(target_model)
    }
}

impl AncestryBacking for InMemoryBacking {
    fn ancestors_of(&self, entity: &Uuid) -> Result<Vec<Uuid>, StoreError> {
        if !self.nodes.contains(entity) {
            return Err(StoreError::NotFound(*entity));
        }
        let mut chain = Vec::new();
        let mut current = *entity;
        while let Some(&parent) = self.parents.get(&current) {
            chain.push(parent);
            current = parent;
        }
        chain.reverse(); // root-first
        Ok(chain)
    }
}
