// Copyright (c) 2025 - Cowboy AI, Inc.
//! Facet Instance - One Facet Record Attached to One Entity
//!
//! A facet instance is the runtime counterpart of a [`FacetConfig`]'s target
//! model: the record holding one entity's values for one facet. Instances
//! are created, persisted, and fetched by the storage collaborator; the core
//! only reads their attributes during resolution and attribute assembly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attributes::{AttributeValue, Attributes};
use crate::definition::FacetConfig;

/// One facet record owned by exactly one base entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetInstance {
    /// Instance identity
    pub id: Uuid,

    /// Identity of the owning base entity (the value of the configured
    /// foreign-key field)
    pub owner_id: Uuid,

    /// The facet's attribute mapping
    pub attributes: Attributes,

    /// Storage bookkeeping; stripped from attribute read-models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Storage bookkeeping; stripped from attribute read-models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FacetInstance {
    /// Create an empty instance owned by the given entity
    pub fn new(owner_id: Uuid) -> Self {
        Self::with_attributes(owner_id, Attributes::new())
    }

    /// Create an instance with an initial attribute mapping
    pub fn with_attributes(owner_id: Uuid, attributes: Attributes) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            owner_id,
            attributes,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Look up a single attribute
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// The sub-mapping of attributes eligible for ancestry inheritance
    ///
    /// Restricts the attribute mapping to the configuration's declared
    /// inheritable names. Names the instance does not carry contribute
    /// nothing; they are never materialized as blank entries.
    pub fn inherited_attributes(&self, config: &FacetConfig) -> Attributes {
        self.attributes.restrict(&config.inheritable_attribute_names)
    }
}
