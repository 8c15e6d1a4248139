//! Facet composition and attribute inheritance for host and hostgroup models
//!
//! This crate lets independently-defined sub-records ("facets") attach
//! themselves to base entity types (hosts, and hostgroups arranged in a
//! tree) without the base types knowing about them in advance, and computes
//! effective facet configuration for tree-structured entities by walking the
//! ancestry chain with fallback-on-blank semantics.
//!
//! # Architecture
//!
//! ```text
//! FacetDefinition ──register──> FacetRegistry ──bind──> AttachmentBinder
//!                                    │                        │
//!                              definitions_for          Binding per
//!                                    │                 (kind, facet)
//!                                    ▼
//!                              EntitySurface ── facets / attributes
//!                                    │
//!                               resolver ── inherited_attributes
//! ```
//!
//! Definitions register into the [`FacetRegistry`] during sequential startup
//! wiring; base entity types opt in through [`FacetHost`] activations, and
//! the binder establishes one [`Binding`] per `(kind, facet)` pair,
//! idempotently, regardless of registration/activation order. After startup
//! the registry is read-only and may be shared behind an `Arc`. Entity and
//! ancestry data live behind the [`FacetBacking`] / [`AncestryBacking`]
//! storage seams.

pub mod attributes;
pub mod binder;
pub mod definition;
pub mod errors;
pub mod instance;
pub mod registry;
pub mod resolver;
pub mod storage;
pub mod surface;

// Re-export commonly used types
pub use attributes::{AttributeValue, Attributes, VOLATILE_FIELDS};
pub use binder::{AttachmentBinder, Binding, FacetHost, Forwarder};
pub use definition::{
    BaseKind, ExtensionBundle, FacetConfig, FacetDefinition, FacetDefinitionBuilder, FacetName,
    FacetNameError,
};
pub use errors::{FacetError, FacetResult};
pub use instance::FacetInstance;
pub use registry::FacetRegistry;
pub use resolver::{apply_facet_attributes, inherited_attributes};
pub use storage::{AncestryBacking, FacetBacking};
pub use surface::{EntityAttributes, EntitySurface};
