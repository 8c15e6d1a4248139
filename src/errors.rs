//! Error types for facet composition operations

use thiserror::Error;

use crate::definition::{BaseKind, FacetName};

/// Errors that can occur while wiring facets onto base entity types
///
/// All of these are programming or configuration errors surfaced during the
/// sequential startup wiring phase; none of them occur on the read paths
/// (resolution, attribute assembly), which only forward storage errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FacetError {
    /// A definition with this name is already registered
    #[error("Facet already registered: {0}")]
    DuplicateFacet(FacetName),

    /// No definition with this name is registered
    #[error("Unknown facet: {0}")]
    UnknownFacet(FacetName),

    /// The base entity type never declared support for this kind
    #[error("Base type {type_name} does not declare support for kind {kind}")]
    UnsupportedBaseKind { type_name: String, kind: BaseKind },

    /// The definition has no configuration for the kind being bound
    #[error("Facet {facet} has no configuration for kind {kind}")]
    MissingConfiguration { facet: FacetName, kind: BaseKind },
}

/// Result type for facet composition operations
pub type FacetResult<T> = Result<T, FacetError>;
