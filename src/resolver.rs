// Copyright (c) 2025 - Cowboy AI, Inc.
//! Ancestry-Aware Attribute Resolver
//!
//! Computes the effective inheritable-attribute set of a facet for a node in
//! the hostgroup tree. The walk order is the whole algorithm:
//!
//! ```text
//! result = own facet's inheritable attributes        (highest precedence)
//! for ancestor in nearest-first order:               (parent .. root)
//!     fill keys that are absent or blank in result
//! ```
//!
//! An existing non-blank value always wins, so precedence runs from the node
//! itself through progressively farther ancestors, the root contributing
//! last. Blank values (nil, false, empty string) are placeholders: they are
//! filled by the next source consulted and stay blank only when no ancestor
//! supplies a value. Ancestors lacking the facet are skipped entirely, never
//! treated as contributing "all blank".
//!
//! The ancestry chain is fetched once per resolution and treated as a
//! consistent snapshot. [`apply_facet_attributes`] reuses one chain across
//! every registered facet when seeding a new host from a hostgroup.

use tracing::debug;

use crate::definition::{BaseKind, FacetDefinition};
use crate::registry::FacetRegistry;
use crate::storage::{AncestryBacking, FacetBacking};
use crate::surface::EntityAttributes;
use crate::attributes::Attributes;

/// Effective inheritable attributes of `definition` for the hostgroup `node`
///
/// Resolves to an empty mapping when the definition has no hostgroup
/// configuration or declares no inheritable attribute names. Storage errors
/// from the backing propagate unchanged.
pub fn inherited_attributes<B: AncestryBacking>(
    backing: &B,
    definition: &FacetDefinition,
    node: &B::Entity,
) -> Result<Attributes, B::Error> {
    let chain = backing.ancestors_of(node)?;
    resolve_with_chain(backing, definition, node, &chain)
}

/// Resolve against an already-fetched root-first ancestry chain
pub(crate) fn resolve_with_chain<B: FacetBacking>(
    backing: &B,
    definition: &FacetDefinition,
    node: &B::Entity,
    ancestors_root_first: &[B::Entity],
) -> Result<Attributes, B::Error> {
    let Some(config) = definition.configuration(BaseKind::Hostgroup) else {
        return Ok(Attributes::new());
    };
    if config.inheritable_attribute_names.is_empty() {
        return Ok(Attributes::new());
    }

    let mut result = match backing.facet_for(node, definition)? {
        Some(facet) => facet.inherited_attributes(config),
        None => Attributes::new(),
    };

    // Nearest ancestor first: the stored chain is root-first, so walk it
    // reversed. Reversing this loop flips inheritance precedence.
    for ancestor in ancestors_root_first.iter().rev() {
        let Some(facet) = backing.facet_for(ancestor, definition)? else {
            continue;
        };
        result.merge_fallback(facet.inherited_attributes(config));
    }

    Ok(result)
}

/// Seed a new entity's attributes with inherited facet configuration
///
/// For every registered definition with a host-kind configuration: merge the
/// hostgroup's resolved inherited attributes underneath whatever the caller
/// already supplied for that facet (supplied non-blank values win), writing
/// the result back only when non-empty. A newly created host thus starts
/// with its hostgroup's configuration unless it explicitly overrides fields
/// itself.
///
/// The hostgroup's ancestry chain is fetched once and shared across all
/// definitions.
pub fn apply_facet_attributes<B: AncestryBacking>(
    registry: &FacetRegistry,
    backing: &B,
    hostgroup: &B::Entity,
    attributes: &mut EntityAttributes,
) -> Result<(), B::Error> {
    let chain = backing.ancestors_of(hostgroup)?;

    for definition in registry.definitions_for(BaseKind::Host) {
        let mut merged = attributes
            .facets
            .remove(definition.name())
            .unwrap_or_default();
        merged.merge_fallback(resolve_with_chain(
            backing,
            definition,
            hostgroup,
            &chain,
        )?);

        if merged.is_empty() {
            continue;
        }
        debug!(
            facet = %definition.name(),
            attributes = merged.len(),
            "applied inherited facet attributes"
        );
        attributes.facets.insert(definition.name().clone(), merged);
    }

    Ok(())
}
