// Copyright (c) 2025 - Cowboy AI, Inc.
//! Attachment Binder - Wiring Facet Configurations onto Base Entity Types
//!
//! The binder makes a facet configuration's target model reachable from a
//! base entity type as a first-class relation: one [`Binding`] per
//! `(kind, facet)` pair, recording the relation metadata, the installed
//! capabilities, and one typed forwarding function per declared
//! compatibility property.
//!
//! Nothing here mutates the base entity type itself: every effect of a bind
//! is an explicit record on the binding, and forwarding is explicit
//! delegation - each compatibility property gets a closure bound at bind
//! time to the facet-side attribute accessor.
//!
//! # Idempotency
//!
//! Re-binding the same `(kind, facet)` pair is a no-op. The registry relies
//! on this: it re-runs binds freely when definitions register late or base
//! types activate late, and the observable surface is the same as binding
//! exactly once.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::attributes::AttributeValue;
use crate::definition::{BaseKind, FacetDefinition, FacetName};
use crate::errors::{FacetError, FacetResult};
use crate::instance::FacetInstance;

/// A base entity type's declaration of facet support
///
/// Each base-entity kind has exactly one registration path into the
/// registry, supplying the kind tag and the owning key metadata. Binding a
/// definition against a kind the type never declared is a programming error
/// and fails fast at startup.
pub trait FacetHost: Send + Sync {
    /// The base-entity kind this type registers for
    fn kind(&self) -> BaseKind;

    /// Name of the concrete entity type, for diagnostics
    fn type_name(&self) -> &str;

    /// Name of the field on facet records referencing entities of this type
    fn foreign_key_field(&self) -> &str;

    /// Name used on the facet side for the back-reference to this type
    fn inverse_symbol(&self) -> &str;

    /// Kind-specific follow-up after a definition is bound to this type
    ///
    /// Runs once per newly-established binding, not on idempotent re-binds.
    fn on_bound(&self, _definition: &FacetDefinition) {}
}

/// Typed forwarding function for one compatibility property
///
/// Bound at bind time to the facet-side accessor for the property.
pub type Forwarder = Arc<dyn Fn(&FacetInstance) -> AttributeValue + Send + Sync>;

/// The recorded effect of binding one facet configuration to one base kind
///
/// Holds the one-to-one relation metadata, the capability names contributed
/// by the configuration's extension bundle, and the forwarding table for
/// compatibility properties.
#[derive(Clone)]
pub struct Binding {
    facet: FacetName,
    kind: BaseKind,
    target_model: String,
    foreign_key_field: String,
    inverse_symbol: String,
    capabilities: BTreeSet<String>,
    forwarders: BTreeMap<String, Forwarder>,
}

impl Binding {
    /// The bound facet's name
    pub fn facet(&self) -> &FacetName {
        &self.facet
    }

    /// The base-entity kind this binding targets
    pub fn kind(&self) -> BaseKind {
        self.kind
    }

    /// Identifier of the related facet record type
    pub fn target_model(&self) -> &str {
        &self.target_model
    }

    /// Facet-side field keying the one-to-one relation
    pub fn foreign_key_field(&self) -> &str {
        &self.foreign_key_field
    }

    /// Facet-side back-reference name
    pub fn inverse_symbol(&self) -> &str {
        &self.inverse_symbol
    }

    /// Whether the configuration's extension bundle contributed this
    /// capability
    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.contains(name)
    }

    /// Capability names installed by the extension bundle
    pub fn capabilities(&self) -> impl Iterator<Item = &str> {
        self.capabilities.iter().map(String::as_str)
    }

    /// Whether a forwarding function is installed for this property
    pub fn forwards(&self, property: &str) -> bool {
        self.forwarders.contains_key(property)
    }

    /// Invoke the forwarding function for a compatibility property
    ///
    /// Returns `None` when no facet instance is attached (legacy callers
    /// expect nil, not an error) or when the property was never declared.
    pub fn forward(
        &self,
        property: &str,
        instance: Option<&FacetInstance>,
    ) -> Option<AttributeValue> {
        let forwarder = self.forwarders.get(property)?;
        instance.map(|instance| forwarder(instance))
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("facet", &self.facet)
            .field("kind", &self.kind)
            .field("target_model", &self.target_model)
            .field("foreign_key_field", &self.foreign_key_field)
            .field("inverse_symbol", &self.inverse_symbol)
            .field("capabilities", &self.capabilities)
            .field(
                "forwarders",
                &self.forwarders.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Catalog of established bindings, one per `(kind, facet)` pair
#[derive(Debug, Clone, Default)]
pub struct AttachmentBinder {
    bindings: BTreeMap<(BaseKind, FacetName), Binding>,
}

impl AttachmentBinder {
    /// Create an empty binder
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire a definition's configuration for `kind` onto a base entity type
    ///
    /// Fails fast with [`FacetError::UnsupportedBaseKind`] when the type
    /// never declared `kind`, and with [`FacetError::MissingConfiguration`]
    /// when the definition does not configure `kind`. Re-binding an already
    /// established pair is a no-op.
    pub fn bind(
        &mut self,
        base_type: &dyn FacetHost,
        kind: BaseKind,
        definition: &FacetDefinition,
    ) -> FacetResult<()> {
        if base_type.kind() != kind {
            return Err(FacetError::UnsupportedBaseKind {
                type_name: base_type.type_name().to_string(),
                kind,
            });
        }

        let config =
            definition
                .configuration(kind)
                .ok_or_else(|| FacetError::MissingConfiguration {
                    facet: definition.name().clone(),
                    kind,
                })?;

        let key = (kind, definition.name().clone());
        if self.bindings.contains_key(&key) {
            debug!(facet = %definition.name(), %kind, "facet already bound, skipping");
            return Ok(());
        }

        let mut forwarders: BTreeMap<String, Forwarder> = BTreeMap::new();
        for property in &config.compatibility_properties {
            let accessor = property.clone();
            forwarders.insert(
                property.clone(),
                Arc::new(move |instance: &FacetInstance| {
                    instance
                        .attribute(&accessor)
                        .cloned()
                        .unwrap_or(AttributeValue::Nil)
                }),
            );
        }

        let capabilities = config
            .extension
            .as_ref()
            .map(|extension| extension.capabilities().into_iter().collect())
            .unwrap_or_default();

        self.bindings.insert(
            key,
            Binding {
                facet: definition.name().clone(),
                kind,
                target_model: config.target_model.clone(),
                foreign_key_field: config.foreign_key_field.clone(),
                inverse_symbol: config.inverse_symbol.clone(),
                capabilities,
                forwarders,
            },
        );

        debug!(
            facet = %definition.name(),
            %kind,
            base_type = base_type.type_name(),
            target_model = %config.target_model,
            "bound facet relation"
        );

        base_type.on_bound(definition);
        Ok(())
    }

    /// The binding for a `(kind, facet)` pair, if established
    pub fn binding(&self, kind: BaseKind, facet: &FacetName) -> Option<&Binding> {
        self.bindings.get(&(kind, facet.clone()))
    }

    /// Whether a `(kind, facet)` pair has been bound
    pub fn is_bound(&self, kind: BaseKind, facet: &FacetName) -> bool {
        self.bindings.contains_key(&(kind, facet.clone()))
    }

    /// All bindings established for a base-entity kind
    pub fn bindings_for(&self, kind: BaseKind) -> impl Iterator<Item = &Binding> {
        self.bindings
            .values()
            .filter(move |binding| binding.kind == kind)
    }

    /// Drop a binding so a replaced definition can re-bind with fresh
    /// configuration
    pub(crate) fn unbind(&mut self, kind: BaseKind, facet: &FacetName) {
        self.bindings.remove(&(kind, facet.clone()));
    }
}
