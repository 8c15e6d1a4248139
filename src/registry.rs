// Copyright (c) 2025 - Cowboy AI, Inc.
//! Facet Registry - The Process-Wide Facet Catalog
//!
//! The registry owns the catalog of facet definitions and the attachment
//! binder, and keeps them consistent: whenever a definition registers or a
//! base entity type activates, every `(kind, facet)` pair that becomes
//! satisfiable is bound immediately. Registration order is observable - it
//! is recorded and drives deterministic iteration for attribute merges.
//!
//! # Lifecycle
//!
//! A registry is an explicit object owned by the application's composition
//! root, not ambient global state. It is mutated only during single-threaded
//! startup wiring (register / activate); afterwards it is read-only and may
//! be shared across threads behind an `Arc` without locking.
//!
//! ```text
//! startup:  activate(Host) ─┐
//!           activate(Hostgroup) ├─> bind on each registration
//!           register(provisioning) ─┘
//! runtime:  lookup / definitions_for / surface  (read-only, Arc-shared)
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

use crate::binder::{AttachmentBinder, Binding, FacetHost};
use crate::definition::{BaseKind, FacetDefinition, FacetName};
use crate::errors::{FacetError, FacetResult};
use crate::surface::EntitySurface;

/// Catalog of all known facet definitions plus their bindings
#[derive(Default)]
pub struct FacetRegistry {
    /// Definitions in registration order; replacement keeps the slot
    definitions: Vec<Arc<FacetDefinition>>,
    index: HashMap<FacetName, usize>,
    hosts: BTreeMap<BaseKind, Arc<dyn FacetHost>>,
    binder: AttachmentBinder,
}

impl FacetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a base entity type's facet support
    ///
    /// Every already-registered definition configuring the type's kind is
    /// bound immediately, so activation order relative to registration does
    /// not matter. Activating a kind twice replaces the prior activation;
    /// established bindings stay in place.
    pub fn activate(&mut self, base_type: Arc<dyn FacetHost>) -> FacetResult<()> {
        let kind = base_type.kind();
        debug!(%kind, base_type = base_type.type_name(), "activating base entity type");

        for definition in &self.definitions {
            if definition.has_configuration(kind) {
                self.binder.bind(base_type.as_ref(), kind, definition)?;
            }
        }
        self.hosts.insert(kind, base_type);
        Ok(())
    }

    /// Add a definition to the catalog
    ///
    /// Fails with [`FacetError::DuplicateFacet`] when the name is already
    /// present; replacing an existing definition requires the explicit
    /// [`FacetRegistry::register_replace`] path. On success the definition
    /// is bound onto every previously-activated base type it configures.
    pub fn register(&mut self, definition: FacetDefinition) -> FacetResult<()> {
        if self.index.contains_key(definition.name()) {
            return Err(FacetError::DuplicateFacet(definition.name().clone()));
        }

        let definition = Arc::new(definition);
        self.index
            .insert(definition.name().clone(), self.definitions.len());
        self.definitions.push(Arc::clone(&definition));
        debug!(facet = %definition.name(), "registered facet definition");

        self.bind_activated(&definition)
    }

    /// Replace a definition, or add it when absent - the explicit update
    /// path
    ///
    /// A replaced definition keeps its original registration slot, so the
    /// order observed by [`FacetRegistry::definitions_for`] is stable across
    /// replacement. Existing bindings for the facet are dropped and
    /// re-established from the new configurations.
    pub fn register_replace(&mut self, definition: FacetDefinition) -> FacetResult<()> {
        let Some(&slot) = self.index.get(definition.name()) else {
            return self.register(definition);
        };

        for kind in [BaseKind::Host, BaseKind::Hostgroup] {
            self.binder.unbind(kind, definition.name());
        }

        let definition = Arc::new(definition);
        self.definitions[slot] = Arc::clone(&definition);
        debug!(facet = %definition.name(), "replaced facet definition");

        self.bind_activated(&definition)
    }

    /// Bind a definition onto every activated base type it configures
    fn bind_activated(&mut self, definition: &Arc<FacetDefinition>) -> FacetResult<()> {
        for (&kind, base_type) in &self.hosts {
            if definition.has_configuration(kind) {
                self.binder.bind(base_type.as_ref(), kind, definition)?;
            }
        }
        Ok(())
    }

    /// Look up a definition by name
    pub fn lookup(&self, name: &FacetName) -> FacetResult<&Arc<FacetDefinition>> {
        self.index
            .get(name)
            .map(|&slot| &self.definitions[slot])
            .ok_or_else(|| FacetError::UnknownFacet(name.clone()))
    }

    /// All registered definitions, in registration order
    pub fn definitions(&self) -> impl Iterator<Item = &Arc<FacetDefinition>> {
        self.definitions.iter()
    }

    /// Registered definitions configuring the given kind, in registration
    /// order
    ///
    /// The stable order makes attribute-merge tie-breaks deterministic.
    pub fn definitions_for(
        &self,
        kind: BaseKind,
    ) -> impl Iterator<Item = &Arc<FacetDefinition>> {
        self.definitions
            .iter()
            .filter(move |definition| definition.has_configuration(kind))
    }

    /// The activated base type for a kind, if any
    pub fn activated(&self, kind: BaseKind) -> Option<&Arc<dyn FacetHost>> {
        self.hosts.get(&kind)
    }

    /// The established binding for a `(kind, facet)` pair
    pub fn binding(&self, kind: BaseKind, facet: &FacetName) -> Option<&Binding> {
        self.binder.binding(kind, facet)
    }

    /// The attachment binder's full catalog
    pub fn binder(&self) -> &AttachmentBinder {
        &self.binder
    }

    /// The facet-bearing entity surface for one base-entity kind
    pub fn surface(&self, kind: BaseKind) -> EntitySurface<'_> {
        EntitySurface::new(self, kind)
    }
}

impl std::fmt::Debug for FacetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacetRegistry")
            .field(
                "definitions",
                &self
                    .definitions
                    .iter()
                    .map(|d| d.name().as_str())
                    .collect::<Vec<_>>(),
            )
            .field("activated", &self.hosts.keys().collect::<Vec<_>>())
            .field("binder", &self.binder)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::FacetConfig;
    use pretty_assertions::assert_eq;

    struct Host;

    impl FacetHost for Host {
        fn kind(&self) -> BaseKind {
            BaseKind::Host
        }

        fn type_name(&self) -> &str {
            "Host"
        }

        fn foreign_key_field(&self) -> &str {
            "host_id"
        }

        fn inverse_symbol(&self) -> &str {
            "host"
        }
    }

    struct Hostgroup;

    impl FacetHost for Hostgroup {
        fn kind(&self) -> BaseKind {
            BaseKind::Hostgroup
        }

        fn type_name(&self) -> &str {
            "Hostgroup"
        }

        fn foreign_key_field(&self) -> &str {
            "hostgroup_id"
        }

        fn inverse_symbol(&self) -> &str {
            "hostgroup"
        }
    }

    fn definition(name: &str, kinds: &[BaseKind]) -> FacetDefinition {
        let mut builder = FacetDefinition::builder(name).unwrap();
        for &kind in kinds {
            let fk = format!("{kind}_id");
            builder = builder.configure(
                kind,
                FacetConfig::new(format!("{name}_config"), fk, kind.to_string()),
            );
        }
        builder.build()
    }

    #[test]
    fn test_duplicate_registration_keeps_original() {
        let mut registry = FacetRegistry::new();
        let original = definition("provisioning", &[BaseKind::Host]);
        registry.register(original).unwrap();

        let duplicate = definition("provisioning", &[BaseKind::Hostgroup]);
        let err = registry.register(duplicate).unwrap_err();
        assert!(matches!(err, FacetError::DuplicateFacet(_)));

        // The failed duplicate left the original untouched.
        let name = FacetName::new("provisioning").unwrap();
        let kept = registry.lookup(&name).unwrap();
        assert!(kept.has_configuration(BaseKind::Host));
        assert!(!kept.has_configuration(BaseKind::Hostgroup));
    }

    #[test]
    fn test_lookup_unknown_facet() {
        let registry = FacetRegistry::new();
        let name = FacetName::new("monitoring").unwrap();
        assert_eq!(
            registry.lookup(&name).unwrap_err(),
            FacetError::UnknownFacet(name)
        );
    }

    #[test]
    fn test_registration_order_is_stable() {
        let mut registry = FacetRegistry::new();
        registry
            .register(definition("provisioning", &[BaseKind::Host, BaseKind::Hostgroup]))
            .unwrap();
        registry
            .register(definition("virtualization", &[BaseKind::Host]))
            .unwrap();
        registry
            .register(definition("monitoring", &[BaseKind::Hostgroup]))
            .unwrap();

        let host_facets: Vec<_> = registry
            .definitions_for(BaseKind::Host)
            .map(|d| d.name().as_str())
            .collect();
        assert_eq!(host_facets, vec!["provisioning", "virtualization"]);

        let hostgroup_facets: Vec<_> = registry
            .definitions_for(BaseKind::Hostgroup)
            .map(|d| d.name().as_str())
            .collect();
        assert_eq!(hostgroup_facets, vec!["provisioning", "monitoring"]);
    }

    #[test]
    fn test_register_then_activate_binds() {
        let mut registry = FacetRegistry::new();
        registry
            .register(definition("provisioning", &[BaseKind::Host]))
            .unwrap();
        registry.activate(Arc::new(Host)).unwrap();

        let name = FacetName::new("provisioning").unwrap();
        assert!(registry.binder().is_bound(BaseKind::Host, &name));
    }

    #[test]
    fn test_activate_then_register_binds() {
        let mut registry = FacetRegistry::new();
        registry.activate(Arc::new(Host)).unwrap();
        registry.activate(Arc::new(Hostgroup)).unwrap();
        registry
            .register(definition("provisioning", &[BaseKind::Host, BaseKind::Hostgroup]))
            .unwrap();

        let name = FacetName::new("provisioning").unwrap();
        assert!(registry.binder().is_bound(BaseKind::Host, &name));
        assert!(registry.binder().is_bound(BaseKind::Hostgroup, &name));
    }

    #[test]
    fn test_register_replace_keeps_slot_and_rebinds() {
        let mut registry = FacetRegistry::new();
        registry.activate(Arc::new(Host)).unwrap();
        registry
            .register(definition("provisioning", &[BaseKind::Host]))
            .unwrap();
        registry
            .register(definition("virtualization", &[BaseKind::Host]))
            .unwrap();

        let replacement = FacetDefinition::builder("provisioning")
            .unwrap()
            .configure(
                BaseKind::Host,
                FacetConfig::new("ProvisioningConfigV2", "host_id", "host"),
            )
            .build();
        registry.register_replace(replacement).unwrap();

        let order: Vec<_> = registry
            .definitions_for(BaseKind::Host)
            .map(|d| d.name().as_str())
            .collect();
        assert_eq!(order, vec!["provisioning", "virtualization"]);

        let name = FacetName::new("provisioning").unwrap();
        let binding = registry.binding(BaseKind::Host, &name).unwrap();
        assert_eq!(binding.target_model(), "ProvisioningConfigV2");
    }

    #[test]
    fn test_register_replace_of_absent_definition_registers() {
        let mut registry = FacetRegistry::new();
        registry
            .register_replace(definition("provisioning", &[BaseKind::Host]))
            .unwrap();
        let name = FacetName::new("provisioning").unwrap();
        assert!(registry.lookup(&name).is_ok());
    }
}
