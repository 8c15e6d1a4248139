// Copyright (c) 2025 - Cowboy AI, Inc.
//! Facet Definitions - The Declarative Catalog Entries
//!
//! A facet is an optional, pluggable sub-record attached to a base entity
//! ("host" or "hostgroup"), defined independently of the entity type. Each
//! facet is declared once, at process start, as a [`FacetDefinition`]: a
//! validated [`FacetName`] plus, per base-entity kind, an optional
//! [`FacetConfig`] describing how the facet's record type binds to that kind.
//!
//! Definitions are plain data and serializable, so the catalog can be
//! assembled in code or loaded from configuration. They are immutable once
//! registered; the only mutation path is an explicit replace through the
//! registry.
//!
//! # Invariants
//!
//! - `FacetName` is validated at construction: lowercase ASCII identifier,
//!   starts with a letter, `[a-z0-9_]` only, at most 64 characters
//! - A definition supplies zero, one, or both per-kind configurations
//! - Inheritable attribute names are meaningful on hostgroup configurations
//!   only; the resolver ignores them elsewhere

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Facet name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FacetNameError {
    #[error("Facet name is empty")]
    Empty,

    #[error("Facet name exceeds maximum length of 64 characters: {0}")]
    TooLong(usize),

    #[error("Facet name must start with a lowercase letter: {0}")]
    InvalidStart(char),

    #[error("Invalid character in facet name: {0}")]
    InvalidCharacter(char),
}

/// Validated facet identifier
///
/// A facet name doubles as the key of the facet's sub-mapping in the entity
/// attribute read-model, so it follows identifier rules rather than
/// free-text rules:
///
/// # Examples
///
/// ```rust
/// use host_facets::FacetName;
///
/// let name = FacetName::new("provisioning").unwrap();
/// assert_eq!(name.as_str(), "provisioning");
///
/// assert!(FacetName::new("").is_err()); // Empty
/// assert!(FacetName::new("1fast").is_err()); // Starts with a digit
/// assert!(FacetName::new("Provisioning").is_err()); // Uppercase
/// assert!(FacetName::new("net-boot").is_err()); // Hyphen
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetName(String);

impl FacetName {
    /// Maximum length for a facet name
    pub const MAX_LENGTH: usize = 64;

    /// Create a new facet name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, FacetNameError> {
        let name = name.into();

        if name.is_empty() {
            return Err(FacetNameError::Empty);
        }

        if name.len() > Self::MAX_LENGTH {
            return Err(FacetNameError::TooLong(name.len()));
        }

        let first = name.chars().next().unwrap_or_default();
        if !first.is_ascii_lowercase() {
            return Err(FacetNameError::InvalidStart(first));
        }

        for ch in name.chars() {
            if !ch.is_ascii_lowercase() && !ch.is_ascii_digit() && ch != '_' {
                return Err(FacetNameError::InvalidCharacter(ch));
            }
        }

        Ok(Self(name))
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FacetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for FacetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for FacetName {
    type Error = FacetNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for FacetName {
    type Error = FacetNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Base-entity-kind tag
///
/// Identifies which category of owning entity a configuration targets. Each
/// kind has exactly one registration path into the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseKind {
    /// A concrete managed host
    Host,
    /// A node in the hostgroup hierarchy
    Hostgroup,
}

impl fmt::Display for BaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => write!(f, "host"),
            Self::Hostgroup => write!(f, "hostgroup"),
        }
    }
}

/// Capability bundle mixed into a base entity type when a configuration
/// carrying it is bound
///
/// The bundle is an explicit trait object rather than behavior injected
/// into the type itself: the binder records the bundle's capability names on
/// the binding, where callers can query them.
pub trait ExtensionBundle: Send + Sync {
    /// Identifier of this bundle, for diagnostics
    fn name(&self) -> &str;

    /// Capability names this bundle adds to the base entity type
    fn capabilities(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Per-(definition, kind) binding details
///
/// Describes how one facet's record type attaches to one base-entity kind:
/// the record type to relate, the facet-side key fields, the optional
/// extension bundle, the legacy properties to forward, and - for hostgroup
/// configurations - the attribute names that participate in ancestry
/// inheritance.
#[derive(Clone, Serialize, Deserialize)]
pub struct FacetConfig {
    /// Identifier of the record type holding facet instances
    pub target_model: String,

    /// Field on the facet instance referencing the owning base entity
    pub foreign_key_field: String,

    /// Name used on the facet side for the back-reference to the owner
    pub inverse_symbol: String,

    /// Optional capability bundle installed on the base type at bind time
    #[serde(skip)]
    pub extension: Option<Arc<dyn ExtensionBundle>>,

    /// Legacy property names forwarded from the base entity to the facet
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compatibility_properties: Vec<String>,

    /// Attribute names eligible for ancestry-based inheritance
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub inheritable_attribute_names: BTreeSet<String>,
}

impl FacetConfig {
    /// Create a configuration with the mandatory relation fields
    pub fn new(
        target_model: impl Into<String>,
        foreign_key_field: impl Into<String>,
        inverse_symbol: impl Into<String>,
    ) -> Self {
        Self {
            target_model: target_model.into(),
            foreign_key_field: foreign_key_field.into(),
            inverse_symbol: inverse_symbol.into(),
            extension: None,
            compatibility_properties: Vec::new(),
            inheritable_attribute_names: BTreeSet::new(),
        }
    }

    /// Attach an extension bundle
    pub fn extension(mut self, extension: Arc<dyn ExtensionBundle>) -> Self {
        self.extension = Some(extension);
        self
    }

    /// Declare a legacy property to forward to the facet instance
    pub fn compatibility_property(mut self, property: impl Into<String>) -> Self {
        let property = property.into();
        if !self.compatibility_properties.contains(&property) {
            self.compatibility_properties.push(property);
        }
        self
    }

    /// Declare attribute names that participate in ancestry inheritance
    pub fn inherit_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inheritable_attribute_names
            .extend(names.into_iter().map(Into::into));
        self
    }
}

impl fmt::Debug for FacetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacetConfig")
            .field("target_model", &self.target_model)
            .field("foreign_key_field", &self.foreign_key_field)
            .field("inverse_symbol", &self.inverse_symbol)
            .field("extension", &self.extension.as_ref().map(|e| e.name()))
            .field("compatibility_properties", &self.compatibility_properties)
            .field(
                "inheritable_attribute_names",
                &self.inheritable_attribute_names,
            )
            .finish()
    }
}

/// Static declaration of one facet type
///
/// Immutable once registered. Built through [`FacetDefinition::builder`]:
///
/// ```rust
/// use host_facets::{BaseKind, FacetConfig, FacetDefinition};
///
/// let definition = FacetDefinition::builder("provisioning")
///     .unwrap()
///     .configure(
///         BaseKind::Hostgroup,
///         FacetConfig::new("ProvisioningConfig", "hostgroup_id", "hostgroup")
///             .inherit_attributes(["os", "domain"]),
///     )
///     .build();
///
/// assert!(definition.has_configuration(BaseKind::Hostgroup));
/// assert!(!definition.has_configuration(BaseKind::Host));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetDefinition {
    name: FacetName,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    configurations: BTreeMap<BaseKind, FacetConfig>,
}

impl FacetDefinition {
    /// Start building a definition; fails if the name is invalid
    pub fn builder(name: impl Into<String>) -> Result<FacetDefinitionBuilder, FacetNameError> {
        Ok(FacetDefinitionBuilder {
            definition: Self {
                name: FacetName::new(name)?,
                configurations: BTreeMap::new(),
            },
        })
    }

    /// The unique facet identifier
    pub fn name(&self) -> &FacetName {
        &self.name
    }

    /// The configuration for a base-entity kind, if declared
    pub fn configuration(&self, kind: BaseKind) -> Option<&FacetConfig> {
        self.configurations.get(&kind)
    }

    /// Whether this definition targets the given kind
    pub fn has_configuration(&self, kind: BaseKind) -> bool {
        self.configurations.contains_key(&kind)
    }

    /// Kinds this definition supplies configurations for
    pub fn kinds(&self) -> impl Iterator<Item = BaseKind> + '_ {
        self.configurations.keys().copied()
    }
}

/// Builder for [`FacetDefinition`] with a fluent API
pub struct FacetDefinitionBuilder {
    definition: FacetDefinition,
}

impl FacetDefinitionBuilder {
    /// Supply the configuration for one base-entity kind
    ///
    /// Configuring the same kind twice keeps the latest configuration.
    pub fn configure(mut self, kind: BaseKind, config: FacetConfig) -> Self {
        self.definition.configurations.insert(kind, config);
        self
    }

    /// Finish building
    pub fn build(self) -> FacetDefinition {
        self.definition
    }
}
