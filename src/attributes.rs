// Copyright (c) 2025 - Cowboy AI, Inc.
//! Attribute Values with Blank/Fallback Semantics
//!
//! Facet attributes are loosely typed: a value is a string, a number, a
//! boolean, or nil. The inheritance resolver needs exactly one predicate over
//! them - whether a value is "blank" - and one operation - the fallback
//! merge, where an existing non-blank value always beats an incoming one.
//!
//! # Blankness
//!
//! `Nil`, `Bool(false)`, and the empty string are blank. A blank value is a
//! placeholder: it never overrides anything and is itself overridden by the
//! next non-blank candidate in the fallback order. Numbers are never blank,
//! including zero.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// Attribute names treated as storage bookkeeping, stripped from the
/// attribute read-model.
pub const VOLATILE_FIELDS: [&str; 2] = ["created_at", "updated_at"];

/// A single facet attribute value
///
/// # Examples
///
/// ```rust
/// use host_facets::AttributeValue;
///
/// assert!(AttributeValue::Nil.is_blank());
/// assert!(AttributeValue::Bool(false).is_blank());
/// assert!(AttributeValue::text("").is_blank());
/// assert!(!AttributeValue::Number(0.0).is_blank());
/// assert!(!AttributeValue::text("rhel8").is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Absent / unset
    Nil,
    /// Boolean flag; `false` is treated as blank (unset)
    Bool(bool),
    /// Numeric value; never blank, including zero
    Number(f64),
    /// Text value; the empty string is blank
    Text(String),
}

impl AttributeValue {
    /// Convenience constructor for text values
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Whether this value counts as "not actually set" for fallback purposes
    ///
    /// Blank values are pure placeholders in the inheritance chain: they are
    /// filled by whichever source is consulted next and never themselves
    /// inherited over a non-blank candidate.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Nil | Self::Bool(false) => true,
            Self::Text(text) => text.is_empty(),
            Self::Bool(true) | Self::Number(_) => false,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}

/// An ordered attribute mapping
///
/// Backed by a `BTreeMap` so iteration order is deterministic, which keeps
/// attribute read-models and merge results stable across runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, AttributeValue>);

impl Attributes {
    /// Create an empty attribute mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a single attribute
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    /// Set a single attribute
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Whether an attribute is present, blank or not
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Iterate over `(name, value)` pairs in name order
    pub fn iter(&self) -> btree_map::Iter<'_, String, AttributeValue> {
        self.0.iter()
    }

    /// Restrict the mapping to the given names
    ///
    /// Names absent from the mapping contribute nothing; they are not
    /// materialized as `Nil`.
    pub fn restrict<'a, I>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        Self(
            names
                .into_iter()
                .filter_map(|name| {
                    self.0
                        .get(name)
                        .map(|value| (name.clone(), value.clone()))
                })
                .collect(),
        )
    }

    /// Copy of the mapping without the volatile bookkeeping fields
    pub fn without_volatile(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(name, _)| !VOLATILE_FIELDS.contains(&name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        )
    }

    /// Fallback merge: fill blanks from `incoming`, keep non-blank values
    ///
    /// For every key in `incoming`: if the key is already present here with a
    /// non-blank value, the existing value wins; otherwise (absent, or
    /// present but blank) the incoming value is taken. This is the single
    /// merge step of the ancestry resolver - the receiver is the
    /// higher-precedence side.
    pub fn merge_fallback(&mut self, incoming: Self) {
        for (name, value) in incoming.0 {
            match self.0.get(&name) {
                Some(existing) if !existing.is_blank() => {}
                _ => {
                    self.0.insert(name, value);
                }
            }
        }
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Attributes {
    type Item = (String, AttributeValue);
    type IntoIter = btree_map::IntoIter<String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a AttributeValue);
    type IntoIter = btree_map::Iter<'a, String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
