// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Ancestry Resolver
//!
//! Models a hostgroup chain as a nearest-first vector of optional facet
//! attribute maps (index 0 = the node itself, last = the root) and checks
//! the resolver against a direct oracle of the precedence rule: first
//! non-blank value scanning nearest-first wins; if every present value is
//! blank, the farthest present one remains; keys present nowhere are never
//! materialized.

use proptest::prelude::*;
use std::collections::BTreeMap;
use uuid::Uuid;

use host_facets::{
    inherited_attributes, AttributeValue, Attributes, BaseKind, FacetConfig, FacetDefinition,
};

use crate::fixtures::InMemoryBacking;

/// Attribute names used in generated chains; the last one is deliberately
/// not inheritable.
const KEYS: [&str; 4] = ["os", "domain", "realm", "pxe_loader"];
const INHERITABLE: usize = 3;

type FacetAttrs = Option<BTreeMap<usize, AttributeValue>>;

fn definition() -> FacetDefinition {
    FacetDefinition::builder("provisioning")
        .unwrap()
        .configure(
            BaseKind::Hostgroup,
            FacetConfig::new("ProvisioningConfig", "hostgroup_id", "hostgroup")
                .inherit_attributes(KEYS[..INHERITABLE].iter().copied()),
        )
        .build()
}

fn attribute_value() -> impl Strategy<Value = AttributeValue> {
    prop_oneof![
        Just(AttributeValue::Nil),
        any::<bool>().prop_map(AttributeValue::Bool),
        (0i64..100).prop_map(|n| AttributeValue::Number(n as f64)),
        "[a-z]{0,6}".prop_map(AttributeValue::text),
    ]
}

fn facet_attrs() -> impl Strategy<Value = FacetAttrs> {
    proptest::option::of(prop::collection::btree_map(
        0usize..KEYS.len(),
        attribute_value(),
        0..=KEYS.len(),
    ))
}

/// A chain in nearest-first order, at least the node itself
fn chains() -> impl Strategy<Value = Vec<FacetAttrs>> {
    prop::collection::vec(facet_attrs(), 1..=5)
}

/// Materialize a generated chain into the in-memory backing, returning the
/// leaf node to resolve against
fn build_backing(chain_nearest_first: &[FacetAttrs]) -> (InMemoryBacking, Uuid) {
    let mut backing = InMemoryBacking::new();
    let mut parent = None;
    for facet in chain_nearest_first.iter().rev() {
        let node = backing.add_node(parent);
        if let Some(attrs) = facet {
            let attributes: Attributes = attrs
                .iter()
                .map(|(&key, value)| (KEYS[key], value.clone()))
                .collect();
            backing.attach_facet(node, "provisioning", attributes);
        }
        parent = Some(node);
    }
    (backing, parent.expect("chain is non-empty"))
}

/// Direct statement of the precedence rule, per key
fn expected_value(chain_nearest_first: &[FacetAttrs], key: usize) -> Option<AttributeValue> {
    let present: Vec<&AttributeValue> = chain_nearest_first
        .iter()
        .filter_map(|facet| facet.as_ref().and_then(|attrs| attrs.get(&key)))
        .collect();
    if let Some(value) = present.iter().find(|value| !value.is_blank()) {
        return Some((*value).clone());
    }
    present.last().map(|value| (*value).clone())
}

proptest! {
    /// The resolver agrees with the per-key oracle on every inheritable key
    #[test]
    fn prop_resolver_matches_precedence_oracle(chain in chains()) {
        let (backing, leaf) = build_backing(&chain);
        let result = inherited_attributes(&backing, &definition(), &leaf).unwrap();

        for key in 0..INHERITABLE {
            prop_assert_eq!(
                result.get(KEYS[key]).cloned(),
                expected_value(&chain, key),
                "key {}", KEYS[key]
            );
        }
    }

    /// A non-blank value on the node itself always wins over any ancestor
    #[test]
    fn prop_own_non_blank_value_wins(
        chain in chains(),
        own in "[a-z]{1,6}",
    ) {
        let mut chain = chain;
        let own_value = AttributeValue::text(own);
        chain[0]
            .get_or_insert_with(BTreeMap::new)
            .insert(0, own_value.clone());

        let (backing, leaf) = build_backing(&chain);
        let result = inherited_attributes(&backing, &definition(), &leaf).unwrap();
        prop_assert_eq!(result.get(KEYS[0]), Some(&own_value));
    }

    /// Non-inheritable attributes never leak into the result, and keys
    /// absent from the whole chain are never materialized
    #[test]
    fn prop_result_restricted_to_inheritable_present_keys(chain in chains()) {
        let (backing, leaf) = build_backing(&chain);
        let result = inherited_attributes(&backing, &definition(), &leaf).unwrap();

        prop_assert!(!result.contains(KEYS[INHERITABLE]));
        for key in 0..INHERITABLE {
            if expected_value(&chain, key).is_none() {
                prop_assert!(!result.contains(KEYS[key]));
            }
        }
    }
}
