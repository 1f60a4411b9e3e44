// src/validation_policy.rs

//! Policies deciding which validators must approve a contract result.

use crate::address::Address;
use crate::errors::{ModelError, Result};
use serde::{Deserialize, Serialize};

/// Non-empty ordered set of validator addresses
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Address>", into = "Vec<Address>")]
pub struct ValidatorSet(Vec<Address>);

impl ValidatorSet {
    /// Builds a set, dropping repeated addresses but keeping first-seen order
    ///
    /// # Errors
    /// `EmptyAddressList` if no address is given.
    pub fn new<I: IntoIterator<Item = Address>>(addresses: I) -> Result<Self> {
        let mut unique: Vec<Address> = Vec::new();
        for address in addresses {
            if !unique.contains(&address) {
                unique.push(address);
            }
        }

        if unique.is_empty() {
            return Err(ModelError::EmptyAddressList);
        }
        Ok(Self(unique))
    }

    /// Addresses in order
    pub fn addresses(&self) -> &[Address] {
        &self.0
    }

    /// Whether `address` is in the set
    pub fn contains(&self, address: &Address) -> bool {
        self.0.contains(address)
    }

    /// Number of addresses
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Address>> for ValidatorSet {
    type Error = ModelError;

    fn try_from(addresses: Vec<Address>) -> Result<Self> {
        Self::new(addresses)
    }
}

impl From<ValidatorSet> for Vec<Address> {
    fn from(set: ValidatorSet) -> Self {
        set.0
    }
}

/// Contract validation policy
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "addresses", rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Any single validator suffices
    #[default]
    Any,
    /// A majority of validators
    Majority,
    /// A majority that includes at least one of the listed addresses
    MajorityWithOneOf(ValidatorSet),
}

impl ValidationPolicy {
    /// Builds `MajorityWithOneOf` from a list of addresses
    pub fn majority_with_one_of<I: IntoIterator<Item = Address>>(addresses: I) -> Result<Self> {
        Ok(ValidationPolicy::MajorityWithOneOf(ValidatorSet::new(addresses)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_crypto::address::AddressParams;
    use keel_crypto::keys;

    fn address() -> Address {
        let public_key = keys::generate_keypair().public_key;
        Address::from_public_key(&public_key, &AddressParams::new(b'K')).unwrap()
    }

    #[test]
    fn test_default_is_any() {
        assert_eq!(ValidationPolicy::default(), ValidationPolicy::Any);
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(
            ValidationPolicy::majority_with_one_of(Vec::<Address>::new()),
            Err(ModelError::EmptyAddressList)
        );
    }

    #[test]
    fn test_duplicates_removed_order_kept() {
        let (a, b, c) = (address(), address(), address());
        let listed = vec![b.clone(), a.clone(), b.clone(), c.clone(), a.clone()];
        let policy = ValidationPolicy::majority_with_one_of(listed).unwrap();

        match policy {
            ValidationPolicy::MajorityWithOneOf(set) => {
                assert_eq!(set.addresses(), &[b, a, c]);
                assert_eq!(set.len(), 3);
            }
            other => panic!("unexpected policy {:?}", other),
        }
    }

    #[test]
    fn test_serde_shape() {
        assert_eq!(serde_json::to_string(&ValidationPolicy::Any).unwrap(), r#"{"type":"any"}"#);
        assert_eq!(
            serde_json::to_string(&ValidationPolicy::Majority).unwrap(),
            r#"{"type":"majority"}"#
        );

        let a = address();
        let policy = ValidationPolicy::majority_with_one_of(vec![a.clone()]).unwrap();
        let json = serde_json::to_string(&policy).unwrap();
        assert_eq!(json, format!(r#"{{"type":"majority_with_one_of","addresses":["{}"]}}"#, a));
        assert_eq!(serde_json::from_str::<ValidationPolicy>(&json).unwrap(), policy);
    }

    #[test]
    fn test_deserialize_empty_list_fails() {
        let json = r#"{"type":"majority_with_one_of","addresses":[]}"#;
        assert!(serde_json::from_str::<ValidationPolicy>(json).is_err());
    }
}
