// src/lib.rs

//! # Keel Models
//!
//! Value types shared by Keel ledger clients.
//!
//! This crate provides:
//! - **Role**: access-control roles with stable wire names
//! - **ValidationPolicy**: which validators must approve a contract result
//! - **Address**: checksummed Base58 account addresses
//! - **Units**: token amount to ledger unit conversion
//!
//! ## Example Usage
//!
//! ```rust
//! use keel_crypto::{address::AddressParams, keys};
//! use keel_models::{Address, Role, ValidationPolicy};
//!
//! let keypair = keys::generate_keypair();
//! let address = Address::from_public_key(&keypair.public_key, &AddressParams::new(b'K')).unwrap();
//!
//! let policy = ValidationPolicy::majority_with_one_of(vec![address]).unwrap();
//! assert_ne!(policy, ValidationPolicy::default());
//!
//! assert_eq!("miner".parse::<Role>().unwrap(), Role::Miner);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod errors;
pub mod role;
pub mod address;
pub mod validation_policy;
pub mod units;

// Re-export commonly used types
pub use crate::errors::{ModelError, Result};
pub use crate::role::Role;
pub use crate::address::Address;
pub use crate::validation_policy::{ValidationPolicy, ValidatorSet};
