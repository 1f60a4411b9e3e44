// src/lib.rs

//! # Keel Keytool
//!
//! Library half of the `keel-keytool` binary: configuration loading and the
//! operations behind each subcommand.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod commands;

pub use crate::config::KeytoolConfig;

/// Key tool version
pub const KEYTOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the key store password
pub const PASSWORD_ENV: &str = "KEEL_KEYSTORE_PASSWORD";
