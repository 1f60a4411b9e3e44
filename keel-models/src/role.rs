// src/role.rs

//! Permission roles granted to ledger participants.

use crate::errors::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access-control role
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May produce blocks
    Miner,
    /// May issue assets
    Issuer,
    /// May operate an exchange
    Dexer,
    /// May grant and revoke roles
    Permissioner,
    /// May blacklist participants
    Blacklister,
    /// Excluded from the network
    Banned,
    /// May create contracts
    ContractDeveloper,
    /// May manage peer connections
    ConnectionManager,
    /// May send transactions
    Sender,
    /// May validate contract results
    ContractValidator,
}

impl Role {
    /// Every role, in declaration order
    pub const ALL: [Role; 10] = [
        Role::Miner,
        Role::Issuer,
        Role::Dexer,
        Role::Permissioner,
        Role::Blacklister,
        Role::Banned,
        Role::ContractDeveloper,
        Role::ConnectionManager,
        Role::Sender,
        Role::ContractValidator,
    ];

    /// Stable wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Miner => "miner",
            Role::Issuer => "issuer",
            Role::Dexer => "dexer",
            Role::Permissioner => "permissioner",
            Role::Blacklister => "blacklister",
            Role::Banned => "banned",
            Role::ContractDeveloper => "contract_developer",
            Role::ConnectionManager => "connection_manager",
            Role::Sender => "sender",
            Role::ContractValidator => "contract_validator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ModelError::UnknownRole(s.to_string()))
    }
}
