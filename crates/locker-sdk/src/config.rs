//! Client configuration, loaded from environment variables or built in code.

use std::env;

use chain_sol::Pubkey;
use serde::Deserialize;

use crate::constants::LOCKER_PROGRAM_ID;
use crate::error::LockerError;

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_COMMITMENT: &str = "confirmed";
pub const DEFAULT_MAX_RETRIES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LockerConfig {
    /// JSON-RPC endpoint
    pub rpc_url: String,

    /// Locker program to target, e.g. a staging deployment
    pub program_id: Pubkey,

    /// Commitment level for reads and preflight
    pub commitment: String,

    /// `maxRetries` passed to `sendTransaction`
    pub max_retries: usize,
}

impl Default for LockerConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            program_id: LOCKER_PROGRAM_ID,
            commitment: DEFAULT_COMMITMENT.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl LockerConfig {
    /// Load configuration from environment variables:
    ///
    /// - `LOCKER_RPC_URL`
    /// - `LOCKER_PROGRAM_ID`
    /// - `LOCKER_COMMITMENT`
    /// - `LOCKER_MAX_RETRIES`
    ///
    /// Unset variables fall back to the defaults; set but malformed ones are errors.
    pub fn from_env() -> Result<Self, LockerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LockerError> {
        let defaults = Self::default();

        let program_id = match lookup("LOCKER_PROGRAM_ID") {
            Some(raw) => raw
                .parse()
                .map_err(|e| LockerError::Config(format!("LOCKER_PROGRAM_ID: {e}")))?,
            None => defaults.program_id,
        };

        let max_retries = match lookup("LOCKER_MAX_RETRIES") {
            Some(raw) => raw
                .parse()
                .map_err(|e| LockerError::Config(format!("LOCKER_MAX_RETRIES: {e}")))?,
            None => defaults.max_retries,
        };

        Ok(Self {
            rpc_url: lookup("LOCKER_RPC_URL").unwrap_or(defaults.rpc_url),
            program_id,
            commitment: lookup("LOCKER_COMMITMENT").unwrap_or(defaults.commitment),
            max_retries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = LockerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, LockerConfig::default());
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.program_id, LOCKER_PROGRAM_ID);
    }

    #[test]
    fn environment_overrides() {
        let config = LockerConfig::from_lookup(lookup(&[
            ("LOCKER_RPC_URL", "http://127.0.0.1:8899"),
            ("LOCKER_PROGRAM_ID", "sLovrBvGxvyvBniMxj8uUt9CdD7CV4PhnBnBD6cPSXo"),
            ("LOCKER_COMMITMENT", "finalized"),
            ("LOCKER_MAX_RETRIES", "5"),
        ]))
        .unwrap();

        assert_eq!(config.rpc_url, "http://127.0.0.1:8899");
        assert_eq!(
            config.program_id.to_string(),
            "sLovrBvGxvyvBniMxj8uUt9CdD7CV4PhnBnBD6cPSXo"
        );
        assert_eq!(config.commitment, "finalized");
        assert_eq!(config.max_retries, 5);
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(LockerConfig::from_lookup(lookup(&[("LOCKER_MAX_RETRIES", "many")])).is_err());
        assert!(LockerConfig::from_lookup(lookup(&[("LOCKER_PROGRAM_ID", "nope!")])).is_err());
    }

    #[test]
    fn deserializes_partial_json() {
        let config: LockerConfig =
            serde_json::from_str(r#"{ "rpc_url": "http://localhost:8899" }"#).unwrap();
        assert_eq!(config.rpc_url, "http://localhost:8899");
        assert_eq!(config.commitment, DEFAULT_COMMITMENT);
    }
}
