//! # Bootstrap Configuration
//!
//! Everything a run reads from the outside world: the signer table, the raw parameter
//! table, the sale asset addresses and a few deployment switches. Loaded from TOML and
//! validated before anything else happens.

use crate::contracts::setup::is_bytes32;
use crate::model::SignerTable;
use crate::params::RawParameters;
use crate::plan::REQUIRED_SIGNERS;
use component_framework::Address;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

const LOCAL_CONFIG: &str = include_str!("../../config/local.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot parse config: {0}")]
    CannotParseToml(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    pub signers: SignersConfig,
    pub parameters: RawParameters,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub guestlist: GuestlistConfig,
    #[serde(default)]
    pub token: TokenConfig,
}

/// Logical signer names, with optional fixed addresses.
///
/// A name without an entry in `addresses` gets an address derived from the name, the
/// way a local node hands out dev accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignersConfig {
    pub deployer: Option<Address>,
    pub names: Vec<String>,
    #[serde(default)]
    pub addresses: BTreeMap<String, Address>,
}

impl SignersConfig {
    pub fn to_table(&self) -> SignerTable {
        let deployer = self.deployer.unwrap_or_else(|| Address::derive("deployer"));
        self.names.iter().fold(SignerTable::new(deployer), |table, name| {
            let address = self
                .addresses
                .get(name)
                .copied()
                .unwrap_or_else(|| Address::derive(name));
            table.with(name.as_str(), address)
        })
    }
}

/// Pre-existing sale assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    pub wbtc: Address,
    pub cvx: Address,
    /// Host ERC20 stand-ins at the asset addresses before attaching (fresh local node).
    pub seed_local: bool,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            wbtc: Address::new([
                0x22, 0x60, 0xfa, 0xc5, 0xe5, 0x54, 0x2a, 0x77, 0x3a, 0xa4, 0x4f, 0xbc, 0xfe,
                0xdf, 0x7c, 0x19, 0x3b, 0xc2, 0xc5, 0x99,
            ]),
            cvx: Address::new([
                0x4e, 0x3f, 0xbd, 0x56, 0xcd, 0x56, 0xc3, 0xe7, 0x2c, 0x14, 0x03, 0xe1, 0x03,
                0xb4, 0x5d, 0x9b, 0xda, 0x5b, 0x9d, 0x2b,
            ]),
            seed_local: false,
        }
    }
}

/// Knighting round guestlist. Disabled means the round gets the zero address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuestlistConfig {
    pub enabled: bool,
    /// Merkle root of the guest set, `0x` + 64 hex digits.
    pub root: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub staked_name: String,
    pub staked_symbol: String,
    pub locker_name: String,
    pub locker_symbol: String,
    /// Vault fee configuration passed to the staked token.
    pub fees: [u64; 4],
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "Citadel".to_string(),
            symbol: "CTDL".to_string(),
            staked_name: "Staked Citadel".to_string(),
            staked_symbol: "xCTDL".to_string(),
            locker_name: "Vote Locked xCitadel".to_string(),
            locker_symbol: "vlCTDL".to_string(),
            fees: [0; 4],
        }
    }
}

impl BootstrapConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::CannotParseToml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The built-in fresh local deployment.
    pub fn local() -> Result<Self, ConfigError> {
        Self::from_toml_str(LOCAL_CONFIG)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for name in &self.signers.names {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::Invalid(format!("signer `{name}` listed twice")));
            }
        }
        for required in REQUIRED_SIGNERS {
            if !seen.contains(required) {
                return Err(ConfigError::Invalid(format!("missing signer `{required}`")));
            }
        }
        for (name, address) in &self.signers.addresses {
            if !seen.contains(name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "address given for unlisted signer `{name}`"
                )));
            }
            if address.is_zero() {
                return Err(ConfigError::Invalid(format!("signer `{name}` has the zero address")));
            }
        }
        if self.signers.deployer.is_some_and(|deployer| deployer.is_zero()) {
            return Err(ConfigError::Invalid("deployer has the zero address".to_string()));
        }
        if self.assets.wbtc.is_zero() || self.assets.cvx.is_zero() {
            return Err(ConfigError::Invalid("asset with the zero address".to_string()));
        }
        match &self.guestlist.root {
            None if self.guestlist.enabled => {
                return Err(ConfigError::Invalid(
                    "guestlist enabled without a root".to_string(),
                ));
            }
            Some(root) if !is_bytes32(root) => {
                return Err(ConfigError::Invalid(format!(
                    "guestlist root `{root}` is not 0x followed by 64 hex digits"
                )));
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_local_config_is_valid() {
        let config = BootstrapConfig::local().unwrap();
        assert_eq!(config.signers.names.len(), 9);
        assert!(config.assets.seed_local);
        assert!(!config.guestlist.enabled);
        assert_eq!(config.token.symbol, "CTDL");
        assert_eq!(config.assets.wbtc, AssetsConfig::default().wbtc);
        assert_eq!(
            config.assets.cvx.to_string(),
            "0x4e3fbd56cd56c3e72c1403e103b45db9da5b9d2b"
        );

        let table = config.signers.to_table();
        assert_eq!(table.get("governance"), Some(Address::derive("governance")));
        assert_eq!(table.deployer(), Address::derive("deployer"));
    }

    #[test]
    fn test_fixed_addresses_override_derived_ones() {
        let treasury: Address = "0x1111111111111111111111111111111111111111".parse().unwrap();
        let mut config = BootstrapConfig::local().unwrap();
        config.signers.addresses.insert("treasuryVault".into(), treasury);
        config.validate().unwrap();
        assert_eq!(config.signers.to_table().get("treasuryVault"), Some(treasury));
    }

    #[test]
    fn test_rejects_unknown_fields_and_missing_signers() {
        let with_typo = LOCAL_CONFIG.replace("seed_local", "seed_locally");
        assert!(matches!(
            BootstrapConfig::from_toml_str(&with_typo),
            Err(ConfigError::CannotParseToml(_))
        ));

        let without_keeper = LOCAL_CONFIG.replace("    \"keeper\",\n", "");
        let err = BootstrapConfig::from_toml_str(&without_keeper).unwrap_err();
        assert_eq!(err.to_string(), "invalid config: missing signer `keeper`");
    }

    #[test]
    fn test_guestlist_needs_root() {
        let mut config = BootstrapConfig::local().unwrap();
        config.guestlist = GuestlistConfig {
            enabled: true,
            root: None,
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.guestlist.root = Some("0xa792\u{e9}".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_non_ascii_address_is_a_parse_error() {
        let bad = format!("0xa\u{e9}{}", "0".repeat(37));
        let contents = LOCAL_CONFIG.replace("0x2260fac5e5542a773aa44fbcfedf7c193bc2c599", &bad);
        assert!(matches!(
            BootstrapConfig::from_toml_str(&contents),
            Err(ConfigError::CannotParseToml(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LOCAL_CONFIG.as_bytes()).unwrap();
        let config = BootstrapConfig::load(file.path()).unwrap();
        assert_eq!(config, BootstrapConfig::local().unwrap());

        assert!(matches!(
            BootstrapConfig::load("/nonexistent/citadel.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
