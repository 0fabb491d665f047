//! The signer table.

use component_framework::Address;
use std::collections::BTreeMap;

/// Logical role names (governance, keeper, treasury, …) mapped to signer addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerTable {
    deployer: Address,
    roles: BTreeMap<String, Address>,
}

impl SignerTable {
    pub fn new(deployer: Address) -> Self {
        Self {
            deployer,
            roles: BTreeMap::new(),
        }
    }

    /// Local dev accounts: every address derived from its role name.
    pub fn local<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        names.into_iter().fold(
            Self::new(Address::derive("deployer")),
            |table, name| table.with(name, Address::derive(name)),
        )
    }

    pub fn with(mut self, role: impl Into<String>, address: Address) -> Self {
        self.insert(role, address);
        self
    }

    pub fn insert(&mut self, role: impl Into<String>, address: Address) {
        self.roles.insert(role.into(), address);
    }

    pub fn deployer(&self) -> Address {
        self.deployer
    }

    pub fn get(&self, role: &str) -> Option<Address> {
        self.roles.get(role).copied()
    }

    pub fn roles(&self) -> impl Iterator<Item = (&str, Address)> {
        self.roles.iter().map(|(name, address)| (name.as_str(), *address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_signers_are_derived_from_names() {
        let table = SignerTable::local(["governance", "keeper"]);
        assert_eq!(table.get("governance"), Some(Address::derive("governance")));
        assert_eq!(table.get("keeper"), Some(Address::derive("keeper")));
        assert_eq!(table.get("guardian"), None);
        assert_eq!(table.deployer(), Address::derive("deployer"));
        assert_eq!(table.roles().count(), 2);
    }
}
