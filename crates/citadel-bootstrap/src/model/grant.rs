//! Role grants and their grantees.

use component_framework::Address;
use std::fmt::{self, Display};

/// Who receives a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grantee {
    /// A registered component, by name.
    Component(String),
    /// A signer from the signer table.
    Signer(String),
    Address(Address),
}

impl Display for Grantee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grantee::Component(name) | Grantee::Signer(name) => f.write_str(name),
            Grantee::Address(address) => write!(f, "{address}"),
        }
    }
}

/// A role to hold at the access-control component.
///
/// Grants are idempotent: applying one that is already held is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    pub role: String,
    pub grantee: Grantee,
    /// Lets the grantee grant this role onward.
    pub delegable: bool,
}

impl RoleGrant {
    pub fn new(role: impl Into<String>, grantee: Grantee) -> Self {
        Self {
            role: role.into(),
            grantee,
            delegable: false,
        }
    }

    pub fn to_component(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(role, Grantee::Component(name.into()))
    }

    pub fn to_signer(role: impl Into<String>, signer: impl Into<String>) -> Self {
        Self::new(role, Grantee::Signer(signer.into()))
    }

    pub fn delegable(mut self) -> Self {
        self.delegable = true;
        self
    }

    pub fn description(&self) -> String {
        if self.delegable {
            format!("grant {} to {} (delegable)", self.role, self.grantee)
        } else {
            format!("grant {} to {}", self.role, self.grantee)
        }
    }
}
