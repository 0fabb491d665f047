//! Role identifiers understood by the access-control component.

/// Declares one `<NAME>_ROLE` constant per name, plus [`ALL_ROLES`].
macro_rules! roles {
    ($($name:ident),* $(,)?) => {
        paste::paste! {
            $(
                pub const [<$name _ROLE>]: &str = concat!(stringify!($name), "_ROLE");
            )*

            /// Every operational role, in declaration order.
            pub const ALL_ROLES: &[&str] = &[$([<$name _ROLE>]),*];
        }
    };
}

/// Held by governance from setup onward; may grant every role.
pub const DEFAULT_ADMIN_ROLE: &str = "DEFAULT_ADMIN_ROLE";

roles!(
    CONTRACT_GOVERNANCE,
    TREASURY_GOVERNANCE,
    TECH_OPERATIONS,
    TREASURY_OPERATIONS,
    POLICY_OPERATIONS,
    CITADEL_MINTER,
    KEEPER,
    PAUSER,
    UNPAUSER,
    BLOCKLIST_MANAGER,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_role_names() {
        assert_eq!(CONTRACT_GOVERNANCE_ROLE, "CONTRACT_GOVERNANCE_ROLE");
        assert_eq!(CITADEL_MINTER_ROLE, "CITADEL_MINTER_ROLE");
        assert_eq!(ALL_ROLES.len(), 10);
        assert!(!ALL_ROLES.contains(&DEFAULT_ADMIN_ROLE));
    }
}
