//! The Global Access Control: one role table every other component consults.

use super::roles::{CONTRACT_GOVERNANCE_ROLE, DEFAULT_ADMIN_ROLE};
use super::setup::{check_args, GLOBAL_ACCESS_CONTROL};
use super::ContractError;
use async_trait::async_trait;
use component_framework::{Address, CallContext, Component, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Role table with an admin role and per-role delegates.
///
/// Holders of [`DEFAULT_ADMIN_ROLE`] may grant any role, delegable or not. A role granted
/// as delegable lets its holder grant that one role onward, but never delegably.
#[derive(Debug, Default)]
pub struct GlobalAccessControl {
    members: BTreeMap<String, BTreeSet<Address>>,
    delegates: BTreeMap<String, BTreeSet<Address>>,
}

impl GlobalAccessControl {
    pub fn has_role(&self, role: &str, account: Address) -> bool {
        self.members
            .get(role)
            .is_some_and(|members| members.contains(&account))
    }

    fn is_admin(&self, account: Address) -> bool {
        self.has_role(DEFAULT_ADMIN_ROLE, account)
    }

    pub fn can_grant(&self, role: &str, grantor: Address) -> bool {
        self.is_admin(grantor)
            || self
                .delegates
                .get(role)
                .is_some_and(|delegates| delegates.contains(&grantor))
    }

    /// Returns whether anything changed.
    fn grant(&mut self, role: &str, account: Address, delegable: bool) -> bool {
        let mut changed = self.members.entry(role.to_string()).or_default().insert(account);
        if delegable {
            changed |= self.delegates.entry(role.to_string()).or_default().insert(account);
        }
        changed
    }
}

#[async_trait]
impl Component for GlobalAccessControl {
    type Error = ContractError;

    fn kind(&self) -> &str {
        GLOBAL_ACCESS_CONTROL.kind
    }

    async fn initialize(&mut self, _ctx: &CallContext, args: Vec<Value>) -> Result<(), ContractError> {
        check_args("initialize", GLOBAL_ACCESS_CONTROL.initialize, &args)?;
        let governance = args[0].as_address().unwrap_or_default();
        self.grant(DEFAULT_ADMIN_ROLE, governance, false);
        self.grant(CONTRACT_GOVERNANCE_ROLE, governance, false);
        Ok(())
    }

    async fn handle_call(
        &mut self,
        ctx: &CallContext,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, ContractError> {
        let params = GLOBAL_ACCESS_CONTROL
            .method(method)
            .ok_or_else(|| ContractError::UnknownMethod(method.to_string()))?;
        check_args(method, params, &args)?;

        let role = args[0].as_str().unwrap_or_default();
        let account = args[1].as_address().unwrap_or_default();
        match method {
            "hasRole" => Ok(self.has_role(role, account).into()),
            "canGrant" => Ok(self.can_grant(role, account).into()),
            "grantRole" => {
                let delegable = args[2].as_bool().unwrap_or_default();
                let allowed = if delegable {
                    self.is_admin(ctx.caller)
                } else {
                    self.can_grant(role, ctx.caller)
                };
                if !allowed {
                    return Err(ContractError::Unauthorized {
                        caller: ctx.caller.to_string(),
                        action: format!("grant {role}"),
                    });
                }
                let changed = self.grant(role, account, delegable);
                if changed {
                    info!(%role, %account, delegable, "Role granted");
                }
                Ok(changed.into())
            }
            _ => Err(ContractError::UnknownMethod(method.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::roles::{KEEPER_ROLE, TREASURY_OPERATIONS_ROLE};

    fn ctx(caller: Address) -> CallContext {
        CallContext {
            caller,
            this: Address::derive("gac"),
        }
    }

    async fn gac(governance: Address) -> GlobalAccessControl {
        let mut gac = GlobalAccessControl::default();
        gac.initialize(&ctx(governance), vec![governance.into()]).await.unwrap();
        gac
    }

    fn grant(role: &str, account: Address, delegable: bool) -> Vec<Value> {
        vec![role.into(), account.into(), delegable.into()]
    }

    #[tokio::test]
    async fn test_governance_is_admin_after_setup() {
        let governance = Address::derive("governance");
        let gac = gac(governance).await;
        assert!(gac.has_role(DEFAULT_ADMIN_ROLE, governance));
        assert!(gac.has_role(CONTRACT_GOVERNANCE_ROLE, governance));
        assert!(gac.can_grant(KEEPER_ROLE, governance));
    }

    #[tokio::test]
    async fn test_grant_is_idempotent() {
        let governance = Address::derive("governance");
        let keeper = Address::derive("keeper");
        let mut gac = gac(governance).await;

        let first = gac
            .handle_call(&ctx(governance), "grantRole", grant(KEEPER_ROLE, keeper, false))
            .await
            .unwrap();
        let second = gac
            .handle_call(&ctx(governance), "grantRole", grant(KEEPER_ROLE, keeper, false))
            .await
            .unwrap();
        assert_eq!(first, Value::Bool(true));
        assert_eq!(second, Value::Bool(false));
        assert!(gac.has_role(KEEPER_ROLE, keeper));
    }

    #[tokio::test]
    async fn test_delegates_grant_their_role_only() {
        let governance = Address::derive("governance");
        let treasury_ops = Address::derive("treasuryOps");
        let intern = Address::derive("intern");
        let mut gac = gac(governance).await;

        gac.handle_call(
            &ctx(governance),
            "grantRole",
            grant(TREASURY_OPERATIONS_ROLE, treasury_ops, true),
        )
        .await
        .unwrap();

        gac.handle_call(
            &ctx(treasury_ops),
            "grantRole",
            grant(TREASURY_OPERATIONS_ROLE, intern, false),
        )
        .await
        .unwrap();
        assert!(gac.has_role(TREASURY_OPERATIONS_ROLE, intern));

        let err = gac
            .handle_call(&ctx(treasury_ops), "grantRole", grant(KEEPER_ROLE, intern, false))
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized { .. }));

        let err = gac
            .handle_call(
                &ctx(treasury_ops),
                "grantRole",
                grant(TREASURY_OPERATIONS_ROLE, intern, true),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized { .. }));
    }
}
