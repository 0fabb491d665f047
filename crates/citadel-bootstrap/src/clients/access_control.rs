//! Client for the Global Access Control component.

use component_framework::{Address, ComponentClient, FrameworkError, Value};
use tracing::instrument;

/// Role queries and grants against the access-control component, made as one acting
/// address.
#[derive(Debug, Clone)]
pub struct AccessControlClient {
    client: ComponentClient,
    acting_as: Address,
}

impl AccessControlClient {
    pub fn new(client: ComponentClient, acting_as: Address) -> Self {
        Self { client, acting_as }
    }

    #[instrument(skip(self), fields(gac = %self.client.address()))]
    pub async fn has_role(&self, role: &str, account: Address) -> Result<bool, FrameworkError> {
        let reply = self
            .client
            .call(self.acting_as, "hasRole", vec![role.into(), account.into()])
            .await?;
        expect_bool("hasRole", reply)
    }

    /// Whether `grantor` may grant `role` (holds the admin role, or is a delegate).
    #[instrument(skip(self), fields(gac = %self.client.address()))]
    pub async fn can_grant(&self, role: &str, grantor: Address) -> Result<bool, FrameworkError> {
        let reply = self
            .client
            .call(self.acting_as, "canGrant", vec![role.into(), grantor.into()])
            .await?;
        expect_bool("canGrant", reply)
    }

    /// Grants `role` to `account`. Returns `false` when the role was already held.
    #[instrument(skip(self), fields(gac = %self.client.address()))]
    pub async fn grant_role(
        &self,
        role: &str,
        account: Address,
        delegable: bool,
    ) -> Result<bool, FrameworkError> {
        let reply = self
            .client
            .call(
                self.acting_as,
                "grantRole",
                vec![role.into(), account.into(), delegable.into()],
            )
            .await?;
        expect_bool("grantRole", reply)
    }
}

fn expect_bool(method: &str, reply: Value) -> Result<bool, FrameworkError> {
    reply
        .as_bool()
        .ok_or_else(|| FrameworkError::InvalidResponse {
            method: method.to_string(),
            detail: format!("expected bool, got {}", reply.kind()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use component_framework::mock::MockClient;

    #[tokio::test]
    async fn test_non_bool_reply_is_invalid_response() {
        let mut mock = MockClient::new("GlobalAccessControl");
        mock.expect_call("hasRole").return_ok(Value::Uint(1));

        let gac = AccessControlClient::new(mock.client(), Address::derive("governance"));
        let err = gac.has_role("KEEPER_ROLE", Address::derive("keeper")).await.unwrap_err();
        assert!(matches!(err, FrameworkError::InvalidResponse { ref method, .. } if method == "hasRole"));
        mock.verify();
    }

    #[tokio::test]
    async fn test_grant_role_sends_role_account_and_flag() {
        let mut mock = MockClient::new("GlobalAccessControl");
        mock.expect_call("grantRole").return_ok(Value::Bool(true));

        let governance = Address::derive("governance");
        let keeper = Address::derive("keeper");
        let gac = AccessControlClient::new(mock.client(), governance);
        assert!(gac.grant_role("KEEPER_ROLE", keeper, false).await.unwrap());

        let received = mock.received();
        assert_eq!(received[0].caller, Some(governance));
        assert_eq!(
            received[0].args,
            vec![Value::from("KEEPER_ROLE"), Value::from(keeper), Value::from(false)]
        );
    }
}
