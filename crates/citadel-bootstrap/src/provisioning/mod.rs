//! # Role Provisioning
//!
//! Applies role grants against the access-control component once everything is set up.
//!
//! Before the first grant the provisioner checks that the access-control component and
//! every component receiving a role are initialized. Grants then go out one at a time;
//! for each one the acting authority's right to grant is checked first (admin rights for
//! a delegable grant), so a missing right shows up as
//! [`BootstrapError::UnauthorizedGrantor`] on the exact grant instead of as an opaque
//! component rejection.
//!
//! Grants are idempotent at the access-control component, which makes the whole grant set
//! safe to re-run from the start after a partial failure.

use crate::clients::AccessControlClient;
use crate::contracts::roles::DEFAULT_ADMIN_ROLE;
use crate::error::{BootstrapError, Reference, Result};
use crate::model::{Grantee, RoleGrant, SignerTable};
use crate::registry::{ComponentInstance, Registry};
use crate::report::{ReportEntry, RunReport};
use component_framework::{Address, FrameworkError};
use tracing::{error, info, instrument, warn};

const PRECONDITIONS: &str = "check provisioning preconditions";

/// Applies [`RoleGrant`]s as `authority` against the named access-control component.
pub struct RoleProvisioner<'a> {
    registry: &'a Registry,
    signers: &'a SignerTable,
    access_control: String,
    authority: Address,
}

impl<'a> RoleProvisioner<'a> {
    pub fn new(
        registry: &'a Registry,
        signers: &'a SignerTable,
        access_control: impl Into<String>,
        authority: Address,
    ) -> Self {
        Self {
            registry,
            signers,
            access_control: access_control.into(),
            authority,
        }
    }

    pub async fn provision(&self, grants: &[RoleGrant]) -> RunReport {
        let mut report = RunReport::new();
        // The error is the report's final entry.
        let _ = self.provision_into(grants, &mut report).await;
        report
    }

    /// Applies `grants`, appending one entry per grant (or one for a failed precondition).
    #[instrument(name = "provision", skip_all, fields(grants = grants.len(), authority = %self.authority))]
    pub async fn provision_into(&self, grants: &[RoleGrant], report: &mut RunReport) -> Result<()> {
        let access_control = match self.preconditions(grants).await {
            Ok(client) => client,
            Err(e) => {
                error!(error = %e, "Provisioning preconditions failed");
                report.append(ReportEntry::failure(
                    PRECONDITIONS,
                    Some(self.access_control.as_str()),
                    e.clone(),
                ));
                return Err(e);
            }
        };

        for grant in grants {
            let description = grant.description();
            match self.apply(&access_control, grant).await {
                Ok((account, newly_granted)) => {
                    let entry = ReportEntry::success(
                        &description,
                        Some(self.access_control.as_str()),
                        Some(account),
                    );
                    if newly_granted {
                        info!(role = %grant.role, %account, "Role granted");
                        report.append(entry);
                    } else {
                        info!(role = %grant.role, %account, "Role already held");
                        report.append(entry.with_note("already held"));
                    }
                }
                Err(e) => {
                    error!(grant = %description, error = %e, "Grant failed, stopping run");
                    report.append(ReportEntry::failure(
                        &description,
                        Some(self.access_control.as_str()),
                        e.clone(),
                    ));
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Checks every component involved is initialized, before any grant is sent.
    async fn preconditions(&self, grants: &[RoleGrant]) -> Result<AccessControlClient> {
        let gac = self.component(&self.access_control)?;
        self.require_initialized(gac).await?;

        for grant in grants {
            match &grant.grantee {
                Grantee::Component(name) => {
                    let instance = self.component(name)?;
                    self.require_initialized(instance).await?;
                }
                Grantee::Signer(role) => {
                    self.signer(role)?;
                }
                Grantee::Address(_) => {}
            }
        }

        let client = gac
            .client()
            .cloned()
            .ok_or_else(|| BootstrapError::ComponentCallFailed {
                component: gac.name.clone(),
                cause: format!("no component hosted at {}", gac.address),
            })?;
        Ok(AccessControlClient::new(client, self.authority))
    }

    async fn apply(&self, gac: &AccessControlClient, grant: &RoleGrant) -> Result<(Address, bool)> {
        let account = self.grantee_address(&grant.grantee)?;
        let call_failed = |e: FrameworkError| BootstrapError::from_call(&self.access_control, &grant.description(), e);

        // A delegable grant hands out granting rights, which only an admin may do.
        let allowed = if grant.delegable {
            gac.has_role(DEFAULT_ADMIN_ROLE, self.authority).await
        } else {
            gac.can_grant(&grant.role, self.authority).await
        };
        if !allowed.map_err(call_failed)? {
            warn!(role = %grant.role, authority = %self.authority, "Authority cannot grant role");
            return Err(BootstrapError::UnauthorizedGrantor {
                role: grant.role.clone(),
                authority: self.authority,
            });
        }

        let newly_granted = gac
            .grant_role(&grant.role, account, grant.delegable)
            .await
            .map_err(call_failed)?;
        Ok((account, newly_granted))
    }

    fn grantee_address(&self, grantee: &Grantee) -> Result<Address> {
        match grantee {
            Grantee::Component(name) => Ok(self.component(name)?.address),
            Grantee::Signer(role) => self.signer(role),
            Grantee::Address(address) => Ok(*address),
        }
    }

    fn component(&self, name: &str) -> Result<&'a ComponentInstance> {
        self.registry
            .get(name)
            .ok_or_else(|| BootstrapError::UnresolvedReference {
                step: PRECONDITIONS.to_string(),
                reference: Reference::Component(name.to_string()),
            })
    }

    fn signer(&self, role: &str) -> Result<Address> {
        self.signers
            .get(role)
            .ok_or_else(|| BootstrapError::UnresolvedReference {
                step: PRECONDITIONS.to_string(),
                reference: Reference::Signer(role.to_string()),
            })
    }

    async fn require_initialized(&self, instance: &ComponentInstance) -> Result<()> {
        let initialized = instance
            .is_initialized()
            .await
            .map_err(|e| BootstrapError::from_call(&instance.name, PRECONDITIONS, e))?;
        if !initialized {
            return Err(BootstrapError::ComponentNotInitialized {
                component: instance.name.clone(),
                required_by: PRECONDITIONS.to_string(),
            });
        }
        Ok(())
    }
}
