use crate::config::BootstrapConfig;
use crate::contracts::ContractKind;
use crate::error::{BootstrapError, Reference, Result};
use crate::initializer::Initializer;
use crate::model::{Grantee, SignerTable, Source};
use crate::params::{self, ParameterSet};
use crate::plan::{citadel_plan, DeploymentPlan};
use crate::provisioning::RoleProvisioner;
use crate::registry::Registry;
use crate::report::{ReportEntry, RunReport, RunSummary};
use chrono::{DateTime, Utc};
use tracing::{error, info, info_span, Instrument};

/// One forward-only Citadel bootstrap.
pub struct Bootstrap {
    plan: DeploymentPlan,
    signers: SignerTable,
    parameters: params::RawParameters,
}

/// A run that went all the way through.
#[derive(Debug)]
pub struct Deployment {
    pub registry: Registry,
    pub params: ParameterSet,
    pub summary: RunSummary,
}

/// A run that stopped at `error`.
#[derive(Debug)]
pub struct RunFailure {
    pub error: BootstrapError,
    pub summary: RunSummary,
    /// `None` when the run failed before any component existed.
    pub registry: Option<Registry>,
}

impl Bootstrap {
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            plan: citadel_plan(&config),
            signers: config.signers.to_table(),
            parameters: config.parameters,
        }
    }

    /// Replaces the Citadel plan, e.g. with a reduced one in tests.
    pub fn with_plan(mut self, plan: DeploymentPlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn plan(&self) -> &DeploymentPlan {
        &self.plan
    }

    pub fn signers(&self) -> &SignerTable {
        &self.signers
    }

    /// Runs every phase against `now`.
    pub async fn run(&self, now: DateTime<Utc>) -> std::result::Result<Deployment, Box<RunFailure>> {
        let span = info_span!("bootstrap", deployer = %self.signers.deployer());
        async {
            let params = match params::resolve(&self.parameters, now) {
                Ok(params) => params,
                Err(error) => {
                    error!(%error, "Parameters rejected, nothing deployed");
                    return Err(Box::new(RunFailure {
                        error,
                        summary: RunReport::new().finalize_rejected(),
                        registry: None,
                    }));
                }
            };
            info!(start = params.start(), duration = params.duration(), "Parameters resolved");

            let mut report = RunReport::new();
            if let Err(error) = self.check_inputs(&params, &mut report) {
                error!(%error, "Plan names a missing parameter or signer, nothing deployed");
                return Err(Box::new(RunFailure {
                    error,
                    summary: report.finalize(),
                    registry: None,
                }));
            }

            let mut registry = Registry::local(self.signers.deployer());
            match self.execute(&params, &mut registry, &mut report).await {
                Ok(()) => {
                    let summary = report.finalize().with_manifest(registry.manifest());
                    info!(steps = summary.entries.len(), "Bootstrap complete");
                    Ok(Deployment {
                        registry,
                        params,
                        summary,
                    })
                }
                Err(error) => {
                    let summary = report.finalize().with_manifest(registry.manifest());
                    error!(%error, steps = summary.entries.len(), "Bootstrap failed");
                    Err(Box::new(RunFailure {
                        error,
                        summary,
                        registry: Some(registry),
                    }))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        params: &ParameterSet,
        registry: &mut Registry,
        report: &mut RunReport,
    ) -> Result<()> {
        self.seed(registry, report).await?;
        self.populate(registry, report)?;

        for step in &self.plan.steps {
            if let Err(e) = step.check_defined(registry) {
                report.append(ReportEntry::failure(
                    step.description(),
                    Some(step.target.as_str()),
                    e.clone(),
                ));
                return Err(e);
            }
        }

        Initializer::new(registry, params, &self.signers)
            .run_into(&self.plan.steps, report)
            .await?;

        let authority = match self.signers.get(&self.plan.authority) {
            Some(authority) => authority,
            None => {
                let e = BootstrapError::UnresolvedReference {
                    step: "provision".to_string(),
                    reference: Reference::Signer(self.plan.authority.clone()),
                };
                report.append(ReportEntry::failure("provision", None, e.clone()));
                return Err(e);
            }
        };
        RoleProvisioner::new(registry, &self.signers, self.plan.access_control.as_str(), authority)
            .provision_into(&self.plan.grants, report)
            .await
    }

    /// Checks every parameter and signer the plan names, before anything is deployed.
    fn check_inputs(&self, params: &ParameterSet, report: &mut RunReport) -> Result<()> {
        for step in &self.plan.steps {
            if let Err(e) = step.check_inputs(params, &self.signers) {
                report.append(ReportEntry::failure(
                    step.description(),
                    Some(step.target.as_str()),
                    e.clone(),
                ));
                return Err(e);
            }
        }

        let signers = self.plan.grants.iter().filter_map(|grant| match &grant.grantee {
            Grantee::Signer(role) => Some(role.as_str()),
            _ => None,
        });
        for role in std::iter::once(self.plan.authority.as_str()).chain(signers) {
            if self.signers.get(role).is_none() {
                let e = BootstrapError::UnresolvedReference {
                    step: "provision".to_string(),
                    reference: Reference::Signer(role.to_string()),
                };
                report.append(ReportEntry::failure("provision", None, e.clone()));
                return Err(e);
            }
        }
        Ok(())
    }

    /// Hosts and sets up the pre-existing assets a fresh local node lacks.
    async fn seed(&self, registry: &mut Registry, report: &mut RunReport) -> Result<()> {
        let deployer = registry.deployer();
        for seed in &self.plan.seeds {
            let description = format!("seed {}", seed.name);
            let factory = ContractKind::Erc20.factory();
            let outcome = match registry.network_mut().deploy_at(seed.address, factory.as_ref()) {
                Ok(client) => client
                    .initialize(deployer, seed.args.clone())
                    .await
                    .map_err(|e| BootstrapError::from_call(&seed.name, &description, e)),
                Err(e) => Err(BootstrapError::ComponentCallFailed {
                    component: seed.name.clone(),
                    cause: e.to_string(),
                }),
            };
            match outcome {
                Ok(()) => report.append(ReportEntry::success(
                    description,
                    Some(seed.name.as_str()),
                    Some(seed.address),
                )),
                Err(e) => {
                    report.append(ReportEntry::failure(description, Some(seed.name.as_str()), e.clone()));
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Registers every component of the plan, one report entry each.
    fn populate(&self, registry: &mut Registry, report: &mut RunReport) -> Result<()> {
        for spec in &self.plan.components {
            let verb = match spec.source {
                Source::Fresh(_) => "deploy",
                Source::Attached(_) => "attach",
            };
            let description = format!("{verb} {}", spec.name);
            let name = spec.name.clone();
            match registry.register(spec.clone()) {
                Ok(instance) => {
                    let address = instance.address;
                    report.append(ReportEntry::success(description, Some(name.as_str()), Some(address)));
                }
                Err(e) => {
                    report.append(ReportEntry::failure(description, Some(name.as_str()), e.clone()));
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}
