//! # Dependency-Ordered Initializer
//!
//! Runs initialization steps in the order given. The order is part of the plan, not
//! something computed here: before each step the initializer resolves its arguments and
//! checks that every component the step depends on is already initialized, so a
//! misordered plan fails at the first out-of-order step instead of wiring a component to
//! something half set up.
//!
//! The first failure ends the run. Nothing is rolled back; the report shows what was
//! applied before the failure.

use crate::error::{BootstrapError, Reference, Result};
use crate::model::{ArgExpr, InitializationStep, SignerTable, StepAction};
use crate::params::ParameterSet;
use crate::registry::{ComponentInstance, Registry};
use crate::report::{ReportEntry, RunReport};
use component_framework::{Address, Value};
use tracing::{debug, error, info, instrument};

/// Executes initialization steps against a registry.
pub struct Initializer<'a> {
    registry: &'a Registry,
    params: &'a ParameterSet,
    signers: &'a SignerTable,
}

impl<'a> Initializer<'a> {
    pub fn new(registry: &'a Registry, params: &'a ParameterSet, signers: &'a SignerTable) -> Self {
        Self {
            registry,
            params,
            signers,
        }
    }

    /// Runs `steps` into a fresh report. Check [`RunReport::failure`] for the outcome.
    pub async fn run(&self, steps: &[InitializationStep]) -> RunReport {
        let mut report = RunReport::new();
        // The error is the report's final entry.
        let _ = self.run_into(steps, &mut report).await;
        report
    }

    /// Runs `steps`, appending one entry per attempted step to `report`.
    #[instrument(name = "initialize", skip_all, fields(steps = steps.len()))]
    pub async fn run_into(&self, steps: &[InitializationStep], report: &mut RunReport) -> Result<()> {
        for step in steps {
            let description = step.description();
            match self.execute(step, &description).await {
                Ok(address) => {
                    info!(step = %description, %address, "Step applied");
                    report.append(ReportEntry::success(&description, Some(step.target.as_str()), Some(address)));
                }
                Err(e) => {
                    error!(step = %description, error = %e, "Step failed, stopping run");
                    report.append(ReportEntry::failure(&description, Some(step.target.as_str()), e.clone()));
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    async fn execute(&self, step: &InitializationStep, description: &str) -> Result<Address> {
        let target = self.lookup(&step.target, description)?;
        let caller = match &step.caller {
            Some(role) => self.signer(role, description)?,
            None => self.signers.deployer(),
        };

        let mut args = Vec::with_capacity(step.args.len());
        for arg in &step.args {
            args.push(self.resolve_arg(arg, description).await?);
        }
        debug!(step = %description, %caller, ?args, "Resolved arguments");

        let client = target
            .client()
            .ok_or_else(|| BootstrapError::ComponentCallFailed {
                component: target.name.clone(),
                cause: format!("no component hosted at {}", target.address),
            })?;

        let result = match &step.action {
            StepAction::Initialize => client.initialize(caller, args).await,
            StepAction::Invoke(method) => client.call(caller, method.as_str(), args).await.map(|_| ()),
        };
        result.map_err(|e| BootstrapError::from_call(&target.name, description, e))?;

        Ok(target.address)
    }

    async fn resolve_arg(&self, arg: &ArgExpr, description: &str) -> Result<Value> {
        match arg {
            ArgExpr::Literal(value) => Ok(value.clone()),
            ArgExpr::Param(name) => {
                self.params
                    .value(name)
                    .ok_or_else(|| BootstrapError::UnresolvedReference {
                        step: description.to_string(),
                        reference: Reference::Parameter(name.clone()),
                    })
            }
            ArgExpr::Component(name) => {
                let instance = self.lookup(name, description)?;
                self.require_initialized(instance, description).await?;
                Ok(instance.address.into())
            }
            ArgExpr::Forward(name) => Ok(self.lookup(name, description)?.address.into()),
            ArgExpr::Optional(name) => match self.registry.get(name) {
                Some(instance) => {
                    self.require_initialized(instance, description).await?;
                    Ok(instance.address.into())
                }
                None => {
                    debug!(step = %description, component = %name, "Optional component not registered, passing zero address");
                    Ok(Address::ZERO.into())
                }
            },
            ArgExpr::Signer(role) => Ok(self.signer(role, description)?.into()),
        }
    }

    fn lookup(&self, name: &str, description: &str) -> Result<&'a ComponentInstance> {
        self.registry
            .get(name)
            .ok_or_else(|| BootstrapError::UnresolvedReference {
                step: description.to_string(),
                reference: Reference::Component(name.to_string()),
            })
    }

    fn signer(&self, role: &str, description: &str) -> Result<Address> {
        self.signers
            .get(role)
            .ok_or_else(|| BootstrapError::UnresolvedReference {
                step: description.to_string(),
                reference: Reference::Signer(role.to_string()),
            })
    }

    async fn require_initialized(&self, instance: &ComponentInstance, description: &str) -> Result<()> {
        let initialized = instance
            .is_initialized()
            .await
            .map_err(|e| BootstrapError::from_call(&instance.name, description, e))?;
        if !initialized {
            return Err(BootstrapError::ComponentNotInitialized {
                component: instance.name.clone(),
                required_by: description.to_string(),
            });
        }
        Ok(())
    }
}
