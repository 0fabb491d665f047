//! Initialization steps and the typed argument expressions they are built from.

use crate::error::{BootstrapError, Reference, Result};
use crate::model::SignerTable;
use crate::params::ParameterSet;
use crate::registry::Registry;
use component_framework::Value;

/// One argument of a step, resolved just before the step runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgExpr {
    /// A fixed value.
    Literal(Value),
    /// A value from the resolved [`ParameterSet`](crate::params::ParameterSet).
    Param(String),
    /// The address of a component that must already be initialized.
    Component(String),
    /// The address of a registered component that may not be initialized yet.
    ///
    /// Only for cycles the protocol itself has (a vault that must know its vester before
    /// the vester knows the vault); everything else should use [`ArgExpr::Component`].
    Forward(String),
    /// Like [`ArgExpr::Component`], but resolves to the zero address when the component
    /// was never registered. Zero means "disabled" to the receiving component.
    Optional(String),
    /// The address of a signer from the signer table.
    Signer(String),
}

impl ArgExpr {
    pub fn literal(value: impl Into<Value>) -> Self {
        ArgExpr::Literal(value.into())
    }

    pub fn param(name: impl Into<String>) -> Self {
        ArgExpr::Param(name.into())
    }

    pub fn component(name: impl Into<String>) -> Self {
        ArgExpr::Component(name.into())
    }

    pub fn forward(name: impl Into<String>) -> Self {
        ArgExpr::Forward(name.into())
    }

    pub fn optional(name: impl Into<String>) -> Self {
        ArgExpr::Optional(name.into())
    }

    pub fn signer(role: impl Into<String>) -> Self {
        ArgExpr::Signer(role.into())
    }

    /// The component this argument points at, if any.
    pub fn component_ref(&self) -> Option<&str> {
        match self {
            ArgExpr::Component(name) | ArgExpr::Forward(name) | ArgExpr::Optional(name) => {
                Some(name)
            }
            _ => None,
        }
    }
}

/// What a step does to its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// The one-time setup call.
    Initialize,
    /// A named post-setup call (`addReward`, `setGuestRoot`, …).
    Invoke(String),
}

/// A setup or configuration call against one registered component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializationStep {
    pub target: String,
    pub action: StepAction,
    /// Signer the call is made as; `None` means the deployer.
    pub caller: Option<String>,
    pub args: Vec<ArgExpr>,
}

impl InitializationStep {
    pub fn init(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            action: StepAction::Initialize,
            caller: None,
            args: Vec::new(),
        }
    }

    pub fn invoke(target: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            action: StepAction::Invoke(method.into()),
            caller: None,
            args: Vec::new(),
        }
    }

    pub fn caller(mut self, signer: impl Into<String>) -> Self {
        self.caller = Some(signer.into());
        self
    }

    pub fn arg(mut self, arg: ArgExpr) -> Self {
        self.args.push(arg);
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = ArgExpr>) -> Self {
        self.args.extend(args);
        self
    }

    /// `initialize <target>` or `<target>.<method>`.
    pub fn description(&self) -> String {
        match &self.action {
            StepAction::Initialize => format!("initialize {}", self.target),
            StepAction::Invoke(method) => format!("{}.{}", self.target, method),
        }
    }

    /// Every component name the step mentions, target first.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.target.as_str()).chain(
            self.args
                .iter()
                .filter(|arg| !matches!(arg, ArgExpr::Optional(_)))
                .filter_map(ArgExpr::component_ref),
        )
    }

    /// Checks that every parameter and signer the step names exists.
    ///
    /// Needs no registry, so a whole plan can be checked before anything is deployed.
    pub fn check_inputs(&self, params: &ParameterSet, signers: &SignerTable) -> Result<()> {
        let unresolved = |reference| BootstrapError::UnresolvedReference {
            step: self.description(),
            reference,
        };
        if let Some(caller) = &self.caller {
            if signers.get(caller).is_none() {
                return Err(unresolved(Reference::Signer(caller.clone())));
            }
        }
        for arg in &self.args {
            match arg {
                ArgExpr::Param(name) if params.value(name).is_none() => {
                    return Err(unresolved(Reference::Parameter(name.clone())));
                }
                ArgExpr::Signer(role) if signers.get(role).is_none() => {
                    return Err(unresolved(Reference::Signer(role.clone())));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Checks that every component the step mentions is registered.
    ///
    /// Optional references are exempt. This is the definition-time check; the
    /// initializer re-resolves everything right before the step runs.
    pub fn check_defined(&self, registry: &Registry) -> Result<()> {
        for name in self.references() {
            if !registry.contains(name) {
                return Err(BootstrapError::UnresolvedReference {
                    step: self.description(),
                    reference: Reference::Component(name.to_string()),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description() {
        assert_eq!(InitializationStep::init("gac").description(), "initialize gac");
        assert_eq!(
            InitializationStep::invoke("xCitadelLocker", "addReward").description(),
            "xCitadelLocker.addReward"
        );
    }

    #[test]
    fn test_references_skip_optional_and_non_components() {
        let step = InitializationStep::init("knightingRound")
            .caller("governance")
            .arg(ArgExpr::component("gac"))
            .arg(ArgExpr::signer("treasuryVault"))
            .arg(ArgExpr::param("start"))
            .arg(ArgExpr::forward("vester"))
            .arg(ArgExpr::optional("guestlist"))
            .arg(ArgExpr::literal(7u64));
        let refs: Vec<&str> = step.references().collect();
        assert_eq!(refs, vec!["knightingRound", "gac", "vester"]);
        assert_eq!(step.caller.as_deref(), Some("governance"));
    }

    #[test]
    fn test_check_inputs_names_missing_parameter_and_signer() {
        let raw = crate::config::BootstrapConfig::local().unwrap().parameters;
        let params = crate::params::resolve(&raw, chrono::Utc::now()).unwrap();
        let signers = SignerTable::local(["governance"]);

        let step = InitializationStep::init("fundingWbtc")
            .caller("governance")
            .arg(ArgExpr::param("funding_caps.fundingWbtc"))
            .arg(ArgExpr::component("gac"));
        step.check_inputs(&params, &signers).unwrap();

        let step = step.arg(ArgExpr::param("funding_caps.fundingEth"));
        assert_eq!(
            step.check_inputs(&params, &signers),
            Err(BootstrapError::UnresolvedReference {
                step: "initialize fundingWbtc".into(),
                reference: Reference::Parameter("funding_caps.fundingEth".into()),
            })
        );

        let step = InitializationStep::init("gac").arg(ArgExpr::signer("keeper"));
        assert!(matches!(
            step.check_inputs(&params, &signers),
            Err(BootstrapError::UnresolvedReference { reference: Reference::Signer(_), .. })
        ));
    }
}
