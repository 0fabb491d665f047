//! # Citadel Deployment Plan
//!
//! The concrete component set, step list and grant set of a fresh Citadel deployment.
//! Step order here is the dependency order; the initializer enforces it but never
//! reorders it.

use crate::config::BootstrapConfig;
use crate::contracts::roles::*;
use crate::contracts::ContractKind;
use crate::model::{ArgExpr, ComponentSpec, InitializationStep, RoleGrant};
use component_framework::{Address, Value};

/// Signer names every Citadel deployment refers to.
pub const REQUIRED_SIGNERS: &[&str] = &[
    "governance",
    "keeper",
    "guardian",
    "treasuryVault",
    "techOps",
    "treasuryOps",
    "citadelTree",
    "policyOps",
    "eoaOracle",
];

/// Name of the access-control component in the registry.
pub const ACCESS_CONTROL: &str = "gac";
const GUESTLIST: &str = "knightingRoundGuestlist";

/// An asset hosted at a fixed address before the run, standing in for a contract that
/// already exists on the target network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSeed {
    pub name: String,
    pub address: Address,
    pub args: Vec<Value>,
}

/// Everything one run does, in order.
#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    pub seeds: Vec<AssetSeed>,
    pub components: Vec<ComponentSpec>,
    pub steps: Vec<InitializationStep>,
    pub grants: Vec<RoleGrant>,
    /// Registry name of the access-control component grants go to.
    pub access_control: String,
    /// Signer the grants are made as.
    pub authority: String,
}

pub fn citadel_plan(config: &BootstrapConfig) -> DeploymentPlan {
    let seeds = if config.assets.seed_local {
        vec![
            AssetSeed {
                name: "wbtc".to_string(),
                address: config.assets.wbtc,
                args: vec!["Wrapped BTC".into(), "WBTC".into(), Value::Uint(8)],
            },
            AssetSeed {
                name: "cvx".to_string(),
                address: config.assets.cvx,
                args: vec!["Convex Token".into(), "CVX".into(), Value::Uint(18)],
            },
        ]
    } else {
        Vec::new()
    };

    DeploymentPlan {
        seeds,
        components: components(config),
        steps: steps(config),
        grants: grants(),
        access_control: ACCESS_CONTROL.to_string(),
        authority: "governance".to_string(),
    }
}

fn components(config: &BootstrapConfig) -> Vec<ComponentSpec> {
    let mut fresh = vec![
        (ACCESS_CONTROL, ContractKind::GlobalAccessControl),
        ("citadel", ContractKind::CitadelToken),
        ("xCitadel", ContractKind::StakedCitadel),
        ("xCitadelVester", ContractKind::StakedCitadelVester),
        ("xCitadelLocker", ContractKind::StakedCitadelLocker),
        ("schedule", ContractKind::SupplySchedule),
        ("citadelMinter", ContractKind::CitadelMinter),
        ("knightingRound", ContractKind::KnightingRound),
    ];
    if config.guestlist.enabled {
        fresh.push((GUESTLIST, ContractKind::KnightingRoundGuestlist));
    }
    fresh.push(("fundingWbtc", ContractKind::Funding));
    fresh.push(("fundingCvx", ContractKind::Funding));

    fresh
        .into_iter()
        .map(|(name, kind)| ComponentSpec::fresh(name, kind.factory()))
        .chain([
            ComponentSpec::attached("wbtc", config.assets.wbtc),
            ComponentSpec::attached("cvx", config.assets.cvx),
        ])
        .collect()
}

fn steps(config: &BootstrapConfig) -> Vec<InitializationStep> {
    let token = &config.token;
    let fees: Vec<Value> = token.fees.iter().map(|&fee| Value::from(fee)).collect();

    let mut steps = vec![
        InitializationStep::init(ACCESS_CONTROL)
            .caller("governance")
            .arg(ArgExpr::signer("governance")),
        InitializationStep::init("citadel").caller("governance").args([
            ArgExpr::literal(token.name.as_str()),
            ArgExpr::literal(token.symbol.as_str()),
            ArgExpr::component(ACCESS_CONTROL),
        ]),
        // The vault and its vester point at each other; the vault goes first.
        InitializationStep::init("xCitadel").caller("governance").args([
            ArgExpr::component("citadel"),
            ArgExpr::signer("governance"),
            ArgExpr::signer("keeper"),
            ArgExpr::signer("guardian"),
            ArgExpr::signer("treasuryVault"),
            ArgExpr::signer("techOps"),
            ArgExpr::signer("citadelTree"),
            ArgExpr::forward("xCitadelVester"),
            ArgExpr::literal(token.staked_name.as_str()),
            ArgExpr::literal(token.staked_symbol.as_str()),
            ArgExpr::literal(Value::List(fees)),
        ]),
        InitializationStep::init("xCitadelVester").caller("governance").args([
            ArgExpr::component(ACCESS_CONTROL),
            ArgExpr::component("citadel"),
            ArgExpr::component("xCitadel"),
        ]),
        InitializationStep::init("xCitadelLocker").caller("governance").args([
            ArgExpr::component("xCitadel"),
            ArgExpr::literal(token.locker_name.as_str()),
            ArgExpr::literal(token.locker_symbol.as_str()),
        ]),
        // The minter distributes locker rewards but needs the locker to set up.
        InitializationStep::invoke("xCitadelLocker", "addReward")
            .caller("governance")
            .args([
                ArgExpr::component("xCitadel"),
                ArgExpr::forward("citadelMinter"),
                ArgExpr::literal(true),
            ]),
        InitializationStep::init("schedule")
            .caller("governance")
            .arg(ArgExpr::component(ACCESS_CONTROL)),
        InitializationStep::init("citadelMinter").caller("governance").args([
            ArgExpr::component(ACCESS_CONTROL),
            ArgExpr::component("citadel"),
            ArgExpr::component("xCitadel"),
            ArgExpr::component("xCitadelLocker"),
            ArgExpr::component("schedule"),
        ]),
    ];

    if config.guestlist.enabled {
        steps.push(
            InitializationStep::init(GUESTLIST)
                .caller("governance")
                .arg(ArgExpr::component(ACCESS_CONTROL)),
        );
        if let Some(root) = &config.guestlist.root {
            steps.push(
                InitializationStep::invoke(GUESTLIST, "setGuestRoot")
                    .caller("techOps")
                    .arg(ArgExpr::literal(root.as_str())),
            );
        }
    }

    steps.push(
        InitializationStep::init("knightingRound").caller("governance").args([
            ArgExpr::component(ACCESS_CONTROL),
            ArgExpr::component("citadel"),
            ArgExpr::component("wbtc"),
            ArgExpr::param("start"),
            ArgExpr::param("duration"),
            ArgExpr::param("price"),
            ArgExpr::signer("treasuryVault"),
            ArgExpr::optional(GUESTLIST),
            ArgExpr::param("cap"),
        ]),
    );

    for (funding, asset) in [("fundingWbtc", "wbtc"), ("fundingCvx", "cvx")] {
        steps.push(InitializationStep::init(funding).args([
            ArgExpr::component(ACCESS_CONTROL),
            ArgExpr::component("citadel"),
            ArgExpr::component(asset),
            ArgExpr::component("xCitadel"),
            ArgExpr::signer("treasuryVault"),
            ArgExpr::signer("eoaOracle"),
            ArgExpr::param(format!("funding_caps.{funding}")),
        ]));
    }

    steps
}

fn grants() -> Vec<RoleGrant> {
    vec![
        RoleGrant::to_signer(CONTRACT_GOVERNANCE_ROLE, "governance"),
        RoleGrant::to_signer(TREASURY_GOVERNANCE_ROLE, "treasuryVault"),
        RoleGrant::to_signer(TECH_OPERATIONS_ROLE, "techOps"),
        RoleGrant::to_signer(TREASURY_OPERATIONS_ROLE, "treasuryOps").delegable(),
        RoleGrant::to_signer(POLICY_OPERATIONS_ROLE, "policyOps"),
        RoleGrant::to_component(CITADEL_MINTER_ROLE, "citadelMinter"),
        RoleGrant::to_signer(KEEPER_ROLE, "keeper"),
        RoleGrant::to_signer(PAUSER_ROLE, "guardian"),
        RoleGrant::to_signer(UNPAUSER_ROLE, "techOps"),
        RoleGrant::to_signer(BLOCKLIST_MANAGER_ROLE, "policyOps"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Source, StepAction};

    #[test]
    fn test_local_plan_shape() {
        let config = BootstrapConfig::local().unwrap();
        let plan = citadel_plan(&config);

        assert_eq!(plan.seeds.len(), 2);
        assert_eq!(plan.components.len(), 12);
        assert!(plan.components.iter().all(|spec| spec.name != GUESTLIST));
        assert!(matches!(
            plan.components.last().map(|spec| &spec.source),
            Some(Source::Attached(address)) if *address == config.assets.cvx
        ));
        assert_eq!(plan.steps.first().unwrap().description(), "initialize gac");
        assert_eq!(plan.steps.len(), 11);
        assert_eq!(plan.grants.len(), 10);
    }

    #[test]
    fn test_guestlist_adds_component_and_steps() {
        let mut config = BootstrapConfig::local().unwrap();
        config.guestlist.enabled = true;
        let plan = citadel_plan(&config);

        assert_eq!(plan.components.len(), 13);
        let set_root = plan
            .steps
            .iter()
            .find(|step| step.action == StepAction::Invoke("setGuestRoot".into()))
            .unwrap();
        assert_eq!(set_root.caller.as_deref(), Some("techOps"));
        assert_eq!(plan.steps.len(), 13);
    }

    #[test]
    fn test_every_required_signer_is_used() {
        let plan = citadel_plan(&BootstrapConfig::local().unwrap());
        for signer in REQUIRED_SIGNERS {
            let used = plan.steps.iter().any(|step| {
                step.args.contains(&ArgExpr::signer(*signer))
                    || step.caller.as_deref() == Some(*signer)
            }) || plan
                .grants
                .iter()
                .any(|grant| grant.grantee == crate::model::Grantee::Signer(signer.to_string()));
            assert!(used, "{signer} is never used");
        }
    }
}
