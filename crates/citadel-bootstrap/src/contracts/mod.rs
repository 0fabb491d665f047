//! # Citadel Components
//!
//! In-process stand-ins for the protocol's contracts. Their business logic is out of
//! scope; what matters to the orchestrator is that each one honours the one-time setup
//! contract, checks its argument list the way the real initializer signature would, and
//! answers the calls the deployment makes afterwards.

pub mod access_control;
pub mod roles;
pub mod setup;

pub use access_control::GlobalAccessControl;
pub use setup::{ParamKind, SetupContract, Signature};

use component_framework::{ComponentFactory, Factory, ValueKind};
use std::sync::Arc;
use thiserror::Error;

/// Rejections raised by a component's own argument and permission checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("{method}: expected {expected} arguments, got {got}")]
    Arity {
        method: String,
        expected: usize,
        got: usize,
    },
    #[error("{method}: argument `{name}` must be {expected}, got {got}")]
    ArgumentType {
        method: String,
        name: String,
        expected: String,
        got: ValueKind,
    },
    #[error("{method}: invalid argument `{name}`: {reason}")]
    InvalidArgument {
        method: String,
        name: String,
        reason: String,
    },
    #[error("{caller} is not allowed to {action}")]
    Unauthorized { caller: String, action: String },
    #[error("unknown method: {0}")]
    UnknownMethod(String),
}

/// Every component kind a Citadel deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
    GlobalAccessControl,
    CitadelToken,
    StakedCitadel,
    StakedCitadelVester,
    StakedCitadelLocker,
    SupplySchedule,
    CitadelMinter,
    KnightingRound,
    KnightingRoundGuestlist,
    Funding,
    Erc20,
}

impl ContractKind {
    /// A factory deploying fresh, uninitialized instances of this kind.
    pub fn factory(self) -> Arc<dyn ComponentFactory> {
        match self {
            ContractKind::GlobalAccessControl => Arc::new(Factory::new(
                "GlobalAccessControl",
                GlobalAccessControl::default,
            )),
            kind => {
                let signature = kind.signature();
                Arc::new(Factory::new(signature.kind, move || SetupContract::new(signature)))
            }
        }
    }

    fn signature(self) -> &'static Signature {
        match self {
            ContractKind::GlobalAccessControl => &setup::GLOBAL_ACCESS_CONTROL,
            ContractKind::CitadelToken => &setup::CITADEL_TOKEN,
            ContractKind::StakedCitadel => &setup::STAKED_CITADEL,
            ContractKind::StakedCitadelVester => &setup::STAKED_CITADEL_VESTER,
            ContractKind::StakedCitadelLocker => &setup::STAKED_CITADEL_LOCKER,
            ContractKind::SupplySchedule => &setup::SUPPLY_SCHEDULE,
            ContractKind::CitadelMinter => &setup::CITADEL_MINTER,
            ContractKind::KnightingRound => &setup::KNIGHTING_ROUND,
            ContractKind::KnightingRoundGuestlist => &setup::KNIGHTING_ROUND_GUESTLIST,
            ContractKind::Funding => &setup::FUNDING,
            ContractKind::Erc20 => &setup::ERC20,
        }
    }
}
