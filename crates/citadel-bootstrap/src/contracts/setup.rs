//! Argument-checked components whose only observable behaviour is their setup.
//!
//! A [`Signature`] lists the initializer arguments and post-setup methods of one
//! component kind. [`SetupContract`] checks every call against it and remembers what it
//! was set up with, which is all the orchestrator (and its tests) can observe.

use super::ContractError;
use async_trait::async_trait;
use component_framework::{Address, CallContext, Component, Value};
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use tracing::debug;
use ParamKind::{Bool, Bytes32, OptionalAddress, PositiveUint, Str, Uint, Uints};

/// Expected shape of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A non-zero address.
    Address,
    /// An address where zero means "disabled".
    OptionalAddress,
    Uint,
    /// A strictly positive amount or duration.
    PositiveUint,
    /// A non-empty string.
    Str,
    Bool,
    /// Exactly `n` unsigned integers.
    Uints(usize),
    /// `0x` followed by 64 hex digits.
    Bytes32,
}

impl Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Address => f.write_str("address"),
            ParamKind::OptionalAddress => f.write_str("address or zero"),
            ParamKind::Uint => f.write_str("uint"),
            ParamKind::PositiveUint => f.write_str("positive uint"),
            ParamKind::Str => f.write_str("string"),
            ParamKind::Bool => f.write_str("bool"),
            ParamKind::Uints(n) => write!(f, "list of {n} uints"),
            ParamKind::Bytes32 => f.write_str("bytes32"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
}

const fn param(name: &'static str, kind: ParamKind) -> Param {
    Param { name, kind }
}

/// Initializer and post-setup method signatures of one component kind.
#[derive(Debug)]
pub struct Signature {
    pub kind: &'static str,
    pub initialize: &'static [Param],
    pub methods: &'static [(&'static str, &'static [Param])],
}

impl Signature {
    pub fn method(&self, name: &str) -> Option<&'static [Param]> {
        self.methods
            .iter()
            .find(|(method, _)| *method == name)
            .map(|(_, params)| *params)
    }
}

pub static GLOBAL_ACCESS_CONTROL: Signature = Signature {
    kind: "GlobalAccessControl",
    initialize: &[param("initialGovernance", ParamKind::Address)],
    methods: &[
        ("hasRole", &[param("role", Str), param("account", ParamKind::Address)]),
        ("canGrant", &[param("role", Str), param("grantor", ParamKind::Address)]),
        (
            "grantRole",
            &[param("role", Str), param("account", ParamKind::Address), param("delegable", Bool)],
        ),
    ],
};

pub static CITADEL_TOKEN: Signature = Signature {
    kind: "CitadelToken",
    initialize: &[
        param("name", Str),
        param("symbol", Str),
        param("gac", ParamKind::Address),
    ],
    methods: &[],
};

pub static STAKED_CITADEL: Signature = Signature {
    kind: "StakedCitadel",
    initialize: &[
        param("token", ParamKind::Address),
        param("governance", ParamKind::Address),
        param("keeper", ParamKind::Address),
        param("guardian", ParamKind::Address),
        param("treasury", ParamKind::Address),
        param("strategist", ParamKind::Address),
        param("badgerTree", ParamKind::Address),
        param("vesting", ParamKind::Address),
        param("name", Str),
        param("symbol", Str),
        param("feeConfig", Uints(4)),
    ],
    methods: &[],
};

pub static STAKED_CITADEL_VESTER: Signature = Signature {
    kind: "StakedCitadelVester",
    initialize: &[
        param("gac", ParamKind::Address),
        param("vestingToken", ParamKind::Address),
        param("vault", ParamKind::Address),
    ],
    methods: &[],
};

pub static STAKED_CITADEL_LOCKER: Signature = Signature {
    kind: "StakedCitadelLocker",
    initialize: &[
        param("stakingToken", ParamKind::Address),
        param("name", Str),
        param("symbol", Str),
    ],
    methods: &[(
        "addReward",
        &[
            param("rewardsToken", ParamKind::Address),
            param("distributor", ParamKind::Address),
            param("useBoost", Bool),
        ],
    )],
};

pub static SUPPLY_SCHEDULE: Signature = Signature {
    kind: "SupplySchedule",
    initialize: &[param("gac", ParamKind::Address)],
    methods: &[],
};

pub static CITADEL_MINTER: Signature = Signature {
    kind: "CitadelMinter",
    initialize: &[
        param("gac", ParamKind::Address),
        param("citadelToken", ParamKind::Address),
        param("xCitadel", ParamKind::Address),
        param("xCitadelLocker", ParamKind::Address),
        param("supplySchedule", ParamKind::Address),
    ],
    methods: &[],
};

pub static KNIGHTING_ROUND: Signature = Signature {
    kind: "KnightingRound",
    initialize: &[
        param("gac", ParamKind::Address),
        param("tokenOut", ParamKind::Address),
        param("tokenIn", ParamKind::Address),
        param("saleStart", PositiveUint),
        param("saleDuration", PositiveUint),
        param("tokenOutPrice", PositiveUint),
        param("saleRecipient", ParamKind::Address),
        param("guestlist", OptionalAddress),
        param("tokenInLimit", PositiveUint),
    ],
    methods: &[],
};

pub static KNIGHTING_ROUND_GUESTLIST: Signature = Signature {
    kind: "KnightingRoundGuestlist",
    initialize: &[param("gac", ParamKind::Address)],
    methods: &[("setGuestRoot", &[param("guestRoot", Bytes32)])],
};

pub static FUNDING: Signature = Signature {
    kind: "Funding",
    initialize: &[
        param("gac", ParamKind::Address),
        param("citadel", ParamKind::Address),
        param("asset", ParamKind::Address),
        param("xCitadel", ParamKind::Address),
        param("saleRecipient", ParamKind::Address),
        param("citadelPriceInAssetOracle", ParamKind::Address),
        param("assetCap", PositiveUint),
    ],
    methods: &[],
};

pub static ERC20: Signature = Signature {
    kind: "ERC20",
    initialize: &[param("name", Str), param("symbol", Str), param("decimals", Uint)],
    methods: &[],
};

/// Checks `args` against `params`, naming the first offending argument.
pub fn check_args(method: &str, params: &[Param], args: &[Value]) -> Result<(), ContractError> {
    if params.len() != args.len() {
        return Err(ContractError::Arity {
            method: method.to_string(),
            expected: params.len(),
            got: args.len(),
        });
    }
    for (param, arg) in params.iter().zip(args) {
        check_arg(method, param, arg)?;
    }
    Ok(())
}

fn check_arg(method: &str, param: &Param, arg: &Value) -> Result<(), ContractError> {
    let mismatch = || ContractError::ArgumentType {
        method: method.to_string(),
        name: param.name.to_string(),
        expected: param.kind.to_string(),
        got: arg.kind(),
    };
    let invalid = |reason: &str| ContractError::InvalidArgument {
        method: method.to_string(),
        name: param.name.to_string(),
        reason: reason.to_string(),
    };

    match param.kind {
        ParamKind::Address => match arg.as_address() {
            Some(address) if address.is_zero() => Err(invalid("zero address")),
            Some(_) => Ok(()),
            None => Err(mismatch()),
        },
        ParamKind::OptionalAddress => arg.as_address().map(|_| ()).ok_or_else(mismatch),
        ParamKind::Uint => arg.as_uint().map(|_| ()).ok_or_else(mismatch),
        ParamKind::PositiveUint => match arg.as_uint() {
            Some(0) => Err(invalid("must be positive")),
            Some(_) => Ok(()),
            None => Err(mismatch()),
        },
        ParamKind::Str => match arg.as_str() {
            Some("") => Err(invalid("must not be empty")),
            Some(_) => Ok(()),
            None => Err(mismatch()),
        },
        ParamKind::Bool => arg.as_bool().map(|_| ()).ok_or_else(mismatch),
        ParamKind::Uints(n) => match arg.as_list() {
            Some(items) if items.len() == n && items.iter().all(|v| v.as_uint().is_some()) => Ok(()),
            _ => Err(mismatch()),
        },
        ParamKind::Bytes32 => match arg.as_str() {
            Some(text) if is_bytes32(text) => Ok(()),
            Some(_) => Err(invalid("must be 0x followed by 64 hex digits")),
            None => Err(mismatch()),
        },
    }
}

/// `0x` followed by exactly 32 hex-encoded bytes.
pub fn is_bytes32(text: &str) -> bool {
    text.strip_prefix("0x")
        .is_some_and(|digits| hex::decode_to_slice(digits, &mut [0u8; 32]).is_ok())
}

/// A component that validates and records its setup and configuration calls.
#[derive(Debug)]
pub struct SetupContract {
    signature: &'static Signature,
    settings: BTreeMap<&'static str, Value>,
    owner: Option<Address>,
}

impl SetupContract {
    pub fn new(signature: &'static Signature) -> Self {
        Self {
            signature,
            settings: BTreeMap::new(),
            owner: None,
        }
    }

    fn record(&mut self, params: &'static [Param], args: Vec<Value>) {
        for (param, arg) in params.iter().zip(args) {
            self.settings.insert(param.name, arg);
        }
    }
}

#[async_trait]
impl Component for SetupContract {
    type Error = ContractError;

    fn kind(&self) -> &str {
        self.signature.kind
    }

    async fn initialize(&mut self, ctx: &CallContext, args: Vec<Value>) -> Result<(), ContractError> {
        check_args("initialize", self.signature.initialize, &args)?;
        self.owner = Some(ctx.caller);
        self.record(self.signature.initialize, args);
        Ok(())
    }

    async fn handle_call(
        &mut self,
        ctx: &CallContext,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, ContractError> {
        match method {
            // Reads back a recorded argument, by parameter name.
            "setting" => {
                let name = args.first().and_then(Value::as_str).unwrap_or_default();
                self.settings
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ContractError::InvalidArgument {
                        method: method.to_string(),
                        name: "name".to_string(),
                        reason: format!("no setting named `{name}`"),
                    })
            }
            "owner" => Ok(self.owner.unwrap_or(Address::ZERO).into()),
            _ => {
                let params = self
                    .signature
                    .method(method)
                    .ok_or_else(|| ContractError::UnknownMethod(method.to_string()))?;
                check_args(method, params, &args)?;
                debug!(kind = self.signature.kind, this = %ctx.this, %method, "Configured");
                self.record(params, args);
                Ok(Value::Bool(true))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> CallContext {
        CallContext {
            caller: Address::derive("governance"),
            this: Address::derive("knightingRound"),
        }
    }

    fn knighting_round_args(guestlist: Address) -> Vec<Value> {
        vec![
            Address::derive("gac").into(),
            Address::derive("citadel").into(),
            Address::derive("wbtc").into(),
            Value::Uint(1_700_000_000),
            Value::Uint(1_209_600),
            Value::Uint(21 * 10u128.pow(18)),
            Address::derive("treasuryVault").into(),
            guestlist.into(),
            Value::Uint(100 * 10u128.pow(8)),
        ]
    }

    #[tokio::test]
    async fn test_zero_guestlist_means_disabled() {
        let mut round = SetupContract::new(&KNIGHTING_ROUND);
        round.initialize(&ctx(), knighting_round_args(Address::ZERO)).await.unwrap();
        let guestlist = round
            .handle_call(&ctx(), "setting", vec!["guestlist".into()])
            .await
            .unwrap();
        assert_eq!(guestlist, Value::Address(Address::ZERO));
    }

    #[tokio::test]
    async fn test_rejects_zero_required_address() {
        let mut args = knighting_round_args(Address::ZERO);
        args[0] = Address::ZERO.into();
        let err = SetupContract::new(&KNIGHTING_ROUND)
            .initialize(&ctx(), args)
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument { ref name, .. } if name == "gac"));
    }

    #[tokio::test]
    async fn test_rejects_wrong_arity_and_type() {
        let mut token = SetupContract::new(&CITADEL_TOKEN);
        let err = token.initialize(&ctx(), vec!["Citadel".into()]).await.unwrap_err();
        assert_eq!(
            err,
            ContractError::Arity {
                method: "initialize".into(),
                expected: 3,
                got: 1
            }
        );

        let err = token
            .initialize(&ctx(), vec!["Citadel".into(), "CTDL".into(), Value::Uint(1)])
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::ArgumentType { ref name, .. } if name == "gac"));
    }

    #[tokio::test]
    async fn test_post_setup_methods() {
        let mut guestlist = SetupContract::new(&KNIGHTING_ROUND_GUESTLIST);
        guestlist
            .initialize(&ctx(), vec![Address::derive("gac").into()])
            .await
            .unwrap();

        let root = "0xa792f206b3e190ce3670653ece23b5ffac811e402f37d3c6d37638e310c2b081";
        assert_eq!(
            guestlist.handle_call(&ctx(), "setGuestRoot", vec![root.into()]).await.unwrap(),
            Value::Bool(true)
        );
        assert!(guestlist
            .handle_call(&ctx(), "setGuestRoot", vec!["0x1234".into()])
            .await
            .is_err());
        assert_eq!(
            guestlist.handle_call(&ctx(), "mint", vec![]).await.unwrap_err(),
            ContractError::UnknownMethod("mint".into())
        );
        assert_eq!(
            guestlist.handle_call(&ctx(), "owner", vec![]).await.unwrap(),
            Value::Address(Address::derive("governance"))
        );
    }

    #[test]
    fn test_bytes32_check() {
        let root = format!("0x{}", "ab".repeat(32));
        assert!(is_bytes32(&root));
        assert!(!is_bytes32(&root[2..]));
        assert!(!is_bytes32(&format!("0x{}", "ab".repeat(31))));
        assert!(!is_bytes32(&format!("0x\u{e9}{}", "0".repeat(62))));
    }
}
