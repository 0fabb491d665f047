//! # Parameter Resolver
//!
//! Turns the raw parameter table (offsets, durations, decimal amounts) into the
//! immutable [`ParameterSet`] the initializer consumes. Resolution is a pure function of
//! its inputs and the current time; it never calls a component, so a bad parameter is
//! caught before anything is deployed.

use crate::error::{BootstrapError, Result};
use chrono::{DateTime, Utc};
use component_framework::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A decimal amount plus the token decimals it is expressed in, e.g. `"21"` at 18.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Amount {
    pub amount: String,
    pub decimals: u8,
}

impl Amount {
    pub fn new(amount: impl Into<String>, decimals: u8) -> Self {
        Self {
            amount: amount.into(),
            decimals,
        }
    }
}

/// Unvalidated inputs from the config layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawParameters {
    /// Seconds from now until the sale opens.
    pub start_offset_secs: i64,
    pub duration_secs: i64,
    /// Tokens per unit of the sale asset.
    pub price: Amount,
    /// Sale asset limit.
    pub cap: Amount,
    /// Per funding instance asset caps, keyed by instance name.
    #[serde(default)]
    pub funding_caps: BTreeMap<String, Amount>,
}

/// Validated, immutable constants of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSet {
    start: u64,
    duration: u64,
    price: u128,
    cap: u128,
    funding_caps: BTreeMap<String, u128>,
}

impl ParameterSet {
    /// Unix seconds; always after the `now` it was resolved against.
    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// In base units.
    pub fn price(&self) -> u128 {
        self.price
    }

    /// In base units.
    pub fn cap(&self) -> u128 {
        self.cap
    }

    pub fn funding_cap(&self, instance: &str) -> Option<u128> {
        self.funding_caps.get(instance).copied()
    }

    /// Looks a parameter up by the name steps refer to it with:
    /// `start`, `duration`, `price`, `cap` or `funding_caps.<instance>`.
    pub fn value(&self, name: &str) -> Option<Value> {
        match name {
            "start" => Some(Value::from(self.start)),
            "duration" => Some(Value::from(self.duration)),
            "price" => Some(Value::from(self.price)),
            "cap" => Some(Value::from(self.cap)),
            _ => name
                .strip_prefix("funding_caps.")
                .and_then(|instance| self.funding_cap(instance))
                .map(Value::from),
        }
    }
}

/// Validates `raw` against `now` and scales every amount to base units.
///
/// Fails with [`BootstrapError::InvalidParameter`] naming the first violated field.
pub fn resolve(raw: &RawParameters, now: DateTime<Utc>) -> Result<ParameterSet> {
    let now = now.timestamp();
    let start = now
        .checked_add(raw.start_offset_secs)
        .filter(|start| *start > now)
        .and_then(|start| u64::try_from(start).ok())
        .ok_or_else(|| {
            BootstrapError::invalid_parameter(
                "start",
                format!("offset {}s does not put start in the future", raw.start_offset_secs),
            )
        })?;

    let duration = u64::try_from(raw.duration_secs)
        .ok()
        .filter(|duration| *duration > 0)
        .ok_or_else(|| {
            BootstrapError::invalid_parameter(
                "duration",
                format!("must be positive, got {}", raw.duration_secs),
            )
        })?;

    let price = positive_amount("price", &raw.price)?;
    let cap = positive_amount("cap", &raw.cap)?;

    let funding_caps = raw
        .funding_caps
        .iter()
        .map(|(instance, amount)| {
            positive_amount(&format!("funding_caps.{instance}"), amount)
                .map(|cap| (instance.clone(), cap))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(ParameterSet {
        start,
        duration,
        price,
        cap,
        funding_caps,
    })
}

fn positive_amount(field: &str, amount: &Amount) -> Result<u128> {
    let value = parse_units(&amount.amount, amount.decimals)
        .map_err(|reason| BootstrapError::invalid_parameter(field, reason))?;
    if value == 0 {
        return Err(BootstrapError::invalid_parameter(field, "must be positive"));
    }
    Ok(value)
}

/// Scales a decimal string to base units: `parse_units("1.5", 8) == Ok(150_000_000)`.
pub fn parse_units(amount: &str, decimals: u8) -> std::result::Result<u128, String> {
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(format!("`{amount}` is not a decimal number"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(format!("`{amount}` is not a decimal number"));
    }
    if fraction.len() > usize::from(decimals) {
        return Err(format!("`{amount}` has more than {decimals} decimals"));
    }

    let overflow = || format!("`{amount}` overflows at {decimals} decimals");
    let scale = 10u128.checked_pow(u32::from(decimals)).ok_or_else(overflow)?;
    let whole = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().map_err(|_| overflow())?
    };
    let fraction = if fraction.is_empty() {
        0
    } else {
        let padding = 10u128
            .checked_pow((usize::from(decimals) - fraction.len()) as u32)
            .ok_or_else(overflow)?;
        fraction
            .parse::<u128>()
            .ok()
            .and_then(|f| f.checked_mul(padding))
            .ok_or_else(overflow)?
    };

    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn knighting_round() -> RawParameters {
        RawParameters {
            start_offset_secs: 1000,
            duration_secs: 14 * 24 * 3600,
            price: Amount::new("21", 18),
            cap: Amount::new("100", 8),
            funding_caps: BTreeMap::from([
                ("fundingWbtc".to_string(), Amount::new("100", 8)),
                ("fundingCvx".to_string(), Amount::new("100000", 18)),
            ]),
        }
    }

    fn field_of(err: BootstrapError) -> String {
        match err {
            BootstrapError::InvalidParameter { field, .. } => field,
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_scales_amounts() {
        let params = resolve(&knighting_round(), now()).unwrap();
        assert_eq!(params.start(), now().timestamp() as u64 + 1000);
        assert_eq!(params.duration(), 1_209_600);
        assert_eq!(params.price(), 21 * 10u128.pow(18));
        assert_eq!(params.cap(), 100 * 10u128.pow(8));
        assert_eq!(params.funding_cap("fundingCvx"), Some(100_000 * 10u128.pow(18)));
        assert_eq!(
            params.value("funding_caps.fundingWbtc"),
            Some(Value::Uint(100 * 10u128.pow(8)))
        );
        assert_eq!(params.value("funding_caps.fundingEth"), None);
        assert_eq!(params.value("unknown"), None);
    }

    #[test]
    fn test_negative_duration_names_field() {
        let mut raw = knighting_round();
        raw.duration_secs = -1;
        assert_eq!(field_of(resolve(&raw, now()).unwrap_err()), "duration");
    }

    #[test]
    fn test_start_must_be_strictly_in_the_future() {
        let mut raw = knighting_round();
        raw.start_offset_secs = 0;
        assert_eq!(field_of(resolve(&raw, now()).unwrap_err()), "start");
    }

    #[test]
    fn test_zero_price_and_caps_are_rejected() {
        let mut raw = knighting_round();
        raw.price = Amount::new("0.0", 18);
        assert_eq!(field_of(resolve(&raw, now()).unwrap_err()), "price");

        let mut raw = knighting_round();
        raw.cap = Amount::new("-100", 8);
        assert_eq!(field_of(resolve(&raw, now()).unwrap_err()), "cap");

        let mut raw = knighting_round();
        raw.funding_caps
            .insert("fundingCvx".into(), Amount::new("0", 18));
        assert_eq!(
            field_of(resolve(&raw, now()).unwrap_err()),
            "funding_caps.fundingCvx"
        );
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("1.5", 8), Ok(150_000_000));
        assert_eq!(parse_units(".25", 2), Ok(25));
        assert_eq!(parse_units("7", 0), Ok(7));
        assert!(parse_units("1.123", 2).is_err());
        assert!(parse_units("", 18).is_err());
        assert!(parse_units(".", 18).is_err());
        assert!(parse_units("1e18", 0).is_err());
        assert!(parse_units("1", 40).is_err());
    }

    proptest! {
        #[test]
        fn prop_valid_inputs_satisfy_every_predicate(
            offset in 1i64..1_000_000_000,
            duration in 1i64..1_000_000_000,
            price in 1u64..1_000_000_000_000,
            cap in 1u64..1_000_000_000_000,
            decimals in 0u8..=18,
        ) {
            let raw = RawParameters {
                start_offset_secs: offset,
                duration_secs: duration,
                price: Amount::new(price.to_string(), decimals),
                cap: Amount::new(cap.to_string(), decimals),
                funding_caps: BTreeMap::from([("funding".to_string(), Amount::new(cap.to_string(), decimals))]),
            };
            let params = resolve(&raw, now()).unwrap();
            prop_assert!(params.start() as i64 > now().timestamp());
            prop_assert!(params.duration() > 0);
            prop_assert!(params.price() > 0);
            prop_assert!(params.cap() > 0);
            prop_assert!(params.funding_cap("funding").unwrap() > 0);
        }

        #[test]
        fn prop_non_positive_duration_fails_on_duration(duration in i64::MIN..=0) {
            let mut raw = knighting_round();
            raw.duration_secs = duration;
            prop_assert_eq!(field_of(resolve(&raw, now()).unwrap_err()), "duration");
        }

        #[test]
        fn prop_non_future_start_fails_on_start(offset in -1_000_000_000i64..=0) {
            let mut raw = knighting_round();
            raw.start_offset_secs = offset;
            prop_assert_eq!(field_of(resolve(&raw, now()).unwrap_err()), "start");
        }
    }
}
