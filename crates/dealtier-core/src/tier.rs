//! Tier numbers and tier-label parsing.
//!
//! A tier is an integer 1 (best fit) to 4 (reject). Configuration files key
//! their tables by labels like `tier_1`, `tier_2`, or `tier_1_extra`; parsing
//! those labels into integers is an explicit, fallible step rather than
//! last-character string slicing.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Suitability tier: 1 = best fit, 4 = reject.
///
/// `Ord` follows the numeric value, so `max()` picks the WORST tier. That is
/// the aggregation rule everywhere in this codebase: higher numbers encode
/// increasing disqualification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    pub const T1: Tier = Tier(1);
    pub const T2: Tier = Tier(2);
    pub const T3: Tier = Tier(3);
    pub const T4: Tier = Tier(4);

    /// The reject tier. Rows at this tier are filtered from presentation output.
    pub const REJECT: Tier = Tier::T4;

    /// Neutral fallback for rows with insufficient signal.
    pub const INSUFFICIENT_DATA: Tier = Tier::T3;

    pub fn new(value: u8) -> Result<Self, TierError> {
        match value {
            1..=4 => Ok(Tier(value)),
            _ => Err(TierError::OutOfRange(value)),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_reject(self) -> bool {
        self == Tier::REJECT
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Tier {
    type Error = TierError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tier::new(value)
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TierError {
    #[error("tier {0} out of range (expected 1..=4)")]
    OutOfRange(u8),
    #[error("malformed tier label {0:?} (expected tier_<1..4> with optional _extra suffix)")]
    BadLabel(String),
}

/// A parsed configuration table label: `tier_1`, `tier_3`, `tier_1_extra`.
///
/// The `extra` variant is a second limit row for the same tier number; it
/// scans after the plain row of that tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TierLabel {
    pub tier: Tier,
    pub extra: bool,
}

impl TierLabel {
    /// Parse a label like `tier_2` or `tier_1_extra`.
    ///
    /// Anything else is a declared error; configuration with a malformed
    /// label fails up front instead of silently misclassifying.
    pub fn parse(label: &str) -> Result<Self, TierError> {
        let bad = || TierError::BadLabel(label.to_string());

        let rest = label.strip_prefix("tier_").ok_or_else(bad)?;
        let (digit, extra) = match rest.strip_suffix("_extra") {
            Some(digit) => (digit, true),
            None => (rest, false),
        };
        let value: u8 = digit.parse().map_err(|_| bad())?;
        let tier = Tier::new(value).map_err(|_| bad())?;
        Ok(TierLabel { tier, extra })
    }

    /// Sort key: ascending tier, plain row before its `_extra` row.
    pub fn ordinal(self) -> u8 {
        self.tier.value() * 2 + self.extra as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_range_enforced() {
        assert!(Tier::new(1).is_ok());
        assert!(Tier::new(4).is_ok());
        assert_eq!(Tier::new(0), Err(TierError::OutOfRange(0)));
        assert_eq!(Tier::new(5), Err(TierError::OutOfRange(5)));
    }

    #[test]
    fn max_picks_worst() {
        assert_eq!(Tier::T1.max(Tier::T3), Tier::T3);
        assert_eq!(Tier::T4.max(Tier::T2), Tier::T4);
    }

    #[test]
    fn serde_as_plain_number() {
        let json = serde_json::to_string(&Tier::T2).unwrap();
        assert_eq!(json, "2");
        let parsed: Tier = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Tier::T3);
        assert!(serde_json::from_str::<Tier>("7").is_err());
    }

    #[test]
    fn parse_plain_labels() {
        for (label, tier) in [
            ("tier_1", Tier::T1),
            ("tier_2", Tier::T2),
            ("tier_3", Tier::T3),
            ("tier_4", Tier::T4),
        ] {
            let parsed = TierLabel::parse(label).unwrap();
            assert_eq!(parsed.tier, tier);
            assert!(!parsed.extra);
        }
    }

    #[test]
    fn parse_extra_label() {
        let parsed = TierLabel::parse("tier_1_extra").unwrap();
        assert_eq!(parsed.tier, Tier::T1);
        assert!(parsed.extra);
    }

    #[test]
    fn malformed_labels_rejected() {
        for label in ["tier1", "tier_", "tier_5", "tier_x", "t1", "", "tier_1_bonus"] {
            assert!(
                TierLabel::parse(label).is_err(),
                "label {label:?} should be rejected"
            );
        }
    }

    #[test]
    fn label_ordinals_scan_in_fixed_order() {
        let order = ["tier_1", "tier_1_extra", "tier_2", "tier_3"];
        let ordinals: Vec<u8> = order
            .iter()
            .map(|l| TierLabel::parse(l).unwrap().ordinal())
            .collect();
        for pair in ordinals.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
