//! Pre-tier aggregation.
//!
//! The pre-tier is the worst (maximum) of the defined dimension scores.
//! Unknown scores are excluded; a record with all six unknown gets tier 3
//! ("insufficient data") rather than an undefined value, so downstream
//! max() against the classifier tier always compares two real tiers.

use crate::record::DimensionScores;
use crate::tier::Tier;

/// Worst defined dimension score; tier 3 when every dimension is unknown.
pub fn pre_tier(scores: &DimensionScores) -> Tier {
    scores
        .defined()
        .max()
        .unwrap_or(Tier::INSUFFICIENT_DATA)
}

/// Final tier: worst of pre-tier and classifier tier.
///
/// An unscored classifier verdict (`None`) never raises the final tier.
pub fn final_tier(pre: Tier, classifier: Option<Tier>) -> Tier {
    match classifier {
        Some(tier) => pre.max(tier),
        None => pre,
    }
}
