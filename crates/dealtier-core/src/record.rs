//! Company records and their scored counterparts.
//!
//! A `CompanyRecord` is one input row. Identity is the positional index in
//! input order (1-based, assigned after rows without a company name are
//! dropped); that index is carried through the whole pipeline for
//! deterministic tie-breaking and for re-merging classifier results computed
//! out of row order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::tier::Tier;

/// One row of input: a company under deal-sourcing review.
///
/// `name` is the only required field; every other field is optional and feeds
/// a scorer that treats absence per its own policy (see `scorers`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub name: String,
    #[serde(default)]
    pub informal_name: Option<String>,
    #[serde(default)]
    pub founding_year: Option<i32>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub ownership: Option<String>,
    /// Total capital raised, in the sheet's currency unit.
    #[serde(default)]
    pub total_raised: Option<f64>,
    #[serde(default)]
    pub employee_count: Option<u32>,
    /// Date of the most recent investment round.
    #[serde(default)]
    pub last_investment: Option<NaiveDate>,
    /// Free-text business description; input to the keyword screen and the
    /// category classifier.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub executive_title: Option<String>,
    #[serde(default)]
    pub executive_first_name: Option<String>,
    #[serde(default)]
    pub executive_last_name: Option<String>,
    #[serde(default)]
    pub executive_email: Option<String>,
    #[serde(default)]
    pub investors: Option<String>,
}

impl CompanyRecord {
    /// Rows with a blank name are dropped before scoring.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// The six per-dimension tier scores for one record.
///
/// `None` means unknown: insufficient data to classify that dimension. It is
/// excluded from aggregation, which is NOT the same thing as an explicit
/// worst-tier verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub country: Option<Tier>,
    pub ownership: Option<Tier>,
    pub founding: Option<Tier>,
    pub fundraise: Option<Tier>,
    pub raised: Option<Tier>,
    pub fte: Option<Tier>,
}

impl DimensionScores {
    /// Iterate the defined (non-unknown) scores.
    pub fn defined(&self) -> impl Iterator<Item = Tier> {
        [
            self.country,
            self.ownership,
            self.founding,
            self.fundraise,
            self.raised,
            self.fte,
        ]
        .into_iter()
        .flatten()
    }
}

/// Category classifier verdict for one record.
///
/// `tier: None` means unscored: not yet computed, suppressed by the keyword
/// screen, or degraded after a classifier failure. An unscored verdict never
/// raises the final tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryVerdict {
    pub tier: Option<Tier>,
    /// Short human-readable category, 2-3 words, lowercase.
    pub label: String,
}

impl CategoryVerdict {
    pub fn unscored() -> Self {
        Self::default()
    }
}

/// A company record annotated with every pipeline stage's result.
///
/// Created once per surviving input row, filled in stage by stage, then
/// materialised into presentation and diagnostic output rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRecord {
    /// 1-based position in the cleaned input order.
    pub index: usize,
    pub record: CompanyRecord,
    pub scores: DimensionScores,
    /// Worst defined dimension score, before the classifier is consulted.
    pub pre_tier: Tier,
    /// The denylist term that short-circuited this record to tier 4, if any.
    pub denylist_hit: Option<String>,
    pub category: CategoryVerdict,
    /// Worst of pre-tier and classifier tier.
    pub final_tier: Tier,
    /// `final_tier * stride + index`; strictly orders by (tier, input order).
    pub rank_key: i64,
    pub rank: usize,
}

impl ScoredRecord {
    pub fn new(index: usize, record: CompanyRecord) -> Self {
        Self {
            index,
            record,
            scores: DimensionScores::default(),
            pre_tier: Tier::INSUFFICIENT_DATA,
            denylist_hit: None,
            category: CategoryVerdict::unscored(),
            final_tier: Tier::INSUFFICIENT_DATA,
            rank_key: 0,
            rank: 0,
        }
    }

    /// The keyword screen already dispositioned this record; skip the
    /// classifier call for it.
    pub fn classifier_suppressed(&self) -> bool {
        self.denylist_hit.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_detected() {
        let mut rec = CompanyRecord {
            name: "Acme Robotics".into(),
            ..Default::default()
        };
        assert!(rec.has_name());
        rec.name = "   ".into();
        assert!(!rec.has_name());
        rec.name.clear();
        assert!(!rec.has_name());
    }

    #[test]
    fn defined_skips_unknown() {
        let scores = DimensionScores {
            country: Some(Tier::T1),
            fundraise: Some(Tier::T3),
            ..Default::default()
        };
        let defined: Vec<Tier> = scores.defined().collect();
        assert_eq!(defined, vec![Tier::T1, Tier::T3]);
    }

    #[test]
    fn record_deserialises_with_missing_optionals() {
        let rec: CompanyRecord =
            serde_json::from_str(r#"{"name": "Acme", "country": "Canada"}"#).unwrap();
        assert_eq!(rec.name, "Acme");
        assert_eq!(rec.country.as_deref(), Some("Canada"));
        assert!(rec.founding_year.is_none());
        assert!(rec.last_investment.is_none());
    }
}
