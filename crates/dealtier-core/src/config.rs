//! Tiering configuration: user-editable thresholds, parsed and validated once
//! per ranking run.
//!
//! The on-disk shape is the JSON the configuration screen produces, e.g.:
//!
//! ```json
//! {
//!   "country": { "Canada": 1, "Germany": 2 },
//!   "ownership": { "Bootstrapped": 1, "Private": 2 },
//!   "founding_year": { "tier_1": 2015, "tier_2": 2019, "tier_3": 2022 },
//!   "fundraise_year": { "tier_1": 2018, "tier_2": 2021, "tier_3": 2023 },
//!   "total_raised": {
//!     "tier_1": { "Bootstrapped": 1000000.0, "Others": 500000.0 },
//!     "tier_2": { "Others": 5000000.0 }
//!   },
//!   "fte_count": {
//!     "tier_1": { "Bootstrapped": { "min": 5, "max": 50 } }
//!   }
//! }
//! ```
//!
//! Legacy key spellings (`Ownership`, `fundraiser_year`, `FTE_Count`) are
//! accepted as aliases. All six dimension sections are required: a missing
//! section is a hard error naming the dimension, never a silently skipped
//! scorer, because "dimension absent" and "all scores unknown" are different
//! conditions and conflating them corrupts pre-tier aggregation.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Deserialize;
use thiserror::Error;

use crate::tier::{Tier, TierError, TierLabel};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration is missing the {0:?} dimension")]
    MissingDimension(&'static str),
    #[error("configuration dimension {0:?} is empty")]
    EmptyDimension(&'static str),
    #[error("in {dimension:?}: {source}")]
    Label {
        dimension: &'static str,
        source: TierError,
    },
    #[error("in \"fte_count\", {label}/{ownership:?}: min {min} exceeds max {max}")]
    InvalidRange {
        label: String,
        ownership: String,
        min: u32,
        max: u32,
    },
    #[error("configuration JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// One tier's year bound: the latest year still qualifying for that tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBound {
    pub tier: Tier,
    pub max_year: i32,
}

/// Inclusive headcount range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HeadcountRange {
    pub min: u32,
    pub max: u32,
}

impl HeadcountRange {
    pub fn contains(&self, count: u32) -> bool {
        self.min <= count && count <= self.max
    }
}

/// One row of the total-raised table: a tier label and its per-group limits.
#[derive(Debug, Clone)]
pub struct RaisedRow {
    pub label: TierLabel,
    /// Ownership group → maximum amount raised qualifying for this tier.
    pub limits: HashMap<String, f64>,
}

/// The total-raised table: rows in fixed scan order (`tier_1`,
/// `tier_1_extra`, `tier_2`, `tier_3`), plus the ownership labels that the
/// `tier_1` row names, which define group membership.
#[derive(Debug, Clone)]
pub struct RaisedTable {
    tier_1_members: HashSet<String>,
    rows: Vec<RaisedRow>,
}

/// Ownership labels not named by the `tier_1` row fall into this group.
pub const OTHERS_GROUP: &str = "Others";

impl RaisedTable {
    /// Resolve a record's ownership label to its lookup group.
    pub fn group_for<'a>(&self, ownership: &'a str) -> &'a str {
        if self.tier_1_members.contains(ownership) {
            ownership
        } else {
            OTHERS_GROUP
        }
    }

    /// Rows in scan order.
    pub fn rows(&self) -> &[RaisedRow] {
        &self.rows
    }
}

/// One row of the headcount table: a tier and its per-ownership ranges.
#[derive(Debug, Clone)]
pub struct FteRow {
    pub tier: Tier,
    pub by_ownership: HashMap<String, HeadcountRange>,
}

/// Validated tiering thresholds for one ranking run.
///
/// Immutable for the run's duration; parse with [`TieringConfig::from_json_str`]
/// or [`TieringConfig::from_json_value`].
#[derive(Debug, Clone)]
pub struct TieringConfig {
    pub country: HashMap<String, Tier>,
    pub ownership: HashMap<String, Tier>,
    /// Ascending tier order; tier 4 is the implicit "else".
    pub founding_year: Vec<YearBound>,
    /// Ascending tier order; unmatched or missing dates fall back to tier 3.
    pub fundraise_year: Vec<YearBound>,
    pub total_raised: RaisedTable,
    /// Ascending tier order; tier 4 is the implicit "else".
    pub fte_count: Vec<FteRow>,
}

// ── Raw serde model ──

#[derive(Deserialize)]
struct RawConfig {
    country: Option<HashMap<String, Tier>>,
    #[serde(alias = "Ownership")]
    ownership: Option<HashMap<String, Tier>>,
    founding_year: Option<BTreeMap<String, i32>>,
    #[serde(alias = "fundraiser_year")]
    fundraise_year: Option<BTreeMap<String, i32>>,
    total_raised: Option<BTreeMap<String, HashMap<String, f64>>>,
    #[serde(alias = "FTE_Count")]
    fte_count: Option<BTreeMap<String, HashMap<String, HeadcountRange>>>,
}

impl TieringConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let country = require("country", raw.country)?;
        let ownership = require("ownership", raw.ownership)?;
        let founding_year = year_bounds("founding_year", require("founding_year", raw.founding_year)?)?;
        let fundraise_year =
            year_bounds("fundraise_year", require("fundraise_year", raw.fundraise_year)?)?;
        let total_raised = raised_table(require("total_raised", raw.total_raised)?)?;
        let fte_count = fte_rows(require("fte_count", raw.fte_count)?)?;

        Ok(Self {
            country,
            ownership,
            founding_year,
            fundraise_year,
            total_raised,
            fte_count,
        })
    }
}

fn require<T: Sized>(
    dimension: &'static str,
    section: Option<T>,
) -> Result<T, ConfigError> {
    section.ok_or(ConfigError::MissingDimension(dimension))
}

fn parse_label(dimension: &'static str, label: &str) -> Result<TierLabel, ConfigError> {
    TierLabel::parse(label).map_err(|source| ConfigError::Label { dimension, source })
}

fn year_bounds(
    dimension: &'static str,
    table: BTreeMap<String, i32>,
) -> Result<Vec<YearBound>, ConfigError> {
    if table.is_empty() {
        return Err(ConfigError::EmptyDimension(dimension));
    }
    let mut rows: Vec<(TierLabel, i32)> = table
        .into_iter()
        .map(|(label, max_year)| Ok((parse_label(dimension, &label)?, max_year)))
        .collect::<Result<_, ConfigError>>()?;
    rows.sort_by_key(|(label, _)| label.ordinal());
    Ok(rows
        .into_iter()
        .map(|(label, max_year)| YearBound {
            tier: label.tier,
            max_year,
        })
        .collect())
}

fn raised_table(
    table: BTreeMap<String, HashMap<String, f64>>,
) -> Result<RaisedTable, ConfigError> {
    if table.is_empty() {
        return Err(ConfigError::EmptyDimension("total_raised"));
    }
    let mut rows: Vec<RaisedRow> = table
        .into_iter()
        .map(|(label, limits)| {
            Ok(RaisedRow {
                label: parse_label("total_raised", &label)?,
                limits,
            })
        })
        .collect::<Result<_, ConfigError>>()?;
    rows.sort_by_key(|row| row.label.ordinal());

    // Group membership comes from the labels the plain tier_1 row names.
    let tier_1_members: HashSet<String> = rows
        .iter()
        .find(|row| row.label.tier == Tier::T1 && !row.label.extra)
        .map(|row| {
            row.limits
                .keys()
                .filter(|k| k.as_str() != OTHERS_GROUP)
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    Ok(RaisedTable {
        tier_1_members,
        rows,
    })
}

fn fte_rows(
    table: BTreeMap<String, HashMap<String, HeadcountRange>>,
) -> Result<Vec<FteRow>, ConfigError> {
    if table.is_empty() {
        return Err(ConfigError::EmptyDimension("fte_count"));
    }
    let mut rows: Vec<(TierLabel, HashMap<String, HeadcountRange>)> = table
        .into_iter()
        .map(|(label, by_ownership)| Ok((parse_label("fte_count", &label)?, by_ownership)))
        .collect::<Result<_, ConfigError>>()?;
    rows.sort_by_key(|(label, _)| label.ordinal());

    for (label, by_ownership) in &rows {
        for (ownership, range) in by_ownership {
            if range.min > range.max {
                return Err(ConfigError::InvalidRange {
                    label: format!("tier_{}", label.tier),
                    ownership: ownership.clone(),
                    min: range.min,
                    max: range.max,
                });
            }
        }
    }

    Ok(rows
        .into_iter()
        .map(|(label, by_ownership)| FteRow {
            tier: label.tier,
            by_ownership,
        })
        .collect())
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// A complete configuration used across this crate's tests.
    pub(crate) const FULL_CONFIG: &str = r#"{
        "country": { "Canada": 1, "Germany": 2, "Brazil": 3 },
        "ownership": { "Bootstrapped": 1, "Private": 2, "VC-Backed": 3 },
        "founding_year": { "tier_1": 2015, "tier_2": 2019, "tier_3": 2022 },
        "fundraise_year": { "tier_1": 2018, "tier_2": 2021, "tier_3": 2023 },
        "total_raised": {
            "tier_1": { "Bootstrapped": 1000000.0, "Others": 500000.0 },
            "tier_1_extra": { "Bootstrapped": 2000000.0 },
            "tier_2": { "Others": 5000000.0 },
            "tier_3": { "Others": 20000000.0 }
        },
        "fte_count": {
            "tier_1": { "Bootstrapped": { "min": 5, "max": 50 }, "Private": { "min": 10, "max": 100 } },
            "tier_2": { "Private": { "min": 101, "max": 250 } }
        }
    }"#;
}
