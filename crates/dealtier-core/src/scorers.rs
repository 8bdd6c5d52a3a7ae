//! The six dimension scorers.
//!
//! Each scorer is a pure function `(record, config) -> Option<Tier>`; `None`
//! means unknown (insufficient data), which is excluded from aggregation.
//!
//! The unknown-vs-fallback policy is deliberately per-dimension:
//! - country and ownership never default; they require configuration coverage;
//! - founding year and headcount fall to tier 4 when no bound matches;
//! - fundraise recency falls to tier 3 when the date is missing, unparseable,
//!   or newer than every configured bound.

use crate::config::TieringConfig;
use crate::record::{CompanyRecord, DimensionScores};
use crate::tier::Tier;

/// Direct lookup of the record's country in the country table.
pub fn country_tier(record: &CompanyRecord, config: &TieringConfig) -> Option<Tier> {
    let country = record.country.as_deref()?;
    config.country.get(country).copied()
}

/// Direct lookup of the record's ownership label in the ownership table.
pub fn ownership_tier(record: &CompanyRecord, config: &TieringConfig) -> Option<Tier> {
    let ownership = record.ownership.as_deref()?;
    config.ownership.get(ownership).copied()
}

/// First tier (ascending) whose bound covers the founding year; tier 4 if the
/// company is newer than every bound.
pub fn founding_tier(record: &CompanyRecord, config: &TieringConfig) -> Option<Tier> {
    let year = record.founding_year?;
    for bound in &config.founding_year {
        if year <= bound.max_year {
            return Some(bound.tier);
        }
    }
    Some(Tier::T4)
}

/// First tier (ascending) whose bound covers the year of the most recent
/// investment. A missing date or one newer than every bound is tier 3: the
/// absence of a recent round is weak signal, not a penalty.
pub fn fundraise_tier(record: &CompanyRecord, config: &TieringConfig) -> Option<Tier> {
    use chrono::Datelike;

    let Some(date) = record.last_investment else {
        return Some(Tier::T3);
    };
    let year = date.year();
    for bound in &config.fundraise_year {
        if year <= bound.max_year {
            return Some(bound.tier);
        }
    }
    Some(Tier::T3)
}

/// First tier in scan order (`tier_1`, `tier_1_extra`, `tier_2`, `tier_3`)
/// whose limit for the record's ownership group covers the amount raised;
/// tier 4 if no limit matches. The group is the ownership label itself when
/// the `tier_1` row names it, otherwise "Others".
pub fn raised_tier(record: &CompanyRecord, config: &TieringConfig) -> Option<Tier> {
    let raised = record.total_raised?;
    let ownership = record.ownership.as_deref()?;

    let group = config.total_raised.group_for(ownership);
    for row in config.total_raised.rows() {
        if let Some(&limit) = row.limits.get(group)
            && raised <= limit
        {
            return Some(row.label.tier);
        }
    }
    Some(Tier::T4)
}

/// First tier (ascending) whose headcount range for the record's ownership
/// label contains the employee count; tier 4 if no range matches.
pub fn fte_tier(record: &CompanyRecord, config: &TieringConfig) -> Option<Tier> {
    let count = record.employee_count?;
    let ownership = record.ownership.as_deref()?;

    for row in &config.fte_count {
        if let Some(range) = row.by_ownership.get(ownership)
            && range.contains(count)
        {
            return Some(row.tier);
        }
    }
    Some(Tier::T4)
}

/// All six dimensions for one record.
pub fn score_dimensions(record: &CompanyRecord, config: &TieringConfig) -> DimensionScores {
    DimensionScores {
        country: country_tier(record, config),
        ownership: ownership_tier(record, config),
        founding: founding_tier(record, config),
        fundraise: fundraise_tier(record, config),
        raised: raised_tier(record, config),
        fte: fte_tier(record, config),
    }
}
