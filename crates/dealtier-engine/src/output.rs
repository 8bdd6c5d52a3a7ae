//! Output materialisation: the presentation set and the diagnostic set.
//!
//! Presentation is what reviewers read: tier-4 rows removed, columns renamed
//! and pruned, rows grouped by final tier and sized by headcount. Diagnostics
//! is the audit trail: every surviving input row with every intermediate
//! score, in original input order, tier-4 rows included.

use std::cmp::Reverse;

use chrono::NaiveDate;
use dealtier_core::{ScoredRecord, Tier};
use serde::Serialize;

/// One row of the reviewer-facing shortlist.
#[derive(Debug, Clone, Serialize)]
pub struct PresentationRow {
    pub rank: usize,
    pub tier: Tier,
    pub name: String,
    pub informal_name: Option<String>,
    pub founding_year: Option<i32>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    /// Employee count ("Count" in the sheet).
    pub count: Option<u32>,
    pub ownership: Option<String>,
    pub total_raised: Option<f64>,
    pub last_investment: Option<NaiveDate>,
    pub executive_title: Option<String>,
    pub executive_first_name: Option<String>,
    pub executive_last_name: Option<String>,
    pub executive_email: Option<String>,
    pub investors: Option<String>,
    /// Classifier's short category label.
    pub category: String,
}

/// One row of the audit output, with every intermediate score.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticRow {
    pub index: usize,
    pub name: String,
    pub website: Option<String>,
    pub description: Option<String>,
    pub employee_count: Option<u32>,
    pub country_tier: Option<Tier>,
    pub ownership_tier: Option<Tier>,
    pub founding_tier: Option<Tier>,
    pub fundraise_tier: Option<Tier>,
    pub raised_tier: Option<Tier>,
    pub fte_tier: Option<Tier>,
    pub pre_tier: Tier,
    pub denylist_hit: Option<String>,
    pub category_tier: Option<Tier>,
    pub category_label: String,
    pub final_tier: Tier,
    pub rank_key: i64,
    pub rank: usize,
}

/// Build the presentation set: drop tier-4 rows, then order by final tier
/// ascending and headcount descending.
///
/// The rank column keeps the fine-grained rank computed from the rank key;
/// the row ORDER here is the coarser human-readable grouping. Rows without a
/// headcount sort after sized rows within their tier; the underlying stable
/// sort preserves input order beyond that.
pub fn presentation_rows(rows: &[ScoredRecord]) -> Vec<PresentationRow> {
    let mut kept: Vec<&ScoredRecord> = rows.iter().filter(|r| !r.final_tier.is_reject()).collect();
    kept.sort_by_key(|r| {
        (
            r.final_tier,
            Reverse(r.record.employee_count.map(i64::from).unwrap_or(-1)),
        )
    });

    kept.into_iter()
        .map(|r| {
            let rec = &r.record;
            PresentationRow {
                rank: r.rank,
                tier: r.final_tier,
                name: rec.name.clone(),
                informal_name: rec.informal_name.clone(),
                founding_year: rec.founding_year,
                country: rec.country.clone(),
                website: rec.website.clone(),
                description: rec.description.clone(),
                count: rec.employee_count,
                ownership: rec.ownership.clone(),
                total_raised: rec.total_raised,
                last_investment: rec.last_investment,
                executive_title: rec.executive_title.clone(),
                executive_first_name: rec.executive_first_name.clone(),
                executive_last_name: rec.executive_last_name.clone(),
                executive_email: rec.executive_email.clone(),
                investors: rec.investors.clone(),
                category: r.category.label.clone(),
            }
        })
        .collect()
}

/// Build the diagnostic set: every row, original input order.
pub fn diagnostic_rows(rows: &[ScoredRecord]) -> Vec<DiagnosticRow> {
    rows.iter()
        .map(|r| DiagnosticRow {
            index: r.index,
            name: r.record.name.clone(),
            website: r.record.website.clone(),
            description: r.record.description.clone(),
            employee_count: r.record.employee_count,
            country_tier: r.scores.country,
            ownership_tier: r.scores.ownership,
            founding_tier: r.scores.founding,
            fundraise_tier: r.scores.fundraise,
            raised_tier: r.scores.raised,
            fte_tier: r.scores.fte,
            pre_tier: r.pre_tier,
            denylist_hit: r.denylist_hit.clone(),
            category_tier: r.category.tier,
            category_label: r.category.label.clone(),
            final_tier: r.final_tier,
            rank_key: r.rank_key,
            rank: r.rank,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealtier_core::CompanyRecord;

    fn scored(index: usize, tier: Tier, count: Option<u32>) -> ScoredRecord {
        let mut row = ScoredRecord::new(
            index,
            CompanyRecord {
                name: format!("company-{index}"),
                employee_count: count,
                ..Default::default()
            },
        );
        row.final_tier = tier;
        row.rank = index;
        row
    }

    #[test]
    fn reject_tier_filtered_from_presentation_only() {
        let rows = vec![
            scored(1, Tier::T1, Some(10)),
            scored(2, Tier::T4, Some(500)),
            scored(3, Tier::T2, Some(30)),
        ];
        let presentation = presentation_rows(&rows);
        assert_eq!(presentation.len(), 2);
        assert!(presentation.iter().all(|r| !r.tier.is_reject()));

        let diagnostics = diagnostic_rows(&rows);
        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics[1].final_tier, Tier::T4);
    }

    #[test]
    fn presentation_grouped_by_tier_then_headcount_desc() {
        let rows = vec![
            scored(1, Tier::T2, Some(50)),
            scored(2, Tier::T1, Some(10)),
            scored(3, Tier::T2, Some(200)),
            scored(4, Tier::T1, Some(80)),
        ];
        let names: Vec<String> = presentation_rows(&rows)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(
            names,
            vec!["company-4", "company-2", "company-3", "company-1"]
        );
    }

    #[test]
    fn missing_headcount_sorts_last_within_tier() {
        let rows = vec![
            scored(1, Tier::T1, None),
            scored(2, Tier::T1, Some(5)),
        ];
        let names: Vec<String> = presentation_rows(&rows)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["company-2", "company-1"]);
    }

    #[test]
    fn diagnostics_preserve_input_order() {
        let rows = vec![
            scored(1, Tier::T3, Some(1)),
            scored(2, Tier::T1, Some(2)),
            scored(3, Tier::T2, Some(3)),
        ];
        let indices: Vec<usize> = diagnostic_rows(&rows).into_iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }
}
