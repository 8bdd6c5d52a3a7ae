//! Plain-text table rendering for the two output sets.

use dealtier_core::Tier;
use dealtier_engine::{DiagnosticRow, PresentationRow};

const MAX_NAME: usize = 30;
const MAX_CATEGORY: usize = 24;

/// Print the reviewer-facing shortlist.
pub fn print_presentation(rows: &[PresentationRow]) {
    if rows.is_empty() {
        println!("No companies passed the tier filter.");
        return;
    }

    println!(
        "{:>4}  {:>4}  {:<30}  {:<14}  {:>6}  {:>14}  {:<24}",
        "Rank", "Tier", "Name", "Country", "Count", "Raised", "Category"
    );
    for row in rows {
        println!(
            "{:>4}  {:>4}  {:<30}  {:<14}  {:>6}  {:>14}  {:<24}",
            row.rank,
            row.tier,
            truncate(&row.name, MAX_NAME),
            truncate(row.country.as_deref().unwrap_or("-"), 14),
            row.count.map_or_else(|| "-".into(), |c| c.to_string()),
            row.total_raised
                .map_or_else(|| "-".into(), format_amount),
            truncate(&row.category, MAX_CATEGORY),
        );
    }
    println!("\n{} companies shortlisted.", rows.len());
}

/// Print the audit table with every intermediate score.
pub fn print_diagnostics(rows: &[DiagnosticRow]) {
    println!(
        "{:>5}  {:<30}  {:<13}  {:>3}  {:>3}  {:>5}  {:>4}  {:>9}  {:<20}",
        "Index", "Name", "C/O/F/R/$/E", "Pre", "Cat", "Final", "Rank", "Key", "Screened by"
    );
    for row in rows {
        let dims = format!(
            "{}/{}/{}/{}/{}/{}",
            dim(row.country_tier),
            dim(row.ownership_tier),
            dim(row.founding_tier),
            dim(row.fundraise_tier),
            dim(row.raised_tier),
            dim(row.fte_tier),
        );
        println!(
            "{:>5}  {:<30}  {:<13}  {:>3}  {:>3}  {:>5}  {:>4}  {:>9}  {:<20}",
            row.index,
            truncate(&row.name, MAX_NAME),
            dims,
            row.pre_tier,
            dim(row.category_tier),
            row.final_tier,
            row.rank,
            row.rank_key,
            row.denylist_hit.as_deref().unwrap_or("-"),
        );
    }
}

fn dim(tier: Option<Tier>) -> String {
    tier.map_or_else(|| "?".into(), |t| t.to_string())
}

fn format_amount(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("{:.1}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("{:.0}k", amount / 1_000.0)
    } else {
        format!("{amount:.0}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_humanised() {
        assert_eq!(format_amount(500.0), "500");
        assert_eq!(format_amount(45_000.0), "45k");
        assert_eq!(format_amount(2_500_000.0), "2.5M");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long company name", 10), "a very ...");
        // Multi-byte characters must not split.
        assert_eq!(truncate("ünïcödé nämé ünïcödé", 10), "ünïcödé...");
    }
}
