//! Record and configuration loading.
//!
//! This is the external-collaborator shim the engine expects: it accepts the
//! JSON export of a sourcing spreadsheet, tolerating the original column
//! headers as field aliases, numbers that arrive as strings, and investment
//! dates in a handful of common formats. Rows the shim cannot fully coerce
//! keep what parsed and leave the rest unset; the scorers' per-dimension
//! unknown policies take it from there.

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use dealtier_core::{CompanyRecord, TieringConfig};
use serde::Deserialize;

/// A JSON number, a numeric string, or nothing usable.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Loose {
    Num(f64),
    Str(String),
    Other(serde_json::Value),
}

impl Loose {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Loose::Num(n) => Some(*n),
            Loose::Str(s) => s.trim().replace(',', "").parse().ok(),
            Loose::Other(_) => None,
        }
    }

    fn as_i32(&self) -> Option<i32> {
        self.as_f64().map(|n| n as i32)
    }

    fn as_u32(&self) -> Option<u32> {
        self.as_f64().filter(|n| *n >= 0.0).map(|n| n as u32)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawRow {
    #[serde(alias = "Company Name")]
    name: Option<String>,
    #[serde(alias = "Informal Name")]
    informal_name: Option<String>,
    #[serde(alias = "Founding Year")]
    founding_year: Option<Loose>,
    #[serde(alias = "Country")]
    country: Option<String>,
    #[serde(alias = "Ownership")]
    ownership: Option<String>,
    #[serde(alias = "Total Raised")]
    total_raised: Option<Loose>,
    #[serde(alias = "Employee Count")]
    employee_count: Option<Loose>,
    #[serde(alias = "Date of Most Recent Investment")]
    last_investment: Option<String>,
    #[serde(alias = "Description")]
    description: Option<String>,
    #[serde(alias = "Website")]
    website: Option<String>,
    #[serde(alias = "Executive Title")]
    executive_title: Option<String>,
    #[serde(alias = "Executive First Name")]
    executive_first_name: Option<String>,
    #[serde(alias = "Executive Last Name")]
    executive_last_name: Option<String>,
    #[serde(alias = "Executive Email")]
    executive_email: Option<String>,
    #[serde(alias = "Investors")]
    investors: Option<String>,
}

impl RawRow {
    fn into_record(self) -> CompanyRecord {
        CompanyRecord {
            name: self.name.unwrap_or_default(),
            informal_name: self.informal_name,
            founding_year: self.founding_year.as_ref().and_then(Loose::as_i32),
            country: self.country,
            ownership: self.ownership,
            total_raised: self.total_raised.as_ref().and_then(Loose::as_f64),
            employee_count: self.employee_count.as_ref().and_then(Loose::as_u32),
            last_investment: self.last_investment.as_deref().and_then(parse_loose_date),
            description: self.description,
            website: self.website,
            executive_title: self.executive_title,
            executive_first_name: self.executive_first_name,
            executive_last_name: self.executive_last_name,
            executive_email: self.executive_email,
            investors: self.investors,
        }
    }
}

/// Parse an investment date in the formats the sheets actually contain.
///
/// Accepts ISO dates, ISO datetimes, US-style slashes, and a bare year
/// (mapped to January 1st; the scorer only reads the year anyway).
pub fn parse_loose_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }
    // ISO datetime: take the date part.
    if let Some((date_part, _)) = s.split_once('T')
        && let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
    {
        return Some(date);
    }
    // Bare year.
    if let Ok(year) = s.parse::<i32>()
        && (1800..=2200).contains(&year)
    {
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }
    None
}

/// Load a record set from a JSON array file.
pub fn load_records(path: &Path) -> anyhow::Result<Vec<CompanyRecord>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading records from {}", path.display()))?;
    let rows: Vec<RawRow> = serde_json::from_str(&data)
        .with_context(|| format!("parsing records from {}", path.display()))?;
    Ok(rows.into_iter().map(RawRow::into_record).collect())
}

/// Load and validate a tiering configuration file.
pub fn load_config(path: &Path) -> anyhow::Result<TieringConfig> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading configuration from {}", path.display()))?;
    TieringConfig::from_json_str(&data)
        .with_context(|| format!("validating configuration from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spreadsheet_headers_accepted() {
        let json = r#"[{
            "Company Name": "Acme Robotics",
            "Founding Year": "2019",
            "Country": "Canada",
            "Ownership": "Private",
            "Total Raised": "1,500,000",
            "Employee Count": 42,
            "Date of Most Recent Investment": "2023-06-30",
            "Description": "robotics software",
            "Website": "https://acme.example"
        }]"#;
        let rows: Vec<RawRow> = serde_json::from_str(json).unwrap();
        let rec = rows.into_iter().next().unwrap().into_record();
        assert_eq!(rec.name, "Acme Robotics");
        assert_eq!(rec.founding_year, Some(2019));
        assert_eq!(rec.total_raised, Some(1_500_000.0));
        assert_eq!(rec.employee_count, Some(42));
        assert_eq!(
            rec.last_investment,
            NaiveDate::from_ymd_opt(2023, 6, 30)
        );
    }

    #[test]
    fn snake_case_fields_accepted() {
        let json = r#"[{"name": "Acme", "employee_count": "17"}]"#;
        let rows: Vec<RawRow> = serde_json::from_str(json).unwrap();
        let rec = rows.into_iter().next().unwrap().into_record();
        assert_eq!(rec.name, "Acme");
        assert_eq!(rec.employee_count, Some(17));
    }

    #[test]
    fn unusable_values_left_unset() {
        let json = r#"[{
            "Company Name": "Acme",
            "Founding Year": "unknown",
            "Employee Count": null,
            "Total Raised": true,
            "Date of Most Recent Investment": "sometime in spring"
        }]"#;
        let rows: Vec<RawRow> = serde_json::from_str(json).unwrap();
        let rec = rows.into_iter().next().unwrap().into_record();
        assert_eq!(rec.founding_year, None);
        assert_eq!(rec.employee_count, None);
        assert_eq!(rec.total_raised, None);
        assert_eq!(rec.last_investment, None);
    }

    #[test]
    fn missing_name_becomes_blank_for_cleaning() {
        let json = r#"[{"Country": "Canada"}]"#;
        let rows: Vec<RawRow> = serde_json::from_str(json).unwrap();
        let rec = rows.into_iter().next().unwrap().into_record();
        assert!(!rec.has_name());
    }

    #[test]
    fn loose_dates() {
        assert_eq!(
            parse_loose_date("2021-05-04"),
            NaiveDate::from_ymd_opt(2021, 5, 4)
        );
        assert_eq!(
            parse_loose_date("05/04/2021"),
            NaiveDate::from_ymd_opt(2021, 5, 4)
        );
        assert_eq!(
            parse_loose_date("2021-05-04T12:30:00Z"),
            NaiveDate::from_ymd_opt(2021, 5, 4)
        );
        assert_eq!(parse_loose_date("2021"), NaiveDate::from_ymd_opt(2021, 1, 1));
        assert_eq!(parse_loose_date(""), None);
        assert_eq!(parse_loose_date("n/a"), None);
    }
}
