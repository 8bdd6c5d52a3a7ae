//! Business-model keyword screen.
//!
//! A case-insensitive substring match against a denylist of red-flag terms in
//! the free-text description. A hit forces pre-tier 4 and suppresses the
//! category classifier call for that row: it would be rejected regardless of
//! the classifier's opinion, so the call is pure cost.

/// Default red-flag terms: business models the sourcing rubric rejects
/// outright (services, intermediaries, consumer).
pub const DEFAULT_TERMS: &[&str] = &[
    "consulting",
    "consultancy",
    "marketplace",
    "consumer",
    "b2c",
    "custom development",
    "custom dev",
    "dev shop",
    "system integrator",
    "systems integrator",
    "staffing",
    "outsourcing",
    "reseller",
    "recruitment agency",
];

/// A denylist of lowercased terms matched as substrings of the description.
#[derive(Debug, Clone)]
pub struct Denylist {
    terms: Vec<String>,
}

impl Default for Denylist {
    fn default() -> Self {
        Self::from_terms(DEFAULT_TERMS.iter().copied())
    }
}

impl Denylist {
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// An empty list; disables the short-circuit entirely.
    pub fn disabled() -> Self {
        Self { terms: Vec::new() }
    }

    /// The first term the description contains, if any.
    pub fn screen(&self, description: &str) -> Option<&str> {
        let haystack = description.to_lowercase();
        self.terms
            .iter()
            .find(|term| haystack.contains(term.as_str()))
            .map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}
