//! The category classifier seam.
//!
//! The pipeline talks to the external text-classification service through
//! [`CategoryClassifier`] only. The contract is narrow: one verdict per
//! request, same order. Batching is an optimisation, never a correctness
//! requirement; a per-item implementation and a batched one must agree when
//! the service is well-behaved.

use async_trait::async_trait;
use dealtier_core::CategoryVerdict;
use thiserror::Error;

/// One classification request: the free-text description and website of a
/// company.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct CategoryRequest {
    pub description: String,
    pub website: String,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("classifier endpoint returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("classifier response had no content")]
    EmptyResponse,
}

/// Batch classification of company descriptions into product-category tiers.
///
/// An `Err` covers the whole batch (transport failure); the caller degrades
/// every row in it to the unscored verdict. Item-level problems (a null or
/// out-of-range tier, unparseable output for one entry) must NOT surface as
/// `Err` — implementations degrade those items to
/// [`CategoryVerdict::unscored`] and keep the rest of the batch.
#[async_trait]
pub trait CategoryClassifier: Send + Sync {
    async fn classify(
        &self,
        batch: &[CategoryRequest],
    ) -> Result<Vec<CategoryVerdict>, ClassifierError>;
}

/// A classifier that scores nothing. Used for offline runs, where ranking
/// falls back to the rule-based pre-tier alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullClassifier;

#[async_trait]
impl CategoryClassifier for NullClassifier {
    async fn classify(
        &self,
        batch: &[CategoryRequest],
    ) -> Result<Vec<CategoryVerdict>, ClassifierError> {
        Ok(vec![CategoryVerdict::unscored(); batch.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_classifier_returns_one_unscored_verdict_per_request() {
        let batch = vec![CategoryRequest::default(); 3];
        let verdicts = NullClassifier.classify(&batch).await.unwrap();
        assert_eq!(verdicts.len(), 3);
        assert!(verdicts.iter().all(|v| v.tier.is_none() && v.label.is_empty()));
    }
}
