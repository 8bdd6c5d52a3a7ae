//! The ranking pipeline.
//!
//! Data flows strictly left to right: raw records → per-row dimension scores
//! → pre-tier → classifier-adjusted tier → final tier → ranked and filtered
//! output. One run holds the whole record set in memory; the only suspension
//! points are the classifier batches, which run with bounded concurrency and
//! re-merge by original row index, so completion order never affects the
//! result.

use dealtier_ai::{CategoryClassifier, CategoryRequest};
use dealtier_core::{
    CategoryVerdict, CompanyRecord, Denylist, ScoredRecord, Tier, TieringConfig, aggregate,
    scorers,
};
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::output::{self, DiagnosticRow, PresentationRow};
use crate::progress::{ProgressReporter, ProgressUpdate};

/// Number of rule-based scoring passes, one per dimension.
const SCORING_PASSES: usize = 6;

/// Minimum rank-key stride. The effective stride is the larger of this and
/// `record count + 1`, so the tier term always dominates the index term.
const MIN_RANK_STRIDE: i64 = 10_000;

/// Tuning knobs for one ranking run.
#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Companies per classifier call.
    pub batch_size: usize,
    /// Classifier batches in flight at once.
    pub concurrency: usize,
    pub denylist: Denylist,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            batch_size: 15,
            concurrency: 4,
            denylist: Denylist::default(),
        }
    }
}

/// The two output sets of a ranking run.
#[derive(Debug, Clone)]
pub struct RankOutcome {
    pub presentation: Vec<PresentationRow>,
    pub diagnostics: Vec<DiagnosticRow>,
}

/// Run the full pipeline over one record set.
///
/// Never fails: classifier trouble degrades row-wise to unscored verdicts,
/// and configuration problems are caught earlier, when the config is parsed.
pub async fn run_pipeline(
    records: Vec<CompanyRecord>,
    config: &TieringConfig,
    classifier: &dyn CategoryClassifier,
    reporter: &dyn ProgressReporter,
    options: &RankOptions,
) -> RankOutcome {
    // 1. Clean: drop rows without a company name, then assign the 1-based
    // index that identifies each row for the rest of the run.
    let input_count = records.len();
    let mut rows: Vec<ScoredRecord> = records
        .into_iter()
        .filter(CompanyRecord::has_name)
        .enumerate()
        .map(|(i, record)| ScoredRecord::new(i + 1, record))
        .collect();
    if rows.len() < input_count {
        debug!(
            dropped = input_count - rows.len(),
            "dropped rows without a company name"
        );
    }

    // 2. Keyword screen first: it decides which rows skip the classifier,
    // which fixes the batch count and therefore the progress total.
    for row in &mut rows {
        row.denylist_hit = row
            .record
            .description
            .as_deref()
            .and_then(|d| options.denylist.screen(d))
            .map(str::to_string);
    }
    let screened = rows.iter().filter(|r| r.classifier_suppressed()).count();

    let batch_size = options.batch_size.max(1);
    let eligible: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.classifier_suppressed())
        .map(|(i, _)| i)
        .collect();
    let batch_count = eligible.len().div_ceil(batch_size);

    let total = SCORING_PASSES + batch_count;
    let mut completed = 0usize;
    info!(
        rows = rows.len(),
        screened,
        batches = batch_count,
        "starting ranking run"
    );

    // 3. Six dimension-scoring passes, one progress unit each.
    type Pass = (&'static str, fn(&mut ScoredRecord, &TieringConfig));
    let passes: [Pass; SCORING_PASSES] = [
        ("country", |r, c| {
            r.scores.country = scorers::country_tier(&r.record, c)
        }),
        ("ownership", |r, c| {
            r.scores.ownership = scorers::ownership_tier(&r.record, c)
        }),
        ("founding_year", |r, c| {
            r.scores.founding = scorers::founding_tier(&r.record, c)
        }),
        ("fundraise_recency", |r, c| {
            r.scores.fundraise = scorers::fundraise_tier(&r.record, c)
        }),
        ("total_raised", |r, c| {
            r.scores.raised = scorers::raised_tier(&r.record, c)
        }),
        ("headcount", |r, c| {
            r.scores.fte = scorers::fte_tier(&r.record, c)
        }),
    ];
    for (dimension, pass) in passes {
        for row in &mut rows {
            pass(row, config);
        }
        completed += 1;
        reporter.report(ProgressUpdate::new(completed, total));
        debug!(dimension, "scoring pass complete");
    }

    // 4. Pre-tier: worst defined dimension score; a denylist hit overrides
    // straight to reject.
    for row in &mut rows {
        row.pre_tier = if row.classifier_suppressed() {
            Tier::REJECT
        } else {
            aggregate::pre_tier(&row.scores)
        };
    }

    // 5. Classifier batches, bounded concurrency, re-merged by index.
    let batches: Vec<(Vec<usize>, Vec<CategoryRequest>)> = eligible
        .chunks(batch_size)
        .map(|chunk| {
            let requests = chunk
                .iter()
                .map(|&i| CategoryRequest {
                    description: rows[i].record.description.clone().unwrap_or_default(),
                    website: rows[i].record.website.clone().unwrap_or_default(),
                })
                .collect();
            (chunk.to_vec(), requests)
        })
        .collect();

    let mut results = futures::stream::iter(batches.into_iter().map(|(indices, requests)| {
        async move {
            let result = classifier.classify(&requests).await;
            (indices, requests.len(), result)
        }
    }))
    .buffered(options.concurrency.max(1));

    while let Some((indices, requested, result)) = results.next().await {
        let mut verdicts = match result {
            Ok(verdicts) => verdicts,
            Err(err) => {
                warn!(%err, rows = requested, "classifier batch failed; degrading to unscored");
                vec![CategoryVerdict::unscored(); requested]
            }
        };
        if verdicts.len() != requested {
            warn!(
                got = verdicts.len(),
                expected = requested,
                "classifier returned wrong batch size; padding with unscored"
            );
            verdicts.resize(requested, CategoryVerdict::unscored());
        }
        for (i, verdict) in indices.into_iter().zip(verdicts) {
            rows[i].category = verdict;
        }
        completed += 1;
        reporter.report(ProgressUpdate::new(completed, total));
    }

    // 6. Final tier, rank key, rank.
    finalize_ranks(&mut rows);

    RankOutcome {
        presentation: output::presentation_rows(&rows),
        diagnostics: output::diagnostic_rows(&rows),
    }
}

/// Compute final tiers, rank keys, and dense minimum-tie ranks.
///
/// The rank key is `final_tier * stride + index`, so ascending key order is
/// exactly (final tier ascending, original index ascending). Rank keys are
/// unique, so the minimum-tie rank degenerates to a plain 1..N ordinal.
fn finalize_ranks(rows: &mut [ScoredRecord]) {
    let stride = MIN_RANK_STRIDE.max(rows.len() as i64 + 1);
    for row in rows.iter_mut() {
        row.final_tier = aggregate::final_tier(row.pre_tier, row.category.tier);
        row.rank_key = i64::from(row.final_tier.value()) * stride + row.index as i64;
    }

    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by_key(|&i| rows[i].rank_key);

    let mut prev_key = None;
    let mut prev_rank = 0;
    for (pos, &i) in order.iter().enumerate() {
        let rank = match prev_key {
            Some(key) if key == rows[i].rank_key => prev_rank,
            _ => pos + 1,
        };
        prev_key = Some(rows[i].rank_key);
        prev_rank = rank;
        rows[i].rank = rank;
    }
}
