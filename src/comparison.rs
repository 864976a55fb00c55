//! Baseline selection and the per-version comparison loop.

use crate::error::AnalysisError;
use crate::i18n::LanguageRegistry;
use crate::oracle::QualityOracle;
use crate::types::{AggregateResult, BaselineSummary, Comparison, PageRecord};
use tracing::{info, warn};

/// URL substrings that mark an English version. Plain substring match: a
/// path ending in `/en` without the trailing slash does not qualify.
const BASELINE_URL_MARKERS: &[&str] = &["/en/", "/english/"];

/// The page chosen as the reference for all comparisons.
#[derive(Debug, Clone, Copy)]
pub struct BaselineSelection<'a> {
    pub baseline: &'a PageRecord,
    pub index: usize,
    /// `false` when no page looked English and the first page was used
    pub matched: bool,
}

fn is_baseline_candidate(page: &PageRecord) -> bool {
    let canonical = LanguageRegistry::get().canonical().code;
    page.detected_language == canonical
        || BASELINE_URL_MARKERS
            .iter()
            .any(|marker| page.url.contains(marker))
}

/// Pick the first English-looking page, falling back to the first page.
pub fn select_baseline(pages: &[PageRecord]) -> Result<BaselineSelection<'_>, AnalysisError> {
    let first = pages.first().ok_or(AnalysisError::NoContent)?;

    if let Some((index, baseline)) = pages
        .iter()
        .enumerate()
        .find(|(_, page)| is_baseline_candidate(page))
    {
        info!("Using {} ({}) as baseline", baseline.url, baseline.detected_language);
        return Ok(BaselineSelection {
            baseline,
            index,
            matched: true,
        });
    }

    warn!(
        "No English version found, using first page as baseline: {}",
        first.url
    );
    Ok(BaselineSelection {
        baseline: first,
        index: 0,
        matched: false,
    })
}

/// Assess every page whose URL differs from the baseline's, in input order.
///
/// An oracle failure never aborts the loop: that page gets a zero-score
/// comparison carrying a single critical `analysis_error` issue.
pub async fn compare_versions(
    oracle: &dyn QualityOracle,
    baseline: &PageRecord,
    pages: &[PageRecord],
) -> AggregateResult {
    let targets: Vec<&PageRecord> = pages.iter().filter(|p| p.url != baseline.url).collect();
    let total = targets.len();
    let mut comparisons = Vec::with_capacity(total);

    for (index, target) in targets.into_iter().enumerate() {
        let progress = index + 1;
        info!(
            "[{}/{}] Comparing {} ({}) against baseline",
            progress, total, target.url, target.detected_language
        );
        if !LanguageRegistry::get().is_supported(&target.detected_language) {
            warn!(
                "[{}/{}] Language '{}' is not a supported analysis language, score may be unreliable",
                progress, total, target.detected_language
            );
        }

        let comparison = match oracle.assess(baseline, target).await {
            Ok(assessment) => {
                info!(
                    "[{}/{}] ✓ {} scored {}/100 with {} issues",
                    progress,
                    total,
                    target.url,
                    assessment.quality_score,
                    assessment.issues.len()
                );
                Comparison::from_assessment(target, assessment)
            }
            Err(e) => {
                warn!("[{}/{}] ✗ {} could not be analyzed: {:#}", progress, total, target.url, e);
                Comparison::degraded(target, &format!("{:#}", e))
            }
        };
        comparisons.push(comparison);
    }

    AggregateResult::new(BaselineSummary::from(baseline), comparisons)
}
