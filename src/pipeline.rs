//! One analysis run: discover, fetch, select a baseline, compare, check
//! consistency. Every step runs sequentially.

use crate::comparison::{compare_versions, select_baseline};
use crate::consistency::check_consistency;
use crate::error::AnalysisError;
use crate::fetcher::PageFetcher;
use crate::oracle::{ConsistencyOracle, QualityOracle};
use crate::types::{AggregateResult, ConsistencyReport, PageRecord};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Look for language-version links on the first URL
    pub discover: bool,
    /// Upper bound on discovered URLs added to the run
    pub max_discovered: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            discover: false,
            max_discovered: 5,
        }
    }
}

/// Everything the report renderer needs about a multi-version run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRun {
    /// URLs the run attempted to fetch
    pub requested: usize,
    pub pages: Vec<PageRecord>,
    /// `false` when no English page was found and the first page was used
    pub baseline_matched: bool,
    pub aggregate: AggregateResult,
    pub consistency: ConsistencyReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum AnalysisOutcome {
    Compared(ComparisonRun),
    /// Only one page could be fetched; nothing to compare against
    SingleVersion { page: PageRecord, requested: usize },
}

/// Run the full analysis over `urls`.
///
/// Individual fetch failures are logged and skipped. Fails with
/// [`AnalysisError::NoContent`] only when no page at all was fetched.
pub async fn run_analysis(
    fetcher: &dyn PageFetcher,
    quality: &dyn QualityOracle,
    consistency: &dyn ConsistencyOracle,
    urls: &[String],
    options: &RunOptions,
) -> Result<AnalysisOutcome, AnalysisError> {
    let urls = collect_urls(fetcher, urls, options).await;
    let requested = urls.len();

    let pages = fetch_pages(fetcher, &urls).await;
    if pages.is_empty() {
        return Err(AnalysisError::NoContent);
    }

    if pages.len() < 2 {
        warn!("Only one language version available, skipping translation comparison");
        let page = pages.into_iter().next().ok_or(AnalysisError::NoContent)?;
        return Ok(AnalysisOutcome::SingleVersion { page, requested });
    }

    let selection = select_baseline(&pages)?;
    let baseline_matched = selection.matched;
    let aggregate = compare_versions(quality, selection.baseline, &pages).await;
    let consistency = check_consistency(consistency, &pages).await;

    info!(
        "Analysis complete: {} comparisons, overall score {}/100, {} issues ({} critical)",
        aggregate.comparisons.len(),
        aggregate.overall_score,
        aggregate.total_issues,
        aggregate.critical_issues
    );

    Ok(AnalysisOutcome::Compared(ComparisonRun {
        requested,
        pages,
        baseline_matched,
        aggregate,
        consistency,
    }))
}

/// Explicit URLs in order, followed by discovered links not already present.
/// Repeated URLs are kept once, at their first position.
///
/// Discovery requests the first URL separately from the later page fetch.
async fn collect_urls(
    fetcher: &dyn PageFetcher,
    urls: &[String],
    options: &RunOptions,
) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut all: Vec<String> = urls
        .iter()
        .filter(|url| seen.insert(url.to_string()))
        .cloned()
        .collect();
    if all.len() < urls.len() {
        warn!("Ignoring {} duplicate URLs", urls.len() - all.len());
    }

    if !options.discover || options.max_discovered == 0 {
        return all;
    }
    let Some(first) = all.first().cloned() else {
        return all;
    };

    match fetcher.discover_language_links(&first).await {
        Ok(links) => {
            let added: Vec<String> = links
                .into_iter()
                .filter(|link| seen.insert(link.clone()))
                .take(options.max_discovered)
                .collect();
            info!("Adding {} discovered language versions", added.len());
            all.extend(added);
        }
        Err(e) => warn!("Could not discover language links on {}: {}", first, e),
    }
    all
}

async fn fetch_pages(fetcher: &dyn PageFetcher, urls: &[String]) -> Vec<PageRecord> {
    let total = urls.len();
    let mut pages = Vec::with_capacity(total);
    let mut fail_count = 0;

    for (index, url) in urls.iter().enumerate() {
        let progress = index + 1;
        info!("[{}/{}] Fetching {}...", progress, total, url);

        match fetcher.fetch(url).await {
            Ok(page) => {
                info!(
                    "[{}/{}] ✓ {} - {} words ({})",
                    progress, total, url, page.word_count, page.detected_language
                );
                pages.push(page);
            }
            Err(e) => {
                fail_count += 1;
                warn!("[{}/{}] ✗ {} - {}", progress, total, url, e);
            }
        }
    }

    info!(
        "Fetch complete: {} successful, {} failed",
        pages.len(),
        fail_count
    );
    pages
}
