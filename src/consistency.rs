use crate::oracle::ConsistencyOracle;
use crate::types::{ConsistencyReport, PageRecord};
use tracing::{info, warn};

/// Run the cross-version consistency check.
///
/// Supplementary output: any oracle failure yields an empty, zero-scored
/// report instead of an error.
pub async fn check_consistency(
    oracle: &dyn ConsistencyOracle,
    pages: &[PageRecord],
) -> ConsistencyReport {
    info!("Checking terminology consistency across {} pages", pages.len());

    match oracle.check(pages).await {
        Ok(report) => {
            info!(
                "Consistency score {}/100 ({} findings)",
                report.overall_consistency_score,
                report.finding_count()
            );
            report
        }
        Err(e) => {
            warn!("Consistency check failed, continuing without it: {:#}", e);
            ConsistencyReport::default()
        }
    }
}
