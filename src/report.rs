//! Plain-text report rendering and report files.

use crate::i18n::LanguageRegistry;
use crate::pipeline::{AnalysisOutcome, ComparisonRun};
use crate::types::{Comparison, ConsistencyReport, PageRecord};
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const RULE_WIDTH: usize = 80;

fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn section(out: &mut String, title: &str) {
    out.push('\n');
    line(out, title);
    line(out, &rule('-'));
}

fn language_label(code: &str) -> String {
    format!("{} ({})", LanguageRegistry::get().display_name(code), code)
}

fn push_suggestion(out: &mut String, suggestion: Option<&String>) {
    if let Some(suggestion) = suggestion {
        line(out, &format!("      Suggestion: {}", suggestion));
    }
}

/// Rating shown next to a 0-100 score
pub fn score_rating(score: u8) -> &'static str {
    match score {
        80..=100 => "[OK] Good",
        60..=79 => "[WARN] Fair",
        _ => "[ERROR] Poor",
    }
}

/// One-line verdict over all comparisons and consistency findings
pub fn overall_assessment(total_issues: usize, consistency_findings: usize) -> &'static str {
    if total_issues == 0 && consistency_findings == 0 {
        "[EXCELLENT] No significant issues found."
    } else if total_issues < 5 && consistency_findings < 3 {
        "[GOOD] Minor issues found that can be easily addressed."
    } else {
        "[ATTENTION NEEDED] Multiple issues found that require review."
    }
}

/// Render either kind of outcome.
pub fn render(outcome: &AnalysisOutcome, generated_at: DateTime<Utc>) -> String {
    match outcome {
        AnalysisOutcome::Compared(run) => render_comparison_report(run, generated_at),
        AnalysisOutcome::SingleVersion { page, requested } => {
            render_single_version_report(page, *requested, generated_at)
        }
    }
}

fn render_header(out: &mut String, generated_at: DateTime<Utc>) {
    line(out, &rule('='));
    line(out, "TRANSLATION QUALITY ANALYSIS REPORT");
    line(out, &rule('='));
    line(
        out,
        &format!(
            "Generated: {}",
            generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
    );
}

fn render_pages_table(out: &mut String, pages: &[PageRecord], requested: usize) {
    section(
        out,
        &format!("PAGES ANALYZED ({} of {} requested)", pages.len(), requested),
    );
    for page in pages {
        line(
            out,
            &format!(
                "  {:<18} {:>7} words  {}",
                language_label(&page.detected_language),
                page.word_count,
                page.url
            ),
        );
    }
}

/// Full report for a run with at least two language versions.
pub fn render_comparison_report(run: &ComparisonRun, generated_at: DateTime<Utc>) -> String {
    let aggregate = &run.aggregate;
    let baseline = &aggregate.baseline;
    let mut out = String::new();
    render_header(&mut out, generated_at);

    section(&mut out, "BASELINE");
    line(&mut out, &format!("URL:      {}", baseline.url));
    line(&mut out, &format!("Language: {}", language_label(&baseline.language)));
    line(&mut out, &format!("Title:    {}", baseline.title));
    line(&mut out, &format!("Words:    {}", baseline.word_count));
    if !run.baseline_matched {
        line(
            &mut out,
            "WARNING: No English version found; the first page was used as baseline.",
        );
    }

    section(&mut out, "SUMMARY");
    line(
        &mut out,
        &format!(
            "Pages analyzed:   {} of {} requested",
            run.pages.len(),
            run.requested
        ),
    );
    line(&mut out, &format!("Comparisons:      {}", aggregate.comparisons.len()));
    line(
        &mut out,
        &format!(
            "Overall score:    {}/100 {}",
            aggregate.overall_score,
            score_rating(aggregate.overall_score)
        ),
    );
    line(&mut out, &format!("Total issues:     {}", aggregate.total_issues));
    line(&mut out, &format!("Critical issues:  {}", aggregate.critical_issues));

    for (index, comparison) in aggregate.comparisons.iter().enumerate() {
        render_comparison(&mut out, index + 1, comparison);
    }

    render_consistency(&mut out, &run.consistency);
    render_pages_table(&mut out, &run.pages, run.requested);

    out.push('\n');
    line(&mut out, &rule('='));
    line(
        &mut out,
        overall_assessment(aggregate.total_issues, run.consistency.finding_count()),
    );
    line(&mut out, &rule('='));
    out
}

fn render_comparison(out: &mut String, number: usize, comparison: &Comparison) {
    section(
        out,
        &format!(
            "COMPARISON {}: {}",
            number,
            language_label(&comparison.target_language)
        ),
    );
    line(out, &format!("URL:   {}", comparison.target_url));
    line(out, &format!("Title: {}", comparison.target_title));
    line(
        out,
        &format!(
            "Score: {}/100 {}",
            comparison.quality_score,
            score_rating(comparison.quality_score)
        ),
    );
    if !LanguageRegistry::get().is_supported(&comparison.target_language) {
        line(
            out,
            "Note: language is not in the supported set; treat the score with care.",
        );
    }

    if comparison.issues.is_empty() {
        line(out, "Issues: none");
    } else {
        line(out, &format!("Issues ({}):", comparison.issues.len()));
        for issue in &comparison.issues {
            line(
                out,
                &format!(
                    "  - [{}] {}: {}",
                    issue.severity.as_str().to_uppercase(),
                    issue.kind,
                    issue.message
                ),
            );
            if let Some(context) = &issue.context {
                line(out, &format!("      Context: {}", context));
            }
            push_suggestion(out, issue.suggestion.as_ref());
        }
    }

    if !comparison.terminology_issues.is_empty() {
        line(out, "Terminology:");
        for term in &comparison.terminology_issues {
            line(out, &format!("  - {}: {}", term.term, term.issue));
            push_suggestion(out, term.suggestion.as_ref());
        }
    }

    if !comparison.brand_consistency.is_empty() {
        line(out, "Brand consistency:");
        for note in &comparison.brand_consistency {
            line(out, &format!("  - {}: {}", note.brand, note.issue));
            push_suggestion(out, note.suggestion.as_ref());
        }
    }

    if !comparison.suggestions.is_empty() {
        line(out, "Suggestions:");
        for (i, suggestion) in comparison.suggestions.iter().enumerate() {
            line(out, &format!("  {}. {}", i + 1, suggestion));
        }
    }
}

fn render_consistency(out: &mut String, consistency: &ConsistencyReport) {
    section(out, "TERMINOLOGY CONSISTENCY");
    line(
        out,
        &format!(
            "Consistency score: {}/100",
            consistency.overall_consistency_score
        ),
    );

    if consistency.inconsistent_terms.is_empty() {
        line(out, "Inconsistent terms: none");
    } else {
        line(out, "Inconsistent terms:");
        for term in &consistency.inconsistent_terms {
            line(
                out,
                &format!(
                    "  - {} [{}]: {}",
                    term.term,
                    term.languages.join(", "),
                    term.issue
                ),
            );
            push_suggestion(out, term.suggestion.as_ref());
        }
    }

    if consistency.brand_inconsistencies.is_empty() {
        line(out, "Brand inconsistencies: none");
    } else {
        line(out, "Brand inconsistencies:");
        for note in &consistency.brand_inconsistencies {
            line(out, &format!("  - {}: {}", note.brand, note.issue));
            push_suggestion(out, note.suggestion.as_ref());
        }
    }
}

/// Degraded report when only one language version could be fetched.
pub fn render_single_version_report(
    page: &PageRecord,
    requested: usize,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    render_header(&mut out, generated_at);

    section(&mut out, "SINGLE LANGUAGE MODE");
    line(
        &mut out,
        "Translation comparison requires at least 2 language versions; only 1 was available.",
    );
    line(&mut out, "No quality scores or consistency checks were produced.");
    out.push('\n');
    line(&mut out, &format!("URL:         {}", page.url));
    line(
        &mut out,
        &format!("Language:    {}", language_label(&page.detected_language)),
    );
    line(&mut out, &format!("Title:       {}", page.title));
    if !page.description.is_empty() {
        line(&mut out, &format!("Description: {}", page.description));
    }
    line(&mut out, &format!("Words:       {}", page.word_count));

    render_pages_table(&mut out, std::slice::from_ref(page), requested);

    out.push('\n');
    line(&mut out, &rule('='));
    out
}

/// `translation-analysis-<ISO 8601 with ':' and '.' replaced by '-'>.txt`
pub fn report_filename(generated_at: DateTime<Utc>) -> String {
    let stamp = generated_at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("translation-analysis-{}.txt", stamp)
}

/// Write the rendered report into `dir`, creating it if needed.
pub fn save_report(dir: &Path, generated_at: DateTime<Utc>, text: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory {}", dir.display()))?;

    let path = dir.join(report_filename(generated_at));
    fs::write(&path, text)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    info!("Saved report to {}", path.display());
    Ok(path)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    generated_at: DateTime<Utc>,
    outcome: &'a AnalysisOutcome,
}

/// Write the outcome as pretty-printed JSON.
pub fn save_json_export(
    path: &Path,
    outcome: &AnalysisOutcome,
    generated_at: DateTime<Utc>,
) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonExport {
        generated_at,
        outcome,
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, json)
        .with_context(|| format!("Failed to write JSON export to {}", path.display()))?;

    info!("Saved JSON export to {}", path.display());
    Ok(())
}
