//! Records shared between the fetcher, the oracles, the comparator and the
//! report renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Language code used when a page's language cannot be determined
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Issue type attached to comparisons whose oracle call failed
pub const ANALYSIS_ERROR: &str = "analysis_error";

/// One fetched page and its extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub body_text: String,
    /// ISO 639-1 code, or `"unknown"`
    pub detected_language: String,
    pub word_count: usize,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum Severity {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl From<String> for Severity {
    /// Lenient: model output is free text, unknown labels count as medium
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "critical" | "blocker" => Severity::Critical,
            "high" | "major" => Severity::High,
            "low" | "minor" | "trivial" => Severity::Low,
            _ => Severity::Medium,
        }
    }
}

impl From<Option<String>> for Severity {
    /// A missing or `null` label counts as medium
    fn from(value: Option<String>) -> Self {
        value.map(Severity::from).unwrap_or_default()
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(
        rename = "type",
        default = "default_issue_type",
        deserialize_with = "deserialize_issue_type"
    )]
    pub kind: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(
        default,
        alias = "issue",
        alias = "description",
        deserialize_with = "null_as_default"
    )]
    pub message: String,
    #[serde(default, alias = "text", skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, alias = "correction", skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

fn default_issue_type() -> String {
    "general".to_string()
}

fn deserialize_issue_type<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_issue_type))
}

/// Model replies use `null` for "nothing here" as often as they omit the key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Issue {
    /// Synthetic issue recorded when a target page could not be analyzed
    pub fn analysis_error(reason: &str) -> Self {
        Self {
            kind: ANALYSIS_ERROR.to_string(),
            severity: Severity::Critical,
            message: format!("Content could not be analyzed: {}", reason),
            context: None,
            suggestion: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminologyIssue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub term: String,
    #[serde(default, alias = "message", deserialize_with = "null_as_default")]
    pub issue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandNote {
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,
    #[serde(default, alias = "message", deserialize_with = "null_as_default")]
    pub issue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Parsed Quality Oracle answer for one (baseline, target) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAssessment {
    #[serde(alias = "quality_score", deserialize_with = "deserialize_score")]
    pub quality_score: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issues: Vec<Issue>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggestions: Vec<String>,
    #[serde(default, alias = "terminology_issues", deserialize_with = "null_as_default")]
    pub terminology_issues: Vec<TerminologyIssue>,
    #[serde(default, alias = "brand_consistency", deserialize_with = "null_as_default")]
    pub brand_consistency: Vec<BrandNote>,
}

/// Result of evaluating one non-baseline page against the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub target_url: String,
    pub target_language: String,
    pub target_title: String,
    pub quality_score: u8,
    pub issues: Vec<Issue>,
    pub suggestions: Vec<String>,
    pub terminology_issues: Vec<TerminologyIssue>,
    pub brand_consistency: Vec<BrandNote>,
}

impl Comparison {
    pub fn from_assessment(target: &PageRecord, assessment: QualityAssessment) -> Self {
        Self {
            target_url: target.url.clone(),
            target_language: target.detected_language.clone(),
            target_title: target.title.clone(),
            quality_score: assessment.quality_score,
            issues: assessment.issues,
            suggestions: assessment.suggestions,
            terminology_issues: assessment.terminology_issues,
            brand_consistency: assessment.brand_consistency,
        }
    }

    /// Zero-score comparison standing in for a failed oracle call
    pub fn degraded(target: &PageRecord, reason: &str) -> Self {
        Self {
            target_url: target.url.clone(),
            target_language: target.detected_language.clone(),
            target_title: target.title.clone(),
            quality_score: 0,
            issues: vec![Issue::analysis_error(reason)],
            suggestions: Vec::new(),
            terminology_issues: Vec::new(),
            brand_consistency: Vec::new(),
        }
    }

    pub fn critical_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Critical)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineSummary {
    pub url: String,
    pub language: String,
    pub title: String,
    pub word_count: usize,
}

impl From<&PageRecord> for BaselineSummary {
    fn from(page: &PageRecord) -> Self {
        Self {
            url: page.url.clone(),
            language: page.detected_language.clone(),
            title: page.title.clone(),
            word_count: page.word_count,
        }
    }
}

/// Aggregated comparisons against one baseline.
///
/// Only constructed through [`AggregateResult::new`], which derives the
/// totals from the comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub baseline: BaselineSummary,
    pub comparisons: Vec<Comparison>,
    pub overall_score: u8,
    pub total_issues: usize,
    pub critical_issues: usize,
}

impl AggregateResult {
    pub fn new(baseline: BaselineSummary, comparisons: Vec<Comparison>) -> Self {
        let overall_score = mean_score(&comparisons);
        let total_issues = comparisons.iter().map(|c| c.issues.len()).sum();
        let critical_issues = comparisons.iter().map(Comparison::critical_count).sum();

        Self {
            baseline,
            comparisons,
            overall_score,
            total_issues,
            critical_issues,
        }
    }
}

/// Rounded mean of comparison scores (half rounds up), 0 when empty
fn mean_score(comparisons: &[Comparison]) -> u8 {
    if comparisons.is_empty() {
        return 0;
    }
    let sum: u64 = comparisons.iter().map(|c| u64::from(c.quality_score)).sum();
    let mean = sum as f64 / comparisons.len() as f64;
    mean.round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermInconsistency {
    #[serde(default, deserialize_with = "null_as_default")]
    pub term: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    #[serde(default, alias = "message", deserialize_with = "null_as_default")]
    pub issue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Cross-version terminology and brand consistency findings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    #[serde(
        default,
        alias = "inconsistent_terms",
        alias = "inconsistencies",
        deserialize_with = "null_as_default"
    )]
    pub inconsistent_terms: Vec<TermInconsistency>,
    #[serde(
        default,
        alias = "brand_inconsistencies",
        alias = "brand_issues",
        deserialize_with = "null_as_default"
    )]
    pub brand_inconsistencies: Vec<BrandNote>,
    #[serde(
        default,
        alias = "overall_consistency_score",
        alias = "consistency_score",
        deserialize_with = "deserialize_score"
    )]
    pub overall_consistency_score: u8,
}

impl ConsistencyReport {
    pub fn finding_count(&self) -> usize {
        self.inconsistent_terms.len() + self.brand_inconsistencies.len()
    }
}

/// Accept a 0-100 score as a JSON number or numeric string, clamped and rounded
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_json::Value::deserialize(deserializer)?;
    let raw = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| D::Error::custom(format!("invalid score: {}", value)))?;

    if !raw.is_finite() {
        return Err(D::Error::custom("score is not finite"));
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}
