//! Quality and consistency judgments delegated to a chat-completions model.
//!
//! The comparator only sees the two traits: an oracle returns a structured
//! result or an error. Prompting and reply salvaging live in the OpenAI
//! adapter below.

use crate::config::Config;
use crate::html::truncate_chars;
use crate::i18n::LanguageRegistry;
use crate::openai::{complete_json, parse_json_reply};
use crate::types::{ConsistencyReport, PageRecord, QualityAssessment};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

/// Characters of each page embedded in a quality request
pub const QUALITY_TEXT_BUDGET: usize = 2000;

/// Characters of each page embedded in a consistency request
pub const CONSISTENCY_TEXT_BUDGET: usize = 1500;

/// Scores one translated page against the baseline.
#[async_trait]
pub trait QualityOracle: Send + Sync {
    async fn assess(&self, baseline: &PageRecord, target: &PageRecord) -> Result<QualityAssessment>;
}

/// Checks terminology and brand usage across all versions.
#[async_trait]
pub trait ConsistencyOracle: Send + Sync {
    async fn check(&self, pages: &[PageRecord]) -> Result<ConsistencyReport>;
}

/// Both oracles backed by the OpenAI chat-completions API.
pub struct OpenAiOracle {
    client: reqwest::Client,
    config: Config,
}

impl OpenAiOracle {
    pub fn new(config: Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl QualityOracle for OpenAiOracle {
    async fn assess(&self, baseline: &PageRecord, target: &PageRecord) -> Result<QualityAssessment> {
        debug!("Requesting quality assessment for {}", target.url);
        let reply = complete_json(
            &self.client,
            &self.config,
            QUALITY_SYSTEM_PROMPT,
            &build_quality_prompt(baseline, target),
        )
        .await?;

        parse_json_reply(&reply)
            .with_context(|| format!("Unusable quality assessment for {}", target.url))
    }
}

#[async_trait]
impl ConsistencyOracle for OpenAiOracle {
    async fn check(&self, pages: &[PageRecord]) -> Result<ConsistencyReport> {
        debug!("Requesting consistency check across {} pages", pages.len());
        let reply = complete_json(
            &self.client,
            &self.config,
            CONSISTENCY_SYSTEM_PROMPT,
            &build_consistency_prompt(pages),
        )
        .await?;

        parse_json_reply(&reply).context("Unusable consistency report")
    }
}

const QUALITY_SYSTEM_PROMPT: &str = "You are an expert linguist and translation quality analyst. \
You compare a translated web page against its source version and give detailed, actionable \
feedback. Always answer with a single JSON object.";

const CONSISTENCY_SYSTEM_PROMPT: &str = "You are an expert in terminology management and \
translation consistency. You analyze how terms and brand names are used across language \
versions of the same website. Always answer with a single JSON object.";

fn describe_page(label: &str, page: &PageRecord, budget: usize) -> String {
    format!(
        "{} ({}, {}):\nURL: {}\nTitle: {}\n{}\n",
        label,
        LanguageRegistry::get().display_name(&page.detected_language),
        page.detected_language,
        page.url,
        page.title,
        truncate_chars(&page.body_text, budget)
    )
}

/// Build the user prompt for one baseline/target comparison
fn build_quality_prompt(baseline: &PageRecord, target: &PageRecord) -> String {
    format!(
        r#"Compare the translated page against the baseline page.

{}
{}
Evaluate:
1. Translation accuracy: mistranslations, omissions, additions
2. Grammar and spelling in the translated text
3. Style and tone: awkward phrasing, register, readability
4. Terminology: technical terms translated inconsistently or incorrectly
5. Brand consistency: brand and product names altered, translated or misspelled

Respond with JSON in exactly this shape:
{{
  "qualityScore": 0-100,
  "issues": [{{"type": "mistranslation|grammar|style|terminology|omission|other", "severity": "critical|high|medium|low", "message": "what is wrong", "context": "affected text", "suggestion": "improvement"}}],
  "suggestions": ["general improvement"],
  "terminologyIssues": [{{"term": "term", "issue": "description", "suggestion": "correction"}}],
  "brandConsistency": [{{"brand": "name", "issue": "description", "suggestion": "correction"}}]
}}"#,
        describe_page("BASELINE", baseline, QUALITY_TEXT_BUDGET),
        describe_page("TRANSLATION", target, QUALITY_TEXT_BUDGET),
    )
}

/// Build the user prompt for the cross-version consistency check
fn build_consistency_prompt(pages: &[PageRecord]) -> String {
    let versions = pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            describe_page(&format!("VERSION {}", i + 1), page, CONSISTENCY_TEXT_BUDGET)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Analyze terminology consistency across these {} language versions of one website.

{}
Check for:
1. Terms used inconsistently across languages
2. Brand name variations or misspellings
3. Technical term inconsistencies
4. Cultural adaptation issues

Respond with JSON in exactly this shape:
{{
  "inconsistentTerms": [{{"term": "term", "languages": ["en", "de"], "issue": "description", "suggestion": "correction"}}],
  "brandInconsistencies": [{{"brand": "name", "issue": "description", "suggestion": "correction"}}],
  "overallConsistencyScore": 0-100
}}"#,
        pages.len(),
        versions
    )
}
