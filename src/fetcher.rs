use crate::config::Config;
use crate::error::FetchError;
use crate::html::{self, truncate_chars};
use crate::i18n::detect_language;
use crate::types::PageRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Redirects followed before a fetch is treated as failed
const MAX_REDIRECTS: usize = 5;

/// Turns URLs into page records.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PageRecord, FetchError>;

    /// URLs of other language versions linked from `url`.
    async fn discover_language_links(&self, _url: &str) -> Result<Vec<String>, FetchError> {
        Ok(Vec::new())
    }
}

/// `PageFetcher` backed by a single reqwest client.
pub struct HttpPageFetcher {
    client: reqwest::Client,
    max_content_length: usize,
}

impl HttpPageFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .context("Failed to build HTTP client for page fetching")?;

        Ok(Self {
            client,
            max_content_length: config.max_content_length,
        })
    }

    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }

    /// Build a page record from raw HTML.
    pub fn parse_page(&self, url: &str, html: &str) -> PageRecord {
        let extracted = html::extract_page(html);

        let mut body_text = extracted.text;
        if body_text.chars().count() > self.max_content_length {
            warn!(
                "Content of {} truncated to {} characters",
                url, self.max_content_length
            );
            body_text = truncate_chars(&body_text, self.max_content_length).to_string();
        }

        let detected_language = detect_language(extracted.html_lang.as_deref(), &body_text);
        let word_count = body_text.split_whitespace().count();

        PageRecord {
            url: url.to_string(),
            title: extracted.title,
            description: extracted.description,
            body_text,
            detected_language,
            word_count,
            fetched_at: Utc::now(),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<PageRecord, FetchError> {
        debug!("GET {}", url);
        let html = self.fetch_html(url).await?;
        let page = self.parse_page(url, &html);

        info!(
            "Extracted {} words from {} (language: {})",
            page.word_count, url, page.detected_language
        );
        Ok(page)
    }

    async fn discover_language_links(&self, url: &str) -> Result<Vec<String>, FetchError> {
        let html = self.fetch_html(url).await?;
        let links = html::extract_language_links(&html, url);
        info!("Found {} potential language links on {}", links.len(), url);
        Ok(links)
    }
}
