//! Integration tests for the translation audit pipeline
//!
//! Pages and the chat-completions endpoint are both served by wiremock, so
//! these tests run the real HTTP fetcher and OpenAI oracle end to end.

use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use translation_audit::{
    config::Config,
    error::AnalysisError,
    fetcher::HttpPageFetcher,
    oracle::OpenAiOracle,
    pipeline::{run_analysis, AnalysisOutcome, RunOptions},
    report,
    types::{Severity, ANALYSIS_ERROR},
};
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

// ==================== Test Helpers ====================

/// Create a test config pointing the oracle at the mock server
fn create_test_config(server_uri: &str) -> Config {
    Config {
        openai_api_key: "test-openai-key".to_string(),
        openai_model: "gpt-4o-mini".to_string(),
        openai_api_url: format!("{}/v1/chat/completions", server_uri),
        openai_max_tokens: 4000,
        openai_temperature: 0.3,
        request_timeout_secs: 5,
        user_agent: "Linguistic Analysis Tool 1.0".to_string(),
        max_content_length: 100_000,
        report_dir: ".".to_string(),
    }
}

fn create_html_page(lang: &str, title: &str, paragraphs: &[&str], extra: &str) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{}</p>", p)).collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="{}">
<head><title>{}</title><meta name="description" content="{} page"></head>
<body><nav>{}</nav>{}</body>
</html>"#,
        lang, title, title, extra, body
    )
}

fn create_openai_response(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
}

async fn mount_page(server: &MockServer, page_path: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

async fn mount_language_pages(server: &MockServer) {
    mount_page(
        server,
        "/en/",
        create_html_page(
            "en",
            "Compact loaders",
            &["The Acme compact loader is built for the toughest jobs."],
            r#"<a href="/de/">Deutsch</a><a href="/fr/">Français</a>"#,
        ),
    )
    .await;
    mount_page(
        server,
        "/de/",
        create_html_page(
            "de",
            "Kompaktlader",
            &["Der Acme Kompaktlader ist für die härtesten Einsätze gebaut."],
            "",
        ),
    )
    .await;
    mount_page(
        server,
        "/fr/",
        create_html_page(
            "fr",
            "Chargeuses compactes",
            &["La chargeuse compacte Acme est conçue pour les travaux les plus durs."],
            "",
        ),
    )
    .await;
}

async fn mount_quality_reply(server: &MockServer, target_label: &str, reply: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains(target_label))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_openai_response(reply)))
        .mount(server)
        .await;
}

async fn mount_consistency_reply(server: &MockServer, reply: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Analyze terminology consistency"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_openai_response(reply)))
        .mount(server)
        .await;
}

const GERMAN_REPLY: &str = r#"{"qualityScore": 90, "issues": [{"type": "style", "severity": "low", "message": "Slightly formal tone"}], "suggestions": ["Use a more direct tone"]}"#;

const CONSISTENCY_REPLY: &str = r#"{"inconsistentTerms": [{"term": "compact loader", "languages": ["en", "de", "fr"], "issue": "Three different renderings"}], "brandInconsistencies": [], "overallConsistencyScore": 75}"#;

// ==================== Full Pipeline Tests ====================

#[tokio::test]
async fn test_full_analysis_with_one_failed_comparison() {
    let server = MockServer::start().await;
    mount_language_pages(&server).await;
    mount_quality_reply(&server, "TRANSLATION (German, de)", GERMAN_REPLY).await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("TRANSLATION (French, fr)"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;
    mount_consistency_reply(&server, CONSISTENCY_REPLY).await;

    let config = create_test_config(&server.uri());
    let fetcher = HttpPageFetcher::new(&config).unwrap();
    let oracle = OpenAiOracle::new(config);
    let urls = vec![
        format!("{}/de/", server.uri()),
        format!("{}/en/", server.uri()),
        format!("{}/fr/", server.uri()),
    ];

    let outcome = run_analysis(&fetcher, &oracle, &oracle, &urls, &RunOptions::default())
        .await
        .expect("analysis should succeed");

    let AnalysisOutcome::Compared(run) = &outcome else {
        panic!("expected a comparison run, got {:?}", outcome);
    };
    assert_eq!(run.requested, 3);
    assert_eq!(run.pages.len(), 3);
    assert!(run.baseline_matched);

    let aggregate = &run.aggregate;
    assert_eq!(aggregate.baseline.url, urls[1]);
    assert_eq!(aggregate.baseline.language, "en");
    assert_eq!(aggregate.comparisons.len(), 2);

    let german = &aggregate.comparisons[0];
    assert_eq!(german.target_language, "de");
    assert_eq!(german.quality_score, 90);
    assert_eq!(german.issues[0].severity, Severity::Low);

    let french = &aggregate.comparisons[1];
    assert_eq!(french.target_language, "fr");
    assert_eq!(french.quality_score, 0);
    assert_eq!(french.issues.len(), 1);
    assert_eq!(french.issues[0].kind, ANALYSIS_ERROR);
    assert_eq!(french.issues[0].severity, Severity::Critical);

    assert_eq!(aggregate.overall_score, 45);
    assert_eq!(aggregate.total_issues, 2);
    assert_eq!(aggregate.critical_issues, 1);

    assert_eq!(run.consistency.overall_consistency_score, 75);
    assert_eq!(run.consistency.inconsistent_terms.len(), 1);

    let text = report::render(&outcome, Utc::now());
    assert!(text.contains("Overall score:    45/100 [ERROR] Poor"));
    assert!(text.contains("COMPARISON 1: German (de)"));
    assert!(text.contains("COMPARISON 2: French (fr)"));
    assert!(text.contains("compact loader [en, de, fr]"));
}

#[tokio::test]
async fn test_discovery_adds_linked_versions() {
    let server = MockServer::start().await;
    mount_language_pages(&server).await;
    mount_quality_reply(&server, "TRANSLATION (German, de)", GERMAN_REPLY).await;
    mount_quality_reply(
        &server,
        "TRANSLATION (French, fr)",
        r#"{"qualityScore": 70, "issues": []}"#,
    )
    .await;
    mount_consistency_reply(&server, CONSISTENCY_REPLY).await;

    let config = create_test_config(&server.uri());
    let fetcher = HttpPageFetcher::new(&config).unwrap();
    let oracle = OpenAiOracle::new(config);
    let urls = vec![format!("{}/en/", server.uri())];
    let options = RunOptions {
        discover: true,
        max_discovered: 5,
    };

    let outcome = run_analysis(&fetcher, &oracle, &oracle, &urls, &options)
        .await
        .expect("analysis should succeed");

    let AnalysisOutcome::Compared(run) = outcome else {
        panic!("expected a comparison run");
    };
    assert_eq!(run.requested, 3);
    let fetched: Vec<_> = run.pages.iter().map(|p| p.url.clone()).collect();
    assert_eq!(
        fetched,
        vec![
            format!("{}/en/", server.uri()),
            format!("{}/de/", server.uri()),
            format!("{}/fr/", server.uri()),
        ]
    );
    // (90 + 70) / 2
    assert_eq!(run.aggregate.overall_score, 80);
}

#[tokio::test]
async fn test_single_reachable_page_skips_comparison() {
    let server = MockServer::start().await;
    mount_language_pages(&server).await;
    Mock::given(method("GET"))
        .and(path("/missing/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    // No chat-completions mock: any oracle call would fail the expectations below
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let fetcher = HttpPageFetcher::new(&config).unwrap();
    let oracle = OpenAiOracle::new(config);
    let urls = vec![
        format!("{}/de/", server.uri()),
        format!("{}/missing/", server.uri()),
    ];

    let outcome = run_analysis(&fetcher, &oracle, &oracle, &urls, &RunOptions::default())
        .await
        .expect("single version is not an error");

    match &outcome {
        AnalysisOutcome::SingleVersion { page, requested } => {
            assert_eq!(*requested, 2);
            assert_eq!(page.detected_language, "de");
            assert_eq!(page.title, "Kompaktlader");
        }
        other => panic!("expected single version outcome, got {:?}", other),
    }

    let text = report::render(&outcome, Utc::now());
    assert!(text.contains("SINGLE LANGUAGE MODE"));
}

#[tokio::test]
async fn test_no_reachable_pages_is_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let fetcher = HttpPageFetcher::new(&config).unwrap();
    let oracle = OpenAiOracle::new(config);
    let urls = vec![
        format!("{}/en/", server.uri()),
        format!("{}/de/", server.uri()),
    ];

    let result = run_analysis(&fetcher, &oracle, &oracle, &urls, &RunOptions::default()).await;

    assert!(matches!(result, Err(AnalysisError::NoContent)));
}

#[tokio::test]
async fn test_requests_carry_configured_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("User-Agent", "Linguistic Analysis Tool 1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(create_html_page(
            "en",
            "Home",
            &["Welcome to the site and the product range."],
            "",
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-openai-key"))
        .and(body_string_contains("\"response_format\":{\"type\":\"json_object\"}"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(create_openai_response(r#"{"qualityScore": 100}"#)),
        )
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let fetcher = HttpPageFetcher::new(&config).unwrap();
    let oracle = OpenAiOracle::new(config);
    let urls = vec![
        format!("{}/en/", server.uri()),
        format!("{}/en-gb/", server.uri()),
    ];

    let outcome = run_analysis(&fetcher, &oracle, &oracle, &urls, &RunOptions::default())
        .await
        .unwrap();

    let AnalysisOutcome::Compared(run) = outcome else {
        panic!("expected a comparison run");
    };
    assert_eq!(run.aggregate.comparisons.len(), 1);
    assert_eq!(run.aggregate.overall_score, 100);
    assert_eq!(run.aggregate.total_issues, 0);
}

// ==================== Report Output Tests ====================

#[tokio::test]
async fn test_report_and_json_export_written() {
    let server = MockServer::start().await;
    mount_language_pages(&server).await;
    mount_quality_reply(&server, "TRANSLATION (German, de)", GERMAN_REPLY).await;
    mount_consistency_reply(&server, CONSISTENCY_REPLY).await;

    let config = create_test_config(&server.uri());
    let fetcher = HttpPageFetcher::new(&config).unwrap();
    let oracle = OpenAiOracle::new(config);
    let urls = vec![
        format!("{}/en/", server.uri()),
        format!("{}/de/", server.uri()),
    ];
    let outcome = run_analysis(&fetcher, &oracle, &oracle, &urls, &RunOptions::default())
        .await
        .unwrap();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let generated_at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    let text = report::render(&outcome, generated_at);

    let report_path = report::save_report(temp_dir.path(), generated_at, &text).unwrap();
    assert_eq!(
        report_path.file_name().unwrap().to_str().unwrap(),
        "translation-analysis-2024-03-01T08-00-00-000Z.txt"
    );
    let saved = std::fs::read_to_string(&report_path).unwrap();
    assert!(saved.contains("Overall score:    90/100 [OK] Good"));
    assert!(saved.contains("[GOOD] Minor issues found"));

    let json_path = temp_dir.path().join("exports").join("result.json");
    report::save_json_export(&json_path, &outcome, generated_at).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["outcome"]["mode"], "compared");
    assert_eq!(json["outcome"]["aggregate"]["overallScore"], 90);
    assert_eq!(
        json["outcome"]["aggregate"]["comparisons"][0]["targetLanguage"],
        "de"
    );
}
