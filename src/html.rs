//! Regex-based HTML text extraction.
//!
//! Pages are treated as text, not parsed into a DOM: non-visible blocks are
//! stripped, then paragraphs, title, meta description, `lang` attribute and
//! anchors are pulled out with cached patterns.

use regex::Regex;
use reqwest::Url;
use std::collections::HashSet;
use std::sync::OnceLock;

static HIDDEN_BLOCK_REGEX: OnceLock<Regex> = OnceLock::new();
static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
static PARAGRAPH_REGEX: OnceLock<Regex> = OnceLock::new();
static BODY_REGEX: OnceLock<Regex> = OnceLock::new();
static TITLE_REGEX: OnceLock<Regex> = OnceLock::new();
static META_REGEX: OnceLock<Regex> = OnceLock::new();
static HTML_LANG_REGEX: OnceLock<Regex> = OnceLock::new();
static ANCHOR_REGEX: OnceLock<Regex> = OnceLock::new();
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static NUMERIC_ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();

/// Substrings in an href or link text that suggest another language version
const LANGUAGE_LINK_PATTERNS: &[&str] = &[
    "lang-", "language-", "locale-", "region-", "en/", "es/", "fr/", "de/", "it/", "pt/",
    "english", "spanish", "french", "german", "italian",
];

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static HTML pattern compiles"))
}

/// Everything extracted from one HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub description: String,
    pub html_lang: Option<String>,
    pub text: String,
}

/// Extract title, description, `lang` attribute and visible text.
///
/// Text comes from non-empty `<p>` elements; when a page has none, the whole
/// `<body>` is used instead.
pub fn extract_page(html: &str) -> ExtractedPage {
    let visible = strip_hidden(html);

    let paragraphs: Vec<String> = regex(&PARAGRAPH_REGEX, r"(?is)<p\b[^>]*>(.*?)</p\s*>")
        .captures_iter(&visible)
        .filter_map(|cap| cap.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|p| !p.is_empty())
        .collect();

    let text = if paragraphs.is_empty() {
        let body = regex(&BODY_REGEX, r"(?is)<body\b[^>]*>(.*?)(?:</body\s*>|$)")
            .captures(&visible)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str())
            .unwrap_or("");
        clean_text(body)
    } else {
        paragraphs.join(" ")
    };

    ExtractedPage {
        title: extract_title(&visible),
        description: extract_meta_description(html),
        html_lang: extract_html_lang(html),
        text,
    }
}

fn strip_hidden(html: &str) -> String {
    let without_comments = regex(&COMMENT_REGEX, r"(?s)<!--.*?-->").replace_all(html, " ");
    regex(
        &HIDDEN_BLOCK_REGEX,
        r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<noscript\b[^>]*>.*?</noscript\s*>",
    )
    .replace_all(&without_comments, " ")
    .into_owned()
}

pub fn extract_title(html: &str) -> String {
    regex(&TITLE_REGEX, r"(?is)<title\b[^>]*>(.*?)</title\s*>")
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| clean_text(m.as_str()))
        .unwrap_or_default()
}

pub fn extract_meta_description(html: &str) -> String {
    regex(&META_REGEX, r"(?is)<meta\b[^>]*>")
        .find_iter(html)
        .map(|m| m.as_str())
        .find(|tag| {
            attribute(tag, "name").is_some_and(|name| name.eq_ignore_ascii_case("description"))
        })
        .and_then(|tag| attribute(tag, "content"))
        .map(|content| clean_text(&content))
        .unwrap_or_default()
}

pub fn extract_html_lang(html: &str) -> Option<String> {
    regex(&HTML_LANG_REGEX, r#"(?is)<html\b[^>]*?\blang\s*=\s*["']([^"']*)["']"#)
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|lang| !lang.is_empty())
}

/// Value of a quoted attribute inside a single tag.
fn attribute(tag: &str, name: &str) -> Option<String> {
    let pattern = format!(r#"(?is)\b{}\s*=\s*(?:"([^"]*)"|'([^']*)')"#, regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    let cap = re.captures(tag)?;
    cap.get(1)
        .or_else(|| cap.get(2))
        .map(|m| m.as_str().to_string())
}

/// Links on the page that look like other language versions of it.
///
/// Resolved against `base_url`, fragments dropped, non-http(s) targets and
/// the page itself skipped, de-duplicated in document order.
pub fn extract_language_links(html: &str, base_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    seen.insert(without_fragment(&base));

    let mut links = Vec::new();
    for cap in regex(
        &ANCHOR_REGEX,
        r#"(?is)<a\b[^>]*?\bhref\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a\s*>"#,
    )
    .captures_iter(html)
    {
        let href = cap.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        let text = cap
            .get(2)
            .map(|m| clean_text(m.as_str()).to_lowercase())
            .unwrap_or_default();
        let href_lower = href.to_lowercase();

        if href.is_empty() || href.starts_with('#') {
            continue;
        }
        if !LANGUAGE_LINK_PATTERNS
            .iter()
            .any(|p| href_lower.contains(p) || text.contains(p))
        {
            continue;
        }

        let Ok(resolved) = base.join(href) else {
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        let resolved = without_fragment(&resolved);
        if seen.insert(resolved.clone()) {
            links.push(resolved);
        }
    }
    links
}

fn without_fragment(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

/// Strip tags, decode entities and collapse whitespace.
pub fn clean_text(fragment: &str) -> String {
    let without_tags = regex(&TAG_REGEX, r"(?s)<[^>]*>").replace_all(fragment, " ");
    let decoded = decode_entities(&without_tags);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    let numeric = regex(&NUMERIC_ENTITY_REGEX, r"&#([xX][0-9a-fA-F]+|[0-9]+);").replace_all(
        text,
        |cap: &regex::Captures| {
            let raw = &cap[1];
            let code = if let Some(hex) = raw.strip_prefix(['x', 'X']) {
                u32::from_str_radix(hex, 16).ok()
            } else {
                raw.parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map(|c| c.to_string())
                .unwrap_or_default()
        },
    );

    numeric
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&rsquo;", "\u{2019}")
        .replace("&lsquo;", "\u{2018}")
        .replace("&mdash;", "\u{2014}")
        .replace("&ndash;", "\u{2013}")
        .replace("&amp;", "&")
}

/// First `max_chars` characters of `text` (char boundary safe).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<!DOCTYPE html>
<html lang="de-DE">
<head>
  <title>Kompaktlader &amp; Bagger</title>
  <meta charset="utf-8">
  <meta content="Robuste Maschinen f&uuml;r jede Baustelle" name="description">
  <style>p { color: red; }</style>
  <script>var p = "<p>not visible</p>";</script>
</head>
<body>
  <nav><a href="/en/products/">English</a> <a href="/fr/">Fran&ccedil;ais</a></nav>
  <p>Die   <strong>Maschine</strong> ist robust.</p>
  <p>   </p>
  <!-- <p>commented out</p> -->
  <p class="lead">Preis: 10&nbsp;&euro; &#8211; jetzt</p>
</body>
</html>"#;

    // ==================== extract_page Tests ====================

    #[test]
    fn test_extract_page_paragraphs_only() {
        let page = extract_page(SAMPLE);

        assert_eq!(page.text, "Die Maschine ist robust. Preis: 10 &euro; \u{2013} jetzt");
        assert!(!page.text.contains("not visible"));
        assert!(!page.text.contains("commented out"));
    }

    #[test]
    fn test_extract_page_metadata() {
        let page = extract_page(SAMPLE);

        assert_eq!(page.title, "Kompaktlader & Bagger");
        assert_eq!(page.description, "Robuste Maschinen f&uuml;r jede Baustelle");
        assert_eq!(page.html_lang.as_deref(), Some("de-DE"));
    }

    #[test]
    fn test_extract_page_body_fallback() {
        let html = "<html><body><div>Only <b>div</b> text</div><script>x()</script></body></html>";
        let page = extract_page(html);

        assert_eq!(page.text, "Only div text");
        assert_eq!(page.title, "");
        assert_eq!(page.html_lang, None);
    }

    #[test]
    fn test_extract_page_empty_document() {
        let page = extract_page("");
        assert_eq!(page.text, "");
        assert_eq!(page.description, "");
    }

    #[test]
    fn test_paragraph_regex_ignores_param_and_pre() {
        let html = "<body><pre>code</pre><param name=x><p>real</p></body>";
        assert_eq!(extract_page(html).text, "real");
    }

    // ==================== Attribute Tests ====================

    #[test]
    fn test_html_lang_single_quotes() {
        assert_eq!(
            extract_html_lang("<html class='x' lang='es'>").as_deref(),
            Some("es")
        );
    }

    #[test]
    fn test_html_lang_empty_is_none() {
        assert_eq!(extract_html_lang(r#"<html lang="">"#), None);
    }

    #[test]
    fn test_meta_description_missing() {
        assert_eq!(extract_meta_description(r#"<meta name="keywords" content="a,b">"#), "");
    }

    // ==================== Language Link Tests ====================

    #[test]
    fn test_language_links_resolved_and_deduplicated() {
        let html = r##"
            <a href="/en/products/">English</a>
            <a href="/en/products/#top">English again</a>
            <a href="https://example.com/es/">Español</a>
            <a href="/about">About us</a>
            <a href="#lang-switch">Switch</a>
            <a href="mailto:info@example.com">English support</a>
            <a href="/de/">Deutsch</a>
        "##;

        let links = extract_language_links(html, "https://example.com/fr/");
        assert_eq!(
            links,
            vec![
                "https://example.com/en/products/".to_string(),
                "https://example.com/es/".to_string(),
                "https://example.com/de/".to_string(),
            ]
        );
    }

    #[test]
    fn test_language_links_match_on_text() {
        let html = r#"<a href="/site?l=2">Italian</a>"#;
        let links = extract_language_links(html, "https://example.com/");
        assert_eq!(links, vec!["https://example.com/site?l=2".to_string()]);
    }

    #[test]
    fn test_language_links_skip_self() {
        let html = r#"<a href="/en/">English</a>"#;
        let links = extract_language_links(html, "https://example.com/en/");
        assert!(links.is_empty());
    }

    #[test]
    fn test_language_links_invalid_base() {
        assert!(extract_language_links(r#"<a href="/en/">English</a>"#, "not a url").is_empty());
    }

    // ==================== Text Helper Tests ====================

    #[test]
    fn test_clean_text_decodes_entities() {
        assert_eq!(clean_text("Tom &amp; Jerry&#39;s &lt;show&gt;"), "Tom & Jerry's <show>");
        assert_eq!(clean_text("caf&#xE9;"), "café");
    }

    #[test]
    fn test_clean_text_does_not_double_decode() {
        assert_eq!(clean_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
    }
}
