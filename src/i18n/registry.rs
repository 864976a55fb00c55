//! Language registry: the languages pages may be analyzed in.
//!
//! Initialized lazily with `OnceLock` and immutable afterwards.

use std::sync::OnceLock;

/// Metadata for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "es", "fr")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Spanish", "French")
    pub name: &'static str,

    /// Whether this is the preferred baseline language (only one should be true)
    pub is_canonical: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get the canonical (baseline) language configuration.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one canonical language.
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    /// English name for a code, or the upper-cased code when unknown.
    pub fn display_name(&self, code: &str) -> String {
        self.get_by_code(code)
            .map(|lang| lang.name.to_string())
            .unwrap_or_else(|| code.to_uppercase())
    }
}

fn lang(code: &'static str, name: &'static str) -> LanguageConfig {
    LanguageConfig {
        code,
        name,
        is_canonical: false,
    }
}

/// Languages supported for analysis. English is the canonical baseline.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            is_canonical: true,
        },
        lang("es", "Spanish"),
        lang("fr", "French"),
        lang("de", "German"),
        lang("it", "Italian"),
        lang("pt", "Portuguese"),
        lang("nl", "Dutch"),
        lang("pl", "Polish"),
        lang("cs", "Czech"),
        lang("sk", "Slovak"),
        lang("hu", "Hungarian"),
        lang("ro", "Romanian"),
        lang("bg", "Bulgarian"),
        lang("hr", "Croatian"),
        lang("sl", "Slovenian"),
        lang("et", "Estonian"),
        lang("lv", "Latvian"),
        lang("lt", "Lithuanian"),
    ]
}
