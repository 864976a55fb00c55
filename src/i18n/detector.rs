//! Page language detection.
//!
//! The `<html lang>` attribute wins when present. Otherwise body text is
//! scored against short stop-word lists and the best match is returned.

use crate::types::UNKNOWN_LANGUAGE;
use std::collections::HashSet;

/// Texts shorter than this are never guessed
const MIN_DETECTABLE_CHARS: usize = 10;

/// Stop words per language: very frequent function words that rarely collide
/// across the listed languages.
const STOP_WORDS: &[(&str, &[&str])] = &[
    ("en", &["the", "and", "of", "to", "is", "with", "for", "that", "this", "are", "you", "our"]),
    ("es", &["el", "los", "las", "y", "para", "con", "una", "por", "es", "del", "que", "nuestro"]),
    ("fr", &["le", "les", "et", "des", "pour", "avec", "une", "est", "du", "dans", "nous", "vous"]),
    (
        "de",
        &[
            "der", "die", "und", "das", "mit", "für", "ist", "ein", "eine", "nicht", "wir", "sie",
        ],
    ),
    (
        "it",
        &[
            "il", "gli", "della", "per", "con", "una", "sono", "che", "di", "nostro", "delle", "è",
        ],
    ),
    ("pt", &["os", "as", "para", "com", "uma", "não", "são", "do", "da", "em", "nosso", "você"]),
    ("nl", &["de", "het", "een", "en", "van", "voor", "met", "niet", "zijn", "wij", "onze", "ook"]),
    ("pl", &["i", "w", "na", "się", "jest", "z", "do", "nie", "oraz", "dla", "że", "nasze"]),
    (
        "cs",
        &[
            "je", "pro", "jsou", "jsme", "naše", "také", "který", "která", "které", "při", "ale",
            "a", "se", "to",
        ],
    ),
    (
        "sk",
        &[
            "sa", "pre", "sú", "sme", "naša", "tiež", "ktorý", "ktorá", "ktoré", "pri", "ako", "aj",
            "je", "a",
        ],
    ),
    (
        "hu",
        &[
            "a", "az", "és", "hogy", "nem", "egy", "is", "van", "vagy", "meg", "ez", "mint", "csak",
            "már",
        ],
    ),
    (
        "ro",
        &[
            "și", "în", "cu", "pentru", "este", "sunt", "care", "din", "la", "pe", "mai", "nu", "o",
            "un",
        ],
    ),
    ("bg", &["и", "на", "за", "от", "с", "е", "се", "да", "не", "са", "това", "като", "по", "че"]),
    (
        "hr",
        &[
            "je", "i", "u", "za", "su", "od", "koji", "kao", "što", "ili", "nije", "smo", "jer",
            "naša",
        ],
    ),
    (
        "sl",
        &[
            "je", "in", "v", "za", "so", "da", "ki", "tudi", "pa", "smo", "ali", "kot", "naše",
            "bo",
        ],
    ),
    (
        "et",
        &[
            "ja", "on", "ei", "et", "see", "ka", "kui", "ning", "oma", "mis", "nii", "või", "oli",
            "meie",
        ],
    ),
    (
        "lv",
        &[
            "un", "ir", "ar", "uz", "par", "no", "kas", "ka", "arī", "bet", "vai", "nav", "mēs",
            "mūsu",
        ],
    ),
    (
        "lt",
        &[
            "ir", "yra", "su", "kad", "bet", "tai", "jo", "arba", "nėra", "mes", "mūsų", "apie",
            "iš", "į",
        ],
    ),
];

/// Primary subtag of an `<html lang>` value, lowercased (`en-US` → `en`).
pub fn normalize_lang_attribute(value: &str) -> Option<String> {
    let primary = value
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    if primary.len() < 2 || primary.len() > 3 || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(primary)
}

/// Guess a language code from body text, or `"unknown"`.
pub fn detect_from_text(text: &str) -> String {
    if text.trim().chars().count() < MIN_DETECTABLE_CHARS {
        return UNKNOWN_LANGUAGE.to_string();
    }

    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();

    let mut best: Option<(&str, usize)> = None;
    for (code, stop_words) in STOP_WORDS {
        let set: HashSet<&str> = stop_words.iter().copied().collect();
        let hits = words.iter().filter(|w| set.contains(w.as_str())).count();
        // Ties keep the earlier entry
        if hits > 0 && best.map_or(true, |(_, top)| hits > top) {
            best = Some((code, hits));
        }
    }

    best.map(|(code, _)| code.to_string())
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string())
}

/// Resolve the language of a page from its `lang` attribute and text.
pub fn detect_language(html_lang: Option<&str>, text: &str) -> String {
    html_lang
        .and_then(normalize_lang_attribute)
        .unwrap_or_else(|| detect_from_text(text))
}
