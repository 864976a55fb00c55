//! Language support: the registry of analyzable languages and page
//! language detection.
//!
//! - `registry`: supported languages, their names, and the canonical baseline language
//! - `detector`: `<html lang>` normalization with a stop-word fallback

mod detector;
mod registry;

pub use detector::{detect_from_text, detect_language, normalize_lang_attribute};
pub use registry::{LanguageConfig, LanguageRegistry};
