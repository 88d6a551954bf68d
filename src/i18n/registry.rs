//! Language registry: single source of truth for all supported languages.
//!
//! The registry lists every language the front-end can display, together with
//! the code the translation backend expects for it. It uses a singleton
//! pattern with `OnceLock` to ensure thread-safe initialization and access.

use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Language code used by the front-end (e.g., "en", "tl")
    pub code: &'static str,

    /// English name of the language (e.g., "Filipino", "Korean")
    pub name: &'static str,

    /// Native name of the language (e.g., "Tagalog", "한국어")
    pub native_name: &'static str,

    /// Code the translation backend expects for this language.
    /// Usually identical to `code`; the backend uses "fil" where the
    /// front-end uses "tl".
    pub backend_code: &'static str,

    /// Whether this is the default language (only one should be true)
    pub is_default: bool,

    /// Whether this language is enabled for use
    pub enabled: bool,
}

/// Global language registry singleton.
///
/// Initialized once on first access and immutable thereafter.
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

    /// Get a language configuration by its front-end code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Map a front-end language code to the code the backend expects.
    ///
    /// Unrecognized codes map to the backend code of the default language,
    /// so a request can always be issued.
    pub fn backend_code(&self, code: &str) -> &'static str {
        self.get_by_code(code)
            .map(|lang| lang.backend_code)
            .unwrap_or_else(|| self.default().backend_code)
    }

    /// Get all enabled languages.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Get the default language configuration.
    ///
    /// Used when no persisted locale selection exists and as the target of
    /// unrecognized-code mapping.
    ///
    /// # Panics
    /// Panics if no default language is found or if multiple defaults are
    /// defined (this indicates a configuration error).
    pub fn default(&self) -> &LanguageConfig {
        let defaults: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_default)
            .collect();

        match defaults.len() {
            0 => panic!("No default language found in registry"),
            1 => defaults[0],
            _ => panic!("Multiple default languages found in registry"),
        }
    }

    /// Check if a language code is supported and enabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|lang| lang.enabled)
            .unwrap_or(false)
    }
}

/// The languages offered by the settings page, with the backend codes the
/// translation service recognizes.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English (US)",
            backend_code: "en",
            is_default: true,
            enabled: true,
        },
        LanguageConfig {
            code: "tl",
            name: "Filipino",
            native_name: "Tagalog",
            backend_code: "fil",
            is_default: false,
            enabled: true,
        },
        LanguageConfig {
            code: "ceb",
            name: "Cebuano",
            native_name: "Bisaya",
            backend_code: "ceb",
            is_default: false,
            enabled: true,
        },
        LanguageConfig {
            code: "ilo",
            name: "Ilocano",
            native_name: "Ilokano",
            backend_code: "ilo",
            is_default: false,
            enabled: true,
        },
        LanguageConfig {
            code: "pag",
            name: "Pangasinan",
            native_name: "Pangasinense",
            backend_code: "pag",
            is_default: false,
            enabled: true,
        },
        LanguageConfig {
            code: "zh",
            name: "Simplified Chinese",
            native_name: "中文(简体)",
            backend_code: "zh",
            is_default: false,
            enabled: true,
        },
        LanguageConfig {
            code: "ja",
            name: "Japanese",
            native_name: "日本語",
            backend_code: "ja",
            is_default: false,
            enabled: true,
        },
        LanguageConfig {
            code: "ko",
            name: "Korean",
            native_name: "한국어",
            backend_code: "ko",
            is_default: false,
            enabled: true,
        },
    ]
}
