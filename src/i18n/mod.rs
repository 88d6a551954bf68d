//! Internationalization (i18n) module for multi-language support.
//!
//! All language-related logic lives here:
//!
//! - `registry`: single source of truth for the supported languages and the
//!   codes the translation backend expects for them
//! - `store`: per-locale translation tables, loaded on demand and persisted
//!   across runs

mod registry;
mod store;

pub use registry::{LanguageConfig, LanguageRegistry};
pub use store::LanguageStore;
