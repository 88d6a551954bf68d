//! Client-side engine for the GabayLakbay multilingual chat.
//!
//! The crate has three working parts and a thin terminal front-end on top:
//!
//! - [`i18n`]: the supported-language registry and the locale store that
//!   loads per-locale translation tables and persists the user's selection
//! - [`client`]: the HTTP client for the translation backend
//! - [`chat`]: the chat session that reconciles optimistic messages, backend
//!   confirmations, and live-translation fallbacks into one display model

pub mod chat;
pub mod client;
pub mod config;
pub mod i18n;
