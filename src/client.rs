//! HTTP client for the translation backend.
//!
//! Wraps the backend's message endpoints. Every call fails fast: any non-2xx
//! status or transport error becomes a descriptive error carrying the status
//! and response body. No retries and no caching here — the chat session
//! decides what to do with failures.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;
use crate::i18n::LanguageRegistry;

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    text: &'a str,
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    message: Option<SendReceipt>,
}

/// The backend's immediate record for a submitted message: the id it filed
/// the message under and the live translation it produced for the requested
/// target language.
#[derive(Debug, Clone, Deserialize)]
pub struct SendReceipt {
    pub id: String,
    #[serde(default)]
    pub translation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct LanguagesResponse {
    #[serde(default)]
    languages: Vec<String>,
}

/// Result of a connectivity probe, shaped for direct display.
///
/// Failure is encoded in the value rather than an `Err`, so the front-end can
/// always render something.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Client for the translation backend's HTTP API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        BackendClient { http, base_url }
    }

    /// Submit a message for translation into `lang` (a front-end code).
    ///
    /// Returns the backend's receipt with the id it assigned and the live
    /// translation for the requested language. A 2xx response that carries no
    /// message record is treated as an error.
    pub async fn submit(&self, text: &str, lang: &str) -> Result<SendReceipt> {
        let target_lang = LanguageRegistry::get().backend_code(lang);
        let request = SendRequest { text, target_lang };

        let response = self
            .http
            .post(format!("{}/send", self.base_url))
            .json(&request)
            .send()
            .await
            .context("Failed to send message to translation backend")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            bail!("Translation backend error ({}): {}", status, body);
        }

        let parsed: SendResponse = response
            .json()
            .await
            .context("Failed to parse translation backend send response")?;

        parsed
            .message
            .context("Translation backend send response contained no message record")
    }

    /// Fetch the full message history translated into `lang`.
    ///
    /// A response without a `messages` field is an empty history, not an
    /// error.
    pub async fn fetch_history(&self, lang: &str) -> Result<Vec<ChatMessage>> {
        let backend_lang = LanguageRegistry::get().backend_code(lang);

        let response = self
            .http
            .get(format!("{}/messages", self.base_url))
            .query(&[("lang", backend_lang)])
            .send()
            .await
            .context("Failed to fetch message history from translation backend")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            bail!("Translation backend error ({}): {}", status, body);
        }

        let parsed: HistoryResponse = response
            .json()
            .await
            .context("Failed to parse translation backend history response")?;

        Ok(parsed.messages)
    }

    /// List the language codes the backend can translate into.
    pub async fn list_languages(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(format!("{}/languages", self.base_url))
            .send()
            .await
            .context("Failed to reach translation backend")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            bail!("Translation backend error ({}): {}", status, body);
        }

        let parsed: LanguagesResponse = response
            .json()
            .await
            .context("Failed to parse translation backend languages response")?;

        Ok(parsed.languages)
    }

    /// Probe the backend and report the outcome in displayable form.
    pub async fn test_connection(&self) -> ConnectionStatus {
        match self.list_languages().await {
            Ok(languages) => ConnectionStatus {
                success: true,
                message: Some(format!(
                    "Translation backend reachable ({} languages available)",
                    languages.len()
                )),
                error: None,
                suggestion: None,
            },
            Err(e) => ConnectionStatus {
                success: false,
                message: None,
                error: Some(format!("{:#}", e)),
                suggestion: Some(format!(
                    "Check that the translation service is running at {}",
                    self.base_url
                )),
            },
        }
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
