//! Integration tests for the GabayLakbay chat client.
//!
//! These tests verify the interaction between the locale store, the backend
//! client, and the chat session against a mock translation backend.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gabay_chat::chat::ChatSession;
use gabay_chat::client::BackendClient;
use gabay_chat::i18n::LanguageStore;

// ==================== Test Helpers ====================

/// Open a store over a scratch state dir, backed by the crate's shipped
/// locale resources.
async fn shipped_store(state: &TempDir) -> Arc<LanguageStore> {
    Arc::new(LanguageStore::open("locales", state.path().join("language")).await)
}

fn session(server: &MockServer, store: &Arc<LanguageStore>) -> ChatSession {
    ChatSession::with_refresh_delays(
        BackendClient::new(reqwest::Client::new(), server.uri()),
        Arc::clone(store),
        Duration::from_millis(10),
        Duration::from_millis(20),
    )
}

fn confirm(id: &str, translation: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "status": "ok",
        "message": { "id": id, "translation": translation }
    }))
}

fn history(entries: &[(&str, &str, &str)]) -> ResponseTemplate {
    let messages: Vec<_> = entries
        .iter()
        .map(|(id, original, translation)| {
            serde_json::json!({
                "id": id,
                "original": original,
                "translation": translation,
                "timestamp": "2025-06-01T08:30:00"
            })
        })
        .collect();
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "messages": messages }))
}

// ==================== Send / Reconcile Flow ====================

#[tokio::test]
async fn test_full_send_and_reconcile_flow() {
    let server = MockServer::start().await;
    let state = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(confirm("42", "Kumusta"))
        .expect(1)
        .mount(&server)
        .await;

    // The backend's own translation pipeline has not caught up yet
    Mock::given(method("GET"))
        .and(path("/messages"))
        .and(query_param("lang", "fil"))
        .respond_with(history(&[("42", "Hello", "Hello")]))
        .expect(2)
        .mount(&server)
        .await;

    let store = shipped_store(&state).await;
    store.set_locale("tl").await;
    let session = session(&server, &store);

    session.send("Hello").await;

    // Optimistic entry is already confirmed
    let messages = session.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].translation.as_deref(), Some("Kumusta"));
    assert!(!messages[0].pending);

    // Both staggered refreshes land, replacing the sequence with the
    // authoritative history
    tokio::time::sleep(Duration::from_millis(150)).await;
    let messages = session.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, "42");

    // The history still echoes the original, so the live translation shows
    assert_eq!(session.display_text(&messages[0]), "Kumusta");

    // The viewer can force the original either way
    session.toggle_original("42");
    assert_eq!(session.display_text(&messages[0]), "Hello");
}

#[tokio::test]
async fn test_locale_switch_refetches_history_for_new_language() {
    let server = MockServer::start().await;
    let state = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/messages"))
        .and(query_param("lang", "en"))
        .respond_with(history(&[("1", "Hello", "Hello")]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/messages"))
        .and(query_param("lang", "ja"))
        .respond_with(history(&[("1", "Hello", "こんにちは")]))
        .mount(&server)
        .await;

    let store = shipped_store(&state).await;
    let session = session(&server, &store);

    session.refresh().await;
    assert_eq!(session.display_text(&session.messages()[0]), "Hello");

    // Language switch, then the refresh the front-end issues on change
    store.set_locale("ja").await;
    session.refresh().await;

    assert_eq!(session.display_text(&session.messages()[0]), "こんにちは");
    assert_eq!(store.text("send", "Send"), "送信");
}

#[tokio::test]
async fn test_unrecognized_locale_degrades_on_both_layers() {
    let server = MockServer::start().await;
    let state = TempDir::new().unwrap();

    // Backend mapping resolves unknown codes to English
    Mock::given(method("GET"))
        .and(path("/messages"))
        .and(query_param("lang", "en"))
        .respond_with(history(&[]))
        .expect(1)
        .mount(&server)
        .await;

    let store = shipped_store(&state).await;
    store.set_locale("fr").await;
    let session = session(&server, &store);

    session.refresh().await;

    // No locale resource for "fr": every lookup falls back to the default
    assert_eq!(store.locale(), "fr");
    assert_eq!(store.text("send", "Send"), "Send");
    assert!(session.last_error().is_none());
}

#[tokio::test]
async fn test_clear_then_refresh_starts_from_empty() {
    let server = MockServer::start().await;
    let state = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(confirm("42", "Kumusta"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/messages"))
        .respond_with(history(&[]))
        .mount(&server)
        .await;

    let store = shipped_store(&state).await;
    store.set_locale("tl").await;
    let session = ChatSession::with_refresh_delays(
        BackendClient::new(reqwest::Client::new(), server.uri()),
        Arc::clone(&store),
        Duration::from_secs(600),
        Duration::from_secs(600),
    );

    session.send("Hello").await;
    assert!(session.has_live_translation("42"));

    session.clear();
    session.refresh().await;

    assert!(session.messages().is_empty());
    assert!(!session.has_live_translation("42"));
    assert!(session.last_error().is_none());
}

// ==================== Locale Resources ====================

#[tokio::test]
async fn test_shipped_locale_resources_load() {
    let state = TempDir::new().unwrap();
    let store = shipped_store(&state).await;

    for (code, send_label) in [
        ("en", "Send"),
        ("tl", "Ipadala"),
        ("ceb", "Ipadala"),
        ("ilo", "Ipatulod"),
        ("pag", "Ipawit"),
        ("zh", "发送"),
        ("ja", "送信"),
        ("ko", "보내기"),
    ] {
        store.set_locale(code).await;
        assert_eq!(store.text("send", "missing"), send_label, "locale {}", code);
    }
}

#[tokio::test]
async fn test_locale_selection_survives_reopen() {
    let state = TempDir::new().unwrap();

    let store = shipped_store(&state).await;
    store.set_locale("ko").await;
    store.close();

    let reopened = shipped_store(&state).await;
    assert_eq!(reopened.locale(), "ko");
    assert_eq!(reopened.text("send", "missing"), "보내기");
}

// ==================== Connectivity ====================

#[tokio::test]
async fn test_connection_probe_end_to_end() {
    let server = MockServer::start().await;
    let state = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "languages": ["en", "fil", "ceb", "ilo", "pag", "zh", "ja", "ko"]
        })))
        .mount(&server)
        .await;

    let store = shipped_store(&state).await;
    let session = session(&server, &store);

    let status = session.test_connection().await;
    assert!(status.success);
    assert!(status.message.unwrap().contains("8 languages"));
}
