//! Chat session: the state behind the chat widget.
//!
//! Merges three sources into one display model per message: the optimistic
//! entry appended on send, the backend's confirmed record, and the "live"
//! translation captured from the submit response. The backend translates the
//! remaining languages in the background, so a history fetch issued right
//! after a send may still report `translation == original`; the live value
//! fills that gap until the backend catches up.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::{BackendClient, ConnectionStatus};
use crate::i18n::LanguageStore;

/// Delay before the first post-send history refresh.
const REFRESH_DELAY_SHORT: Duration = Duration::from_millis(100);

/// Delay before the second post-send refresh, long enough for the backend to
/// finish translating the other target languages.
const REFRESH_DELAY_LONG: Duration = Duration::from_millis(800);

/// A single chat message as displayed and as the backend reports it.
///
/// `original` and `timestamp` are set once at creation and never change.
/// `pending` is true from optimistic creation until the backend confirms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub original: String,
    #[serde(default)]
    pub translation: Option<String>,
    pub timestamp: String,
    #[serde(default)]
    pub pending: bool,
}

#[derive(Default)]
struct ChatState {
    /// Insertion order is display order.
    messages: Vec<ChatMessage>,
    /// Live translations from submit responses, keyed by backend message id.
    /// Additive only; emptied solely by `clear`.
    live_translations: HashMap<String, String>,
    /// Messages the viewer flipped to show the original text.
    show_original: HashSet<String>,
    last_error: Option<String>,
    local_seq: u64,
}

impl ChatState {
    /// Time-based id for an optimistic entry. The sequence suffix keeps ids
    /// unique even when two sends land in the same millisecond.
    fn next_local_id(&mut self) -> String {
        self.local_seq += 1;
        format!("{}-{}", Utc::now().timestamp_millis(), self.local_seq)
    }
}

/// Stateful chat session over the translation backend.
///
/// Cloning is cheap and clones share the same state, which is how the
/// scheduled background refreshes see the session. All mutation goes through
/// the session's own operations; the view layer only reads projections.
#[derive(Clone)]
pub struct ChatSession {
    client: BackendClient,
    language: Arc<LanguageStore>,
    state: Arc<Mutex<ChatState>>,
    sending: Arc<AtomicBool>,
    refresh_delays: (Duration, Duration),
    refresh_tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl ChatSession {
    pub fn new(client: BackendClient, language: Arc<LanguageStore>) -> Self {
        Self::with_refresh_delays(client, language, REFRESH_DELAY_SHORT, REFRESH_DELAY_LONG)
    }

    /// Build a session with custom delays for the staggered post-send
    /// refreshes.
    pub fn with_refresh_delays(
        client: BackendClient,
        language: Arc<LanguageStore>,
        short: Duration,
        long: Duration,
    ) -> Self {
        ChatSession {
            client,
            language,
            state: Arc::new(Mutex::new(ChatState::default())),
            sending: Arc::new(AtomicBool::new(false)),
            refresh_delays: (short, long),
            refresh_tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Submit `text` for translation into the current locale.
    ///
    /// Empty or whitespace-only text is silently ignored, as is a send while
    /// another is still in flight. An optimistic pending entry appears
    /// immediately; backend confirmation fills in its translation and records
    /// the live value in the fallback cache, then two staggered history
    /// refreshes are scheduled. On failure the entry stays pending and the
    /// error is kept for display.
    pub async fn send(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        // Single-flight guard: only one outbound send at a time.
        if self
            .sending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Send already in flight, ignoring");
            return;
        }

        let local_id = {
            let mut state = self.state.lock().unwrap();
            let local_id = state.next_local_id();
            state.messages.push(ChatMessage {
                id: local_id.clone(),
                original: text.to_string(),
                translation: None,
                timestamp: Utc::now().to_rfc3339(),
                pending: true,
            });
            state.last_error = None;
            local_id
        };

        match self.client.submit(text, &self.language.locale()).await {
            Ok(receipt) => {
                {
                    let mut state = self.state.lock().unwrap();
                    if let Some(translation) = receipt.translation.clone() {
                        state
                            .live_translations
                            .insert(receipt.id.clone(), translation);
                    }
                    // The optimistic entry keeps its client-side id; only its
                    // translation and pending flag change.
                    if let Some(entry) = state.messages.iter_mut().find(|m| m.id == local_id) {
                        entry.translation = receipt.translation;
                        entry.pending = false;
                    }
                    state.last_error = None;
                }
                self.sending.store(false, Ordering::SeqCst);
                self.schedule_refreshes();
            }
            Err(e) => {
                warn!("Send failed: {:#}", e);
                // No failed state in the message lifecycle: the entry stays
                // pending and the error is surfaced separately.
                self.state.lock().unwrap().last_error = Some(format!("{:#}", e));
                self.sending.store(false, Ordering::SeqCst);
            }
        }
    }

    /// Re-fetch the authoritative history for the current locale and replace
    /// the message sequence wholesale. A failed fetch keeps the existing
    /// sequence and records the error.
    pub async fn refresh(&self) {
        match self.client.fetch_history(&self.language.locale()).await {
            Ok(messages) => {
                let mut state = self.state.lock().unwrap();
                state.messages = messages;
                state.last_error = None;
            }
            Err(e) => {
                warn!("History refresh failed: {:#}", e);
                self.state.lock().unwrap().last_error = Some(format!("{:#}", e));
            }
        }
    }

    /// Flip the per-message "show original" toggle. Pure state, no I/O.
    pub fn toggle_original(&self, message_id: &str) {
        let mut state = self.state.lock().unwrap();
        if !state.show_original.remove(message_id) {
            state.show_original.insert(message_id.to_string());
        }
    }

    /// Drop all messages, the live-translation cache, and any displayed
    /// error. Irreversible.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.messages.clear();
        state.live_translations.clear();
        state.last_error = None;
    }

    /// Probe the backend. Does not touch message state.
    pub async fn test_connection(&self) -> ConnectionStatus {
        self.client.test_connection().await
    }

    /// The text to display for a message.
    ///
    /// The viewer's toggle forces the original; otherwise the authoritative
    /// translation wins when it is present and actually differs from the
    /// original, then the live fallback, then the original itself.
    pub fn display_text(&self, message: &ChatMessage) -> String {
        let state = self.state.lock().unwrap();
        if state.show_original.contains(&message.id) {
            return message.original.clone();
        }
        match &message.translation {
            Some(translation) if translation != &message.original => translation.clone(),
            _ => state
                .live_translations
                .get(&message.id)
                .cloned()
                .unwrap_or_else(|| message.original.clone()),
        }
    }

    /// Whether a live translation is on record for this message id.
    pub fn has_live_translation(&self, message_id: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .live_translations
            .contains_key(message_id)
    }

    /// Snapshot of the message sequence in display order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state.lock().unwrap().messages.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.lock().unwrap().last_error.clone()
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::SeqCst)
    }

    /// Tear down the session: abort any scheduled refresh still waiting, so
    /// nothing updates the state after the owner is done with it.
    pub fn close(&self) {
        let mut tasks = self.refresh_tasks.lock().unwrap();
        for task in tasks.drain(..) {
            task.abort();
        }
    }

    /// Two staggered refreshes absorb the backend pipeline that is still
    /// translating the other target languages. They race; refresh replaces
    /// wholesale, so whichever resolves last wins.
    fn schedule_refreshes(&self) {
        let (short, long) = self.refresh_delays;
        let mut tasks = self.refresh_tasks.lock().unwrap();
        tasks.retain(|task| !task.is_finished());
        for delay in [short, long] {
            let session = self.clone();
            tasks.push(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                session.refresh().await;
            }));
        }
    }
}
