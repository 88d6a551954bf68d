//! Locale store: loads per-locale translation tables and remembers the
//! user's selection across runs.
//!
//! The store is an explicit object handed to whatever needs it, not a global.
//! Each locale has one flat JSON resource (`<dir>/<code>.json`) mapping
//! translation keys to display strings. Switching locale replaces the table
//! wholesale; a failed load leaves an empty table and every lookup falls back
//! to the caller-supplied default, so a missing resource never breaks the UI.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::i18n::LanguageRegistry;

/// Per-locale translation table with persisted selection.
pub struct LanguageStore {
    locales_dir: PathBuf,
    persist_path: PathBuf,
    /// Last requested locale code, updated before the table load resolves.
    current: Mutex<String>,
    table: RwLock<HashMap<String, String>>,
    /// Latest issued load ticket. A load whose ticket is no longer the
    /// latest must not install its result.
    load_seq: AtomicU64,
}

impl LanguageStore {
    /// Open the store: restore the persisted locale selection (or the
    /// registry default) and load its translation table.
    pub async fn open(locales_dir: impl Into<PathBuf>, persist_path: impl Into<PathBuf>) -> Self {
        let store = LanguageStore {
            locales_dir: locales_dir.into(),
            persist_path: persist_path.into(),
            current: Mutex::new(String::new()),
            table: RwLock::new(HashMap::new()),
            load_seq: AtomicU64::new(0),
        };

        let code = store.restore_persisted();
        *store.current.lock().unwrap() = code.clone();

        let ticket = store.next_ticket();
        let loaded = store.load_table(&code).await;
        store.install(ticket, &code, loaded);

        store
    }

    /// Switch to `code`.
    ///
    /// The selection is persisted immediately, independent of whether the
    /// table load succeeds, so user intent survives a failed fetch. The table
    /// is then reloaded; on any failure it becomes empty rather than
    /// partially merged.
    pub async fn set_locale(&self, code: &str) {
        self.persist(code);
        *self.current.lock().unwrap() = code.to_string();

        let ticket = self.next_ticket();
        let loaded = self.load_table(code).await;
        self.install(ticket, code, loaded);
    }

    /// The last requested locale code (not necessarily loaded yet).
    pub fn locale(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    /// Look up a translation key, falling back to `default` when the key is
    /// absent or the table failed to load.
    pub fn text(&self, key: &str, default: &str) -> String {
        self.table
            .read()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Tear down the store: any load still in flight is invalidated and will
    /// not install its result.
    pub fn close(&self) {
        self.next_ticket();
    }

    fn restore_persisted(&self) -> String {
        match std::fs::read_to_string(&self.persist_path) {
            Ok(contents) => {
                let code = contents.trim();
                if code.is_empty() {
                    LanguageRegistry::get().default().code.to_string()
                } else {
                    code.to_string()
                }
            }
            Err(_) => LanguageRegistry::get().default().code.to_string(),
        }
    }

    fn persist(&self, code: &str) {
        if let Some(parent) = self.persist_path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        if let Err(e) = std::fs::write(&self.persist_path, code) {
            warn!(
                "Failed to persist locale selection to {}: {}",
                self.persist_path.display(),
                e
            );
        }
    }

    async fn load_table(&self, code: &str) -> Result<HashMap<String, String>> {
        let path = self.locales_dir.join(format!("{}.json", code));
        let contents = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read locale resource {}", path.display()))?;
        let table: HashMap<String, String> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse locale resource {}", path.display()))?;
        Ok(table)
    }

    /// Issue a new load ticket, invalidating all earlier ones.
    fn next_ticket(&self) -> u64 {
        self.load_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Install a resolved load unless a newer ticket has been issued since.
    fn install(&self, ticket: u64, code: &str, loaded: Result<HashMap<String, String>>) {
        if self.load_seq.load(Ordering::SeqCst) != ticket {
            debug!("Discarding stale locale load for '{}'", code);
            return;
        }

        let mut table = self.table.write().unwrap();
        *table = match loaded {
            Ok(map) => {
                debug!("Loaded {} translations for locale '{}'", map.len(), code);
                map
            }
            Err(e) => {
                warn!("Locale '{}' failed to load, using empty table: {:#}", code, e);
                HashMap::new()
            }
        };
    }
}
