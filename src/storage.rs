// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side token storage.
//!
//! Two key/value namespaces: a durable one that survives restarts and a
//! session-scoped one that does not. Both hold the same three string keys.

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const TOKEN_EXPIRY_KEY: &str = "token_expiry";

const TOKEN_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRY_KEY];

/// A string key/value namespace. Writes overwrite prior values.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Process-lifetime namespace.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

/// Namespace written through to a JSON file.
pub struct FileStore {
    path: PathBuf,
    entries: DashMap<String, String>,
}

impl FileStore {
    /// Open (or start) the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<BTreeMap<String, String>>(&raw).ok())
            .unwrap_or_default()
            .into_iter()
            .collect();
        Self { path, entries }
    }

    fn flush(&self) {
        let snapshot: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        let result = serde_json::to_string_pretty(&snapshot)
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(&self.path, json).map_err(anyhow::Error::from));
        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist token store");
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush();
    }

    fn remove(&self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.flush();
        }
    }
}

/// Which namespace a token pair lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    Durable,
    Session,
}

/// Token strings as written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// The pair of namespaces used by the auth façade.
#[derive(Clone)]
pub struct TokenStorage {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl Default for TokenStorage {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl TokenStorage {
    pub fn new(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    /// Both namespaces in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()), Arc::new(MemoryStore::default()))
    }

    pub fn namespace(&self, scope: StorageScope) -> &dyn KeyValueStore {
        match scope {
            StorageScope::Durable => self.durable.as_ref(),
            StorageScope::Session => self.session.as_ref(),
        }
    }

    /// Write all three keys into one namespace and drop them from the other.
    pub fn store(&self, scope: StorageScope, tokens: &StoredTokens) {
        let other = match scope {
            StorageScope::Durable => StorageScope::Session,
            StorageScope::Session => StorageScope::Durable,
        };
        self.clear_scope(other);

        let ns = self.namespace(scope);
        ns.set(ACCESS_TOKEN_KEY, &tokens.access_token);
        ns.set(REFRESH_TOKEN_KEY, &tokens.refresh_token);
        ns.set(TOKEN_EXPIRY_KEY, &tokens.expires_at.to_string());
    }

    /// Access token, durable namespace first.
    pub fn access_token(&self) -> Option<String> {
        self.durable
            .get(ACCESS_TOKEN_KEY)
            .or_else(|| self.session.get(ACCESS_TOKEN_KEY))
    }

    /// Refresh token and the namespace holding it, durable first.
    pub fn refresh_token(&self) -> Option<(String, StorageScope)> {
        self.durable
            .get(REFRESH_TOKEN_KEY)
            .map(|t| (t, StorageScope::Durable))
            .or_else(|| {
                self.session
                    .get(REFRESH_TOKEN_KEY)
                    .map(|t| (t, StorageScope::Session))
            })
    }

    /// Remove every token key from one namespace.
    pub fn clear_scope(&self, scope: StorageScope) {
        let ns = self.namespace(scope);
        for key in TOKEN_KEYS {
            ns.remove(key);
        }
    }

    /// Remove every token key from both namespaces.
    pub fn clear(&self) {
        self.clear_scope(StorageScope::Durable);
        self.clear_scope(StorageScope::Session);
    }
}
