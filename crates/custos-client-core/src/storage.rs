//! Durable key/value storage for the session and the persisted-session layout
//! on top of it.
//!
//! The layout mirrors the browser clients of the same backend: `accessToken`,
//! `refreshToken` and a JSON serialized `user` record used as the stale
//! fallback when the identity provider is unreachable on cold start.

use std::{
    collections::HashMap,
    fmt::Debug,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::Context as _;
use custos_shared::{
    const_config::storage::{
        STORAGE_KEY_ACCESS_TOKEN, STORAGE_KEY_REFRESH_TOKEN, STORAGE_KEY_USER,
    },
    token::{AccessToken, RefreshToken},
    uac::{LoginResponse, Principal},
};
use tracing::warn;

/// String keyed durable storage shared by all session stores of the same
/// profile (the browser equivalent is local storage). Implementations are
/// expected to be cheap to call; no cross-instance locking is provided, the
/// last writer wins.
pub trait SessionStorage: Debug + Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// In memory storage, used by tests and as the wasm fallback until a real
/// local storage binding is wired up by the embedding client
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().expect("mutex poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.values
            .lock()
            .expect("mutex poisoned")
            .insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.values.lock().expect("mutex poisoned").remove(key);
    }
}

/// File backed storage for native clients. The whole map is rewritten on each
/// mutation, which is acceptable for the three small values stored here.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Loads the existing file if present; a missing or unreadable file
    /// starts empty rather than erroring (degrades to "logged out")
    pub fn new(path: PathBuf) -> Self {
        let values = match Self::load_file(&path) {
            Ok(values) => values,
            Err(e) => {
                warn!("failed to load session storage file, starting empty: {e:#}");
                HashMap::new()
            }
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn load_file(path: &Path) -> anyhow::Result<HashMap<String, String>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let contents = std::fs::read_to_string(path).context("failed to read storage file")?;
        serde_json::from_str(&contents).context("failed to parse storage file")
    }

    fn save(&self, values: &HashMap<String, String>) {
        let result = serde_json::to_string_pretty(values)
            .context("failed to serialize storage")
            .and_then(|contents| {
                if let Some(parent) = self.path.parent() {
                    std::fs::create_dir_all(parent).context("failed to create storage folder")?;
                }
                std::fs::write(&self.path, contents).context("failed to write storage file")
            });
        if let Err(e) = result {
            // Persistence is best effort, the in memory session stays valid
            warn!("failed to persist session storage: {e:#}");
        }
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().expect("mutex poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        let mut values = self.values.lock().expect("mutex poisoned");
        values.insert(key.to_string(), value);
        self.save(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = self.values.lock().expect("mutex poisoned");
        values.remove(key);
        self.save(&values);
    }
}

/// The persisted session triple as read back from storage. Only constructed
/// in fully valid form: a record without an access token is partial state and
/// is cleared on load instead of being returned.
#[derive(Debug)]
pub struct PersistedSession {
    pub access_token: AccessToken,
    pub refresh_token: Option<RefreshToken>,
    /// The stale fallback principal; may legitimately be absent (cleared or
    /// never written) in which case cold start must re-fetch or log out
    pub principal: Option<Principal>,
}

impl PersistedSession {
    /// Reads the persisted session, resolving any partial state by clearing
    /// it. Never errors - malformed contents degrade to "nothing persisted".
    pub fn load(storage: &dyn SessionStorage) -> Option<Self> {
        let access_token = storage.get(STORAGE_KEY_ACCESS_TOKEN).map(AccessToken::from);
        let refresh_token = storage
            .get(STORAGE_KEY_REFRESH_TOKEN)
            .map(RefreshToken::from);
        let principal = storage.get(STORAGE_KEY_USER).and_then(|json| {
            match serde_json::from_str::<Principal>(&json) {
                Ok(principal) => Some(principal),
                Err(e) => {
                    warn!("persisted user record is malformed, ignoring it: {e}");
                    None
                }
            }
        });

        match access_token {
            Some(access_token) => Some(Self {
                access_token,
                refresh_token,
                principal,
            }),
            None => {
                if refresh_token.is_some() || principal.is_some() {
                    // Partial state is not valid, resolve by clearing
                    warn!("found persisted session data without an access token, clearing it");
                    Self::clear(storage);
                }
                None
            }
        }
    }

    /// Persists the full triple from a successful login
    pub fn store_login(storage: &dyn SessionStorage, response: &LoginResponse) {
        storage.set(
            STORAGE_KEY_ACCESS_TOKEN,
            response.access_token.as_str().to_string(),
        );
        storage.set(
            STORAGE_KEY_REFRESH_TOKEN,
            response.refresh_token.as_str().to_string(),
        );
        Self::store_principal(storage, &response.user);
    }

    /// Re-persists only the principal, leaving the tokens untouched
    pub fn store_principal(storage: &dyn SessionStorage, principal: &Principal) {
        match serde_json::to_string(principal) {
            Ok(json) => storage.set(STORAGE_KEY_USER, json),
            // Persistence is best effort, only the stale fallback is affected
            Err(e) => warn!("failed to serialize principal for persistence: {e}"),
        }
    }

    pub fn clear(storage: &dyn SessionStorage) {
        storage.remove(STORAGE_KEY_ACCESS_TOKEN);
        storage.remove(STORAGE_KEY_REFRESH_TOKEN);
        storage.remove(STORAGE_KEY_USER);
    }
}
