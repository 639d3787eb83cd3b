//! Storage interfaces consumed by the orchestration layer, and in-memory
//! implementations of both.
//!
//! Two keyed stores exist, both keyed by username:
//!
//! * A durable [`CredentialStore`] holding `{salt, verifier}` records. It is
//! written at registration and read at every challenge, never during
//! verification.
//! * An ephemeral [`SessionCache`] bridging the two round trips of one login
//! attempt. Entries carry the serialized private challenge state, live for
//! one TTL and are consumed atomically by [`SessionCache::take`].
//!
//! The traits only require atomic per-key read/write visibility; persistence
//! and replication guarantees of real backends are out of scope. The
//! in-memory implementations are suitable for tests and single-process
//! deployments.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use std::time::{Duration, Instant};

use crate::error::StoreError;
use crate::key::{Salt, Verifier};

/// One user's stored credentials.
///
/// Invariant: neither the plaintext password nor the password hash is ever
/// part of this record. A password change is a re-registration that
/// overwrites the whole record.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    /// Salt generated at registration, sent to the client at every challenge.
    pub salt: Salt,
    /// Password verifier, never sent anywhere.
    pub verifier: Verifier,
}

/// Durable keyed storage for credential records.
///
/// `get` distinguishes "no such user" (`Ok(None)`) from an I/O failure
/// (`Err`), since the two must map to different error classes upstream.
pub trait CredentialStore: Send + Sync {
    /// Stores the record for `username`, overwriting any existing record.
    ///
    /// # Errors
    ///
    /// [`StoreError`] if the store could not be written.
    fn put(&self, username: &str, record: CredentialRecord) -> Result<(), StoreError>;

    /// Looks up the record for `username`.
    ///
    /// # Errors
    ///
    /// [`StoreError`] if the store could not be read. An unknown username is
    /// `Ok(None)`, not an error.
    fn get(&self, username: &str) -> Result<Option<CredentialRecord>, StoreError>;
}

/// Ephemeral keyed storage for serialized challenge state.
///
/// Entries are single use: [`SessionCache::take`] removes the entry in the
/// same operation that returns it, so a private ephemeral key can never be
/// used for two verification attempts. A later `put` for the same username
/// overwrites the earlier entry, making the most recent challenge the only
/// one a login can match.
pub trait SessionCache: Send + Sync {
    /// Stores `state` for `username` with the given time to live,
    /// overwriting any existing entry.
    ///
    /// # Errors
    ///
    /// [`StoreError`] if the cache could not be written.
    fn put(&self, username: &str, state: String, ttl: Duration) -> Result<(), StoreError>;

    /// Removes and returns the entry for `username`.
    ///
    /// An expired entry is equivalent to a missing one.
    ///
    /// # Errors
    ///
    /// [`StoreError`] if the cache could not be read.
    fn take(&self, username: &str) -> Result<Option<String>, StoreError>;

    /// Removes the entry for `username` if present.
    ///
    /// # Errors
    ///
    /// [`StoreError`] if the cache could not be written.
    fn remove(&self, username: &str) -> Result<(), StoreError>;
}

/// In-memory [`CredentialStore`].
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn put(&self, username: &str, record: CredentialRecord) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::WriteFailed("credential store lock poisoned".to_string()))?;

        records.insert(username.to_string(), record);

        Ok(())
    }

    fn get(&self, username: &str) -> Result<Option<CredentialRecord>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::ReadFailed("credential store lock poisoned".to_string()))?;

        Ok(records.get(username).cloned())
    }
}

struct CacheEntry {
    state: String,
    deadline: Instant,
}

/// In-memory [`SessionCache`] with per-entry TTL.
///
/// Expiry is lazy: an entry past its deadline is dropped when it is next
/// accessed. The map only ever holds one in-flight challenge per username,
/// so memory is bounded by the number of distinct usernames seen within one
/// TTL window.
#[derive(Default)]
pub struct MemorySessionCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemorySessionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionCache for MemorySessionCache {
    fn put(&self, username: &str, state: String, ttl: Duration) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::WriteFailed("session cache lock poisoned".to_string()))?;

        entries.insert(
            username.to_string(),
            CacheEntry {
                state,
                deadline: Instant::now() + ttl,
            },
        );

        Ok(())
    }

    fn take(&self, username: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::ReadFailed("session cache lock poisoned".to_string()))?;

        match entries.remove(username) {
            Some(entry) if entry.deadline >= Instant::now() => Ok(Some(entry.state)),
            _ => Ok(None),
        }
    }

    fn remove(&self, username: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::WriteFailed("session cache lock poisoned".to_string()))?;

        entries.remove(username);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::key::{Salt, Verifier};
    use crate::store::{
        CredentialRecord, CredentialStore, MemoryCredentialStore, MemorySessionCache, SessionCache,
    };
    use std::time::Duration;

    fn record(verifier_hex: &str) -> CredentialRecord {
        CredentialRecord {
            salt: Salt::from_be_hex_str("AA").unwrap(),
            verifier: Verifier::from_be_hex_str(verifier_hex).unwrap(),
        }
    }

    #[test]
    fn unknown_user_is_none_not_error() {
        let store = MemoryCredentialStore::new();
        assert!(store.get("nobody").unwrap().is_none());
    }

    #[test]
    fn re_registration_overwrites() {
        let store = MemoryCredentialStore::new();
        store.put("alice", record("01")).unwrap();
        store.put("alice", record("02")).unwrap();

        let got = store.get("alice").unwrap().unwrap();
        assert_eq!(got.verifier, Verifier::from_be_hex_str("02").unwrap());
    }

    #[test]
    fn take_consumes_the_entry() {
        let cache = MemorySessionCache::new();
        cache
            .put("alice", "state".to_string(), Duration::from_secs(30))
            .unwrap();

        assert_eq!(cache.take("alice").unwrap().as_deref(), Some("state"));
        assert!(cache.take("alice").unwrap().is_none());
    }

    #[test]
    fn expired_entry_is_gone() {
        let cache = MemorySessionCache::new();
        cache
            .put("alice", "state".to_string(), Duration::from_secs(0))
            .unwrap();

        std::thread::sleep(Duration::from_millis(5));

        assert!(cache.take("alice").unwrap().is_none());
    }

    #[test]
    fn remove_discards_the_entry() {
        let cache = MemorySessionCache::new();
        cache
            .put("alice", "state".to_string(), Duration::from_secs(30))
            .unwrap();

        cache.remove("alice").unwrap();
        assert!(cache.take("alice").unwrap().is_none());

        // Removing a missing entry is not an error.
        cache.remove("alice").unwrap();
    }

    #[test]
    fn later_put_wins() {
        let cache = MemorySessionCache::new();
        cache
            .put("alice", "first".to_string(), Duration::from_secs(30))
            .unwrap();
        cache
            .put("alice", "second".to_string(), Duration::from_secs(30))
            .unwrap();

        assert_eq!(cache.take("alice").unwrap().as_deref(), Some("second"));
    }
}
