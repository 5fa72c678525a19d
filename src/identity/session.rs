use chrono::Utc;
use rand::Rng;
use tracing::info;

use crate::identity::store::{KeyValueStore, StorageError};

pub const SESSION_ID_KEY: &str = "chat_session_id";
pub const CLIENT_ID_KEY: &str = "chat_client_id";

const SUFFIX_LEN: usize = 9;
const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Builds `<unix millis>-<random base36 suffix>`. Collisions are not checked.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();

    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}

/// Durable session and client identifiers over a key-value store.
///
/// The client id is created once and never rotated here. The session id can be
/// replaced with [`IdentityStore::reset_session`].
pub struct IdentityStore<S: KeyValueStore> {
    store: S,
    session_id: String,
    client_id: String,
}

impl<S: KeyValueStore> IdentityStore<S> {
    pub fn new(store: S) -> Result<Self, StorageError> {
        let mut identity = Self {
            store,
            session_id: String::new(),
            client_id: String::new(),
        };
        identity.session_id = identity.get_or_create_session_id()?;
        identity.client_id = identity.get_or_create_client_id()?;
        Ok(identity)
    }

    pub fn get_or_create_session_id(&mut self) -> Result<String, StorageError> {
        self.get_or_create(SESSION_ID_KEY)
    }

    pub fn get_or_create_client_id(&mut self) -> Result<String, StorageError> {
        self.get_or_create(CLIENT_ID_KEY)
    }

    pub fn generate_id(&self) -> String {
        generate_id()
    }

    /// Rotates the session id. The remote service is not told about it.
    pub fn reset_session(&mut self) -> Result<&str, StorageError> {
        let session_id = generate_id();
        self.store.set(SESSION_ID_KEY, &session_id)?;
        info!("Session reset to {}", session_id);
        self.session_id = session_id;
        Ok(&self.session_id)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn get_or_create(&mut self, key: &str) -> Result<String, StorageError> {
        if let Some(existing) = self.store.get(key)?.filter(|v| !v.is_empty()) {
            return Ok(existing);
        }

        let id = generate_id();
        self.store.set(key, &id)?;
        info!("Created new {} {}", key, id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::store::MemoryStore;

    #[test]
    fn generated_id_shape() {
        let id = generate_id();
        let (millis, suffix) = id.split_once('-').unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn consecutive_ids_differ() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
    }

    #[test]
    fn creates_and_persists_both_ids() {
        let identity = IdentityStore::new(MemoryStore::new()).unwrap();
        let session = identity.session_id().to_string();
        let client = identity.client_id().to_string();
        assert_ne!(session, client);

        let store = identity.into_store();
        assert_eq!(store.get(SESSION_ID_KEY).unwrap(), Some(session));
        assert_eq!(store.get(CLIENT_ID_KEY).unwrap(), Some(client));
    }

    #[test]
    fn existing_values_are_reused() {
        let mut store = MemoryStore::new();
        store.set(SESSION_ID_KEY, "s-1").unwrap();
        store.set(CLIENT_ID_KEY, "c-1").unwrap();

        let mut identity = IdentityStore::new(store).unwrap();
        assert_eq!(identity.session_id(), "s-1");
        assert_eq!(identity.client_id(), "c-1");
        assert_eq!(identity.get_or_create_session_id().unwrap(), "s-1");
    }

    #[test]
    fn reset_rotates_session_only() {
        let mut identity = IdentityStore::new(MemoryStore::new()).unwrap();
        let session = identity.session_id().to_string();
        let client = identity.client_id().to_string();

        let fresh = identity.reset_session().unwrap().to_string();
        assert_ne!(fresh, session);
        assert_eq!(identity.session_id(), fresh);
        assert_eq!(identity.client_id(), client);

        let store = identity.into_store();
        assert_eq!(store.get(SESSION_ID_KEY).unwrap(), Some(fresh));
        assert_eq!(store.get(CLIENT_ID_KEY).unwrap(), Some(client));
    }
}
