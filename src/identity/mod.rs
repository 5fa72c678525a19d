pub mod session;
pub mod store;

pub use session::{generate_id, IdentityStore, CLIENT_ID_KEY, SESSION_ID_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore, StorageError};
