pub mod backend;
pub mod commerce;
pub mod content_store;
pub mod models;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend, create_backend};
pub use commerce::CommerceStore;
pub use content_store::ContentStore;
pub use models::*;
