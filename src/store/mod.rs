pub mod backend;
pub mod local;
pub mod types;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use local::{LocalStore, MEETINGS_KEY, PROJECTS_KEY};
pub use types::{ChatMessage, ChatRole, Meeting, Project};
