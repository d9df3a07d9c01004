pub mod in_memory_repo;
pub mod snapshot;

pub use in_memory_repo::InMemoryDirectory;
pub use snapshot::{DirectorySnapshot, LeaderLink, Membership};
