//! History backends: the read path into a version-control store.

pub mod backend;
pub mod error_handling;
pub mod memory;
pub mod repository;

pub use backend::{CommitIds, HistoryBackend};
pub use error_handling::{ErrorReporter, ErrorSeverity, GitError};
pub use memory::MemoryBackend;
pub use repository::GitRepository;
