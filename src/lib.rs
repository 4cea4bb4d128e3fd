//! # history-lanes
//!
//! Commit-graph lane layout for Git history browsers.
//!
//! Given a repository and a local branch, this library walks the branch's
//! ancestry and produces one row per commit: the lane it is drawn on, the
//! lanes that pass through the row, connector segments to its parents, the
//! branch names it belongs to, and duplicate-run grouping.
//!
//! ## Architecture
//!
//! - [`git`] - History backends (`git2` repositories, in-memory graphs) and errors
//! - [`graph`] - The layout pipeline: collection, relevance, lanes, labels, grouping
//! - [`models`] - Commit records and laid-out rows
//! - [`state`] - Configuration and the branch-selection state a view binds to
//!
//! ## Example
//!
//! ```rust,no_run
//! use history_lanes::git::GitRepository;
//! use history_lanes::state::{CommitHistory, HistoryConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let repo = GitRepository::discover("/path/to/repo")?;
//!
//! let mut history = CommitHistory::new(HistoryConfig::load());
//! history.set_repository(Some(Box::new(repo)));
//! for entry in history.entries() {
//!     println!("{:>3} {} {}", entry.lane, entry.short_id, entry.displayed_summary);
//! }
//! # Ok(())
//! # }
//! ```

pub mod git;
pub mod graph;
pub mod models;
pub mod state;

pub use git::{GitError, GitRepository, HistoryBackend, MemoryBackend};
pub use graph::{compute_layout, HistoryLayout, LayoutWarning};
pub use models::{CommitEntry, Connection};
pub use state::{CommitHistory, HistoryConfig, HistoryEvent};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
