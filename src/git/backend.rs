use crate::git::GitError;
use crate::models::{BranchTip, CommitRecord};
use std::collections::HashSet;

/// Lazily produced commit ids from an ancestry walk.
pub type CommitIds<'a> = Box<dyn Iterator<Item = Result<String, GitError>> + 'a>;

/// Read-only view of a repository's history.
///
/// Implementations are expected to be side-effect free; the layout engine
/// treats every call as a synchronous lookup and never retries a failure.
pub trait HistoryBackend {
    /// Resolve a local branch name to the commit its tip points at.
    fn resolve_branch_head(&self, name: &str) -> Result<String, GitError>;

    /// Walk ancestry from `start` in topological order, newest first among
    /// commits of equal rank, yielding at most `limit` ids.
    fn walk_ancestry<'a>(&'a self, start: &str, limit: usize) -> Result<CommitIds<'a>, GitError>;

    fn load_commit(&self, id: &str) -> Result<CommitRecord, GitError>;

    /// Local branches with their resolved tip commits.
    fn list_local_branches(&self) -> Result<Vec<BranchTip>, GitError>;

    /// Branch currently checked out, if HEAD points at one.
    fn head_branch(&self) -> Option<String> {
        None
    }

    /// Commits reached from `start` by following first parents only.
    ///
    /// Stops at a root commit, at the first lookup that fails, or when an
    /// id repeats.
    fn first_parent_chain(&self, start: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(start.to_string());

        while let Some(id) = current.take() {
            if !seen.insert(id.clone()) {
                tracing::debug!("First-parent chain loops back to {}", id);
                break;
            }
            let commit = match self.load_commit(&id) {
                Ok(commit) => commit,
                Err(e) => {
                    tracing::debug!("First-parent chain stopped at {}: {}", id, e);
                    break;
                }
            };
            current = commit.parent_ids.first().cloned();
            chain.push(id);
        }

        chain
    }
}
