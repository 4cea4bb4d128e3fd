use crate::git::{CommitIds, GitError, HistoryBackend};
use crate::models::{BranchTip, CommitRecord, GitSignature};
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// In-memory commit graph implementing [`HistoryBackend`].
///
/// Used to lay out histories that do not live in an on-disk repository,
/// and as a deterministic fixture for tests and benchmarks.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    commits: HashMap<String, CommitRecord>,
    branches: Vec<BranchTip>,
    head_branch: Option<String>,
    failing: HashSet<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: CommitRecord) -> &mut Self {
        self.commits.insert(record.id.clone(), record);
        self
    }

    /// Add a commit authored `seconds` after the epoch.
    pub fn add_commit(
        &mut self,
        id: &str,
        parents: &[&str],
        summary: &str,
        author: &str,
        seconds: i64,
    ) -> &mut Self {
        let when: DateTime<Utc> = DateTime::from_timestamp(seconds, 0).unwrap_or_default();
        self.insert(CommitRecord {
            id: id.to_string(),
            summary: summary.to_string(),
            author: GitSignature {
                name: author.to_string(),
                email: format!("{}@example.com", author.to_lowercase().replace(' ', ".")),
                when,
            },
            parent_ids: parents.iter().map(|p| p.to_string()).collect(),
        })
    }

    /// Point a local branch at `target`, replacing any previous tip.
    pub fn set_branch(&mut self, name: &str, target: &str) -> &mut Self {
        self.branches.retain(|b| b.name != name);
        self.branches.push(BranchTip {
            name: name.to_string(),
            target: target.to_string(),
        });
        self
    }

    pub fn set_head_branch(&mut self, name: &str) -> &mut Self {
        self.head_branch = Some(name.to_string());
        self
    }

    /// Make every later `load_commit` of `id` fail.
    pub fn fail_lookup(&mut self, id: &str) -> &mut Self {
        self.failing.insert(id.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Topological order over the commits reachable from `start`, newest
    /// first whenever several commits are ready at once.
    fn topo_time_order(&self, start: &str) -> Vec<String> {
        let mut reachable = HashSet::new();
        let mut stack = vec![start.to_string()];
        while let Some(id) = stack.pop() {
            if !self.commits.contains_key(&id) || !reachable.insert(id.clone()) {
                continue;
            }
            stack.extend(self.commits[&id].parent_ids.iter().cloned());
        }

        let mut pending_children: HashMap<&str, usize> = HashMap::new();
        for id in &reachable {
            for parent in &self.commits[id].parent_ids {
                if parent != id && reachable.contains(parent) {
                    *pending_children.entry(parent.as_str()).or_default() += 1;
                }
            }
        }

        let mut order = Vec::with_capacity(reachable.len());
        let mut sequence = 0usize;
        let mut ready = BinaryHeap::new();
        if reachable.contains(start) {
            ready.push((self.commits[start].author.when, Reverse(sequence), start.to_string()));
        }

        let mut emitted = HashSet::new();
        while let Some((_, _, id)) = ready.pop() {
            // a cycle can make a commit ready twice
            if !emitted.insert(id.clone()) {
                continue;
            }
            for parent in &self.commits[&id].parent_ids {
                if *parent == id {
                    continue;
                }
                let Some(count) = pending_children.get_mut(parent.as_str()) else {
                    continue;
                };
                let Some(remaining) = count.checked_sub(1) else {
                    continue;
                };
                *count = remaining;
                if remaining == 0 {
                    sequence += 1;
                    let when = self.commits[parent].author.when;
                    ready.push((when, Reverse(sequence), parent.clone()));
                }
            }
            order.push(id);
        }

        order
    }
}

impl HistoryBackend for MemoryBackend {
    fn resolve_branch_head(&self, name: &str) -> Result<String, GitError> {
        self.branches
            .iter()
            .find(|b| b.name == name)
            .filter(|b| self.commits.contains_key(&b.target))
            .map(|b| b.target.clone())
            .ok_or_else(|| GitError::branch_unresolvable(name))
    }

    fn walk_ancestry<'a>(&'a self, start: &str, limit: usize) -> Result<CommitIds<'a>, GitError> {
        if !self.commits.contains_key(start) {
            return Err(GitError::lookup_failure(start, "commit not found"));
        }
        Ok(Box::new(
            self.topo_time_order(start).into_iter().take(limit).map(Ok),
        ))
    }

    fn load_commit(&self, id: &str) -> Result<CommitRecord, GitError> {
        if self.failing.contains(id) {
            return Err(GitError::lookup_failure(id, "injected lookup failure"));
        }
        self.commits
            .get(id)
            .cloned()
            .ok_or_else(|| GitError::lookup_failure(id, "commit not found"))
    }

    fn list_local_branches(&self) -> Result<Vec<BranchTip>, GitError> {
        Ok(self.branches.clone())
    }

    fn head_branch(&self) -> Option<String> {
        self.head_branch.clone()
    }
}
