use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw commit metadata as delivered by a history backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub id: String,
    pub summary: String,
    pub author: GitSignature,
    pub parent_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSignature {
    pub name: String,
    pub email: String,
    pub when: DateTime<Utc>,
}

/// A local branch and the commit its tip resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchTip {
    pub name: String,
    pub target: String,
}

/// Connector segment drawn from a commit row towards one of its parents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub from_lane: i32,
    pub to_lane: i32,
    pub is_mainline_edge: bool,
    pub is_parent_mainline: bool,
    pub parent_id: String,
}

/// One row of the laid-out history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitEntry {
    pub id: String,
    pub short_id: String,
    pub summary: String,
    pub displayed_summary: String,
    pub author: String,
    pub author_email: String,
    pub authored_at: DateTime<Utc>,
    pub relative_time: String,
    pub parent_ids: Vec<String>,
    pub lane: i32,
    pub lanes_before: Vec<i32>,
    pub lanes_after: Vec<i32>,
    pub connections: Vec<Connection>,
    pub is_mainline: bool,
    pub branch_names: Vec<String>,
    pub group_key: String,
    pub group_index: usize,
    pub group_size: usize,
}

impl CommitRecord {
    pub fn new(commit: &git2::Commit) -> Self {
        let author = commit.author();
        let author = GitSignature {
            name: author.name().unwrap_or("").to_string(),
            email: author.email().unwrap_or("").to_string(),
            when: DateTime::from_timestamp(author.when().seconds(), 0).unwrap_or_default(),
        };

        CommitRecord {
            id: commit.id().to_string(),
            summary: commit.summary().unwrap_or("").to_string(),
            author,
            parent_ids: commit.parent_ids().map(|id| id.to_string()).collect(),
        }
    }

    /// Abbreviated hash, `len` characters long at most.
    pub fn short_id(&self, len: usize) -> String {
        self.id.chars().take(len).collect()
    }

    /// Normalized key used to detect runs of duplicated commits.
    pub fn group_key(&self) -> String {
        format!(
            "{}|{}",
            self.summary.trim().to_lowercase(),
            self.author.name.to_lowercase()
        )
    }
}

impl CommitEntry {
    /// Lanes this row touches, before and after the commit is drawn.
    pub fn occupied_lanes(&self) -> impl Iterator<Item = i32> + '_ {
        self.lanes_before.iter().chain(self.lanes_after.iter()).copied()
    }

    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() > 1
    }

    /// Age of the commit measured from `now`, for views that refresh
    /// `relative_time` without recomputing the layout.
    pub fn relative_time_at(&self, now: DateTime<Utc>, date_format: &str) -> String {
        crate::graph::format::relative_time(self.authored_at, now, date_format)
    }
}
