//! Commit-graph layout: from a branch name to laid-out rows.
//!
//! The pipeline runs collector, relevance filter, lane allocation, label
//! propagation and grouping, in that order. It never fails; problems are
//! reported as [`LayoutWarning`]s next to a possibly empty or partial result.

pub mod collector;
pub mod format;
pub mod grouping;
pub mod labels;
pub mod lanes;
pub mod relevance;

pub use lanes::{LaneAllocator, LaneSpan, Side};

use crate::git::{GitError, HistoryBackend};
use crate::models::CommitEntry;
use crate::state::HistoryConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Recovered problem that left the layout empty or partial.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LayoutWarning {
    #[error("Branch '{branch}' could not be resolved")]
    BranchUnresolvable { branch: String },

    #[error("History lookup failed at {target}: {reason}")]
    LookupFailure { target: String, reason: String },

    #[error("History truncated at {limit} commits")]
    HistoryCapped { limit: usize },
}

impl LayoutWarning {
    /// Warning for `error`, raised while working on `target`.
    pub fn from_error(error: &GitError, target: &str) -> Self {
        match error {
            GitError::BranchUnresolvable { branch } => LayoutWarning::BranchUnresolvable {
                branch: branch.clone(),
            },
            GitError::LookupFailure { target, reason } => LayoutWarning::LookupFailure {
                target: target.clone(),
                reason: reason.clone(),
            },
            other => LayoutWarning::LookupFailure {
                target: target.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Finished layout for one branch selection. Never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryLayout {
    pub branch: String,
    pub entries: Vec<CommitEntry>,
    pub lane_span: LaneSpan,
    pub warnings: Vec<LayoutWarning>,
}

impl HistoryLayout {
    pub fn empty(branch: &str) -> Self {
        Self {
            branch: branch.to_string(),
            ..Self::default()
        }
    }

    pub fn max_lane_offset(&self) -> i32 {
        self.lane_span.max_offset()
    }
}

/// Lay out the history of `branch`, formatting ages against the current time.
pub fn compute_layout(
    backend: &dyn HistoryBackend,
    branch: &str,
    config: &HistoryConfig,
) -> HistoryLayout {
    compute_layout_at(backend, branch, config, Utc::now())
}

/// Lay out the history of `branch` with relative times measured from `now`.
pub fn compute_layout_at(
    backend: &dyn HistoryBackend,
    branch: &str,
    config: &HistoryConfig,
    now: DateTime<Utc>,
) -> HistoryLayout {
    if branch.is_empty() {
        return HistoryLayout::empty(branch);
    }

    let mut history = collector::collect(backend, branch, config.max_commits);
    relevance::retain_relevant(&mut history.commits);

    let assignment = lanes::assign_lanes(&history.commits, &history.mainline);
    let ids: Vec<&str> = history.commits.iter().map(|c| c.id.as_str()).collect();
    let labels = labels::propagate_labels(
        &ids,
        &assignment.rows,
        &history.branch_tips,
        branch,
        &config.unknown_branch_label,
    );

    let mut entries: Vec<CommitEntry> = history
        .commits
        .iter()
        .zip(assignment.rows)
        .zip(labels)
        .map(|((commit, row), branch_names)| CommitEntry {
            id: commit.id.clone(),
            short_id: commit.short_id(config.short_id_len),
            summary: commit.summary.clone(),
            displayed_summary: format::displayed_summary(&commit.summary),
            author: commit.author.name.clone(),
            author_email: commit.author.email.clone(),
            authored_at: commit.author.when,
            relative_time: format::relative_time(commit.author.when, now, &config.date_format),
            parent_ids: commit.parent_ids.clone(),
            lane: row.lane,
            lanes_before: row.lanes_before,
            lanes_after: row.lanes_after,
            connections: row.connections,
            is_mainline: row.is_mainline,
            branch_names,
            group_key: commit.group_key(),
            group_index: 0,
            group_size: 1,
        })
        .collect();
    grouping::assign_groups(&mut entries);

    debug!(
        "Laid out {} commits for '{}', max lane offset {}",
        entries.len(),
        branch,
        assignment.span.max_offset()
    );

    HistoryLayout {
        branch: branch.to_string(),
        entries,
        lane_span: assignment.span,
        warnings: history.warnings,
    }
}
