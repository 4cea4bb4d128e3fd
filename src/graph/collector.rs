use crate::git::{ErrorReporter, HistoryBackend};
use crate::graph::LayoutWarning;
use crate::models::CommitRecord;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Everything read from the backend for one layout run.
#[derive(Debug, Default)]
pub struct CollectedHistory {
    /// Commits in walk order, head first.
    pub commits: Vec<CommitRecord>,
    /// Ids on the head's first-parent chain.
    pub mainline: HashSet<String>,
    /// Commit id to the names of every local branch whose tip is that commit.
    pub branch_tips: HashMap<String, Vec<String>>,
    pub warnings: Vec<LayoutWarning>,
}

/// Read the history of `branch`, walking at most `max_commits` commits.
///
/// Never fails: an unresolvable branch yields an empty history, and a failing
/// lookup mid-walk keeps whatever was collected before it.
pub fn collect(backend: &dyn HistoryBackend, branch: &str, max_commits: usize) -> CollectedHistory {
    let mut history = CollectedHistory::default();

    let head = match backend.resolve_branch_head(branch) {
        Ok(head) => head,
        Err(e) => {
            ErrorReporter::log_error(&e, "resolving branch head");
            history.warnings.push(LayoutWarning::from_error(&e, branch));
            return history;
        }
    };

    history.mainline = backend.first_parent_chain(&head).into_iter().collect();
    history.branch_tips = collect_branch_tips(backend, &mut history.warnings);

    // one id past the cap tells a truncated history from one that fits exactly
    let walk = match backend.walk_ancestry(&head, max_commits.saturating_add(1)) {
        Ok(walk) => walk,
        Err(e) => {
            ErrorReporter::log_error(&e, "starting ancestry walk");
            history.warnings.push(LayoutWarning::from_error(&e, &head));
            return history;
        }
    };

    for id in walk {
        if history.commits.len() == max_commits {
            history.warnings.push(LayoutWarning::HistoryCapped { limit: max_commits });
            break;
        }
        let record = id.and_then(|id| backend.load_commit(&id));
        match record {
            Ok(record) => history.commits.push(record),
            Err(e) => {
                ErrorReporter::log_error(&e, "walking ancestry");
                history.warnings.push(LayoutWarning::from_error(&e, &head));
                break;
            }
        }
    }

    debug!(
        "Collected {} commits for '{}' ({} on mainline, {} branch tips)",
        history.commits.len(),
        branch,
        history.mainline.len(),
        history.branch_tips.len()
    );
    history
}

/// Map each branch tip commit to the names of the branches pointing at it.
pub fn collect_branch_tips(
    backend: &dyn HistoryBackend,
    warnings: &mut Vec<LayoutWarning>,
) -> HashMap<String, Vec<String>> {
    let mut tips: HashMap<String, Vec<String>> = HashMap::new();

    match backend.list_local_branches() {
        Ok(branches) => {
            for branch in branches {
                tips.entry(branch.target).or_default().push(branch.name);
            }
        }
        Err(e) => {
            ErrorReporter::log_error(&e, "listing branch tips");
            warnings.push(LayoutWarning::from_error(&e, "branches"));
        }
    }

    tips
}
