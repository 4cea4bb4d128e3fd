use crate::models::CommitRecord;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Keep only commits reachable from the first one through parent edges.
///
/// Parents missing from `commits` (cut off by the walk limit, or outside the
/// branch) are treated as leaves. Walk order is preserved.
pub fn retain_relevant(commits: &mut Vec<CommitRecord>) {
    let Some(first) = commits.first() else {
        return;
    };

    let index_by_id: HashMap<&str, usize> = commits
        .iter()
        .enumerate()
        .map(|(index, commit)| (commit.id.as_str(), index))
        .collect();

    let mut relevant: HashSet<&str> = HashSet::new();
    let mut stack = vec![first.id.as_str()];
    relevant.insert(first.id.as_str());

    while let Some(current) = stack.pop() {
        let Some(&index) = index_by_id.get(current) else {
            continue;
        };
        for parent in &commits[index].parent_ids {
            if index_by_id.contains_key(parent.as_str()) && relevant.insert(parent.as_str()) {
                stack.push(parent.as_str());
            }
        }
    }

    let keep: Vec<bool> = commits.iter().map(|c| relevant.contains(c.id.as_str())).collect();
    let before = commits.len();
    let mut flags = keep.into_iter();
    commits.retain(|_| flags.next().unwrap_or(false));

    if commits.len() != before {
        debug!("Dropped {} unreachable commits", before - commits.len());
    }
}
