//! Integration tests for history-lanes
//!
//! These build real repositories through libgit2 in a temporary directory and
//! check the laid-out history end to end.

use git2::{Oid, Repository, Signature, Time};
use history_lanes::git::{GitRepository, HistoryBackend};
use history_lanes::graph::{compute_layout, LayoutWarning};
use history_lanes::state::{CommitHistory, HistoryConfig, HistoryEvent};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Test utilities for integration tests
pub mod test_utils {
    use super::*;

    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    }

    /// Create an empty repository in a temporary directory
    pub fn create_test_repo() -> anyhow::Result<(TempDir, Repository)> {
        let temp_dir = TempDir::new()?;
        let repo = Repository::init(temp_dir.path())?;
        Ok((temp_dir, repo))
    }

    /// Write a commit with an empty tree, authored `seconds` after the epoch
    pub fn create_test_commit(
        repo: &Repository,
        message: &str,
        author: &str,
        parents: &[Oid],
        seconds: i64,
    ) -> anyhow::Result<Oid> {
        let email = format!("{}@example.com", author.to_lowercase());
        let signature = Signature::new(author, &email, &Time::new(seconds, 0))?;
        let tree_id = repo.index()?.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let parents = parents
            .iter()
            .map(|oid| repo.find_commit(*oid))
            .collect::<Result<Vec<_>, _>>()?;
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        Ok(repo.commit(None, &signature, &signature, message, &tree, &parent_refs)?)
    }

    pub fn set_branch(repo: &Repository, name: &str, target: Oid) -> anyhow::Result<()> {
        repo.reference(&format!("refs/heads/{}", name), target, true, "test")?;
        Ok(())
    }

    /// Ids of a merge repository: linear main history, one merged side commit
    /// and an unmerged topic branch.
    pub struct MergeRepo {
        pub temp_dir: TempDir,
        pub root: Oid,
        pub side: Oid,
        pub merge: Oid,
        pub topic: Oid,
    }

    pub fn create_merge_repo() -> anyhow::Result<MergeRepo> {
        let (temp_dir, repo) = create_test_repo()?;
        let root = create_test_commit(&repo, "Initial commit", "Ann", &[], 1_000)?;
        let parser = create_test_commit(&repo, "12 Add parser", "Ann", &[root], 2_000)?;
        let side = create_test_commit(&repo, "Side work", "Bob", &[parser], 2_500)?;
        let tidy = create_test_commit(&repo, "Tidy up", "Ann", &[parser], 3_000)?;
        let merge = create_test_commit(&repo, "Merge side", "Ann", &[tidy, side], 4_000)?;
        let topic = create_test_commit(&repo, "Topic work", "Cid", &[tidy], 5_000)?;

        set_branch(&repo, "main", merge)?;
        set_branch(&repo, "side", side)?;
        set_branch(&repo, "Topic", topic)?;
        repo.set_head("refs/heads/main")?;

        Ok(MergeRepo {
            temp_dir,
            root,
            side,
            merge,
            topic,
        })
    }
}

use test_utils::*;

#[test]
fn test_merge_history_layout() -> anyhow::Result<()> {
    init_tracing();
    let fixture = create_merge_repo()?;
    let repository = GitRepository::open(fixture.temp_dir.path())?;

    let layout = compute_layout(&repository, "main", &HistoryConfig::default());
    assert_eq!(layout.entries.len(), 5);
    assert!(layout.warnings.is_empty());
    assert_eq!(layout.max_lane_offset(), 1);

    let merge = &layout.entries[0];
    assert_eq!(merge.id, fixture.merge.to_string());
    assert!(merge.is_merge());
    assert_eq!(merge.connections.len(), 2);
    assert!(merge.connections[0].is_parent_mainline);
    assert!(!merge.connections[1].is_parent_mainline);
    assert_eq!(merge.connections[1].parent_id, fixture.side.to_string());

    let side = layout
        .entries
        .iter()
        .find(|e| e.id == fixture.side.to_string())
        .expect("side commit is laid out");
    assert!(!side.is_mainline);
    assert_ne!(side.lane, 0);
    assert_eq!(side.branch_names, vec!["main".to_string()]);

    for entry in &layout.entries {
        assert!(entry.lanes_before.contains(&0));
        assert!(entry.lanes_after.contains(&0));
        assert_eq!(entry.short_id.len(), 7);
        if entry.is_mainline {
            assert_eq!(entry.lane, 0);
            assert_eq!(entry.branch_names, vec!["main".to_string()]);
        }
    }

    let root = layout.entries.last().expect("root is laid out");
    assert_eq!(root.id, fixture.root.to_string());
    assert!(root.connections.is_empty());

    let parser = layout
        .entries
        .iter()
        .find(|e| e.summary == "12 Add parser")
        .expect("parser commit is laid out");
    assert_eq!(parser.displayed_summary, "Add parser (#12)");
    Ok(())
}

#[test]
fn test_layout_is_idempotent() -> anyhow::Result<()> {
    let fixture = create_merge_repo()?;
    let repository = GitRepository::open(fixture.temp_dir.path())?;
    let config = HistoryConfig::default();

    let first = compute_layout(&repository, "main", &config);
    let second = compute_layout(&repository, "main", &config);
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_unmerged_topic_is_not_part_of_main() -> anyhow::Result<()> {
    let fixture = create_merge_repo()?;
    let repository = GitRepository::open(fixture.temp_dir.path())?;

    let layout = compute_layout(&repository, "main", &HistoryConfig::default());
    assert!(layout.entries.iter().all(|e| e.id != fixture.topic.to_string()));

    let topic = compute_layout(&repository, "Topic", &HistoryConfig::default());
    assert_eq!(topic.entries[0].id, fixture.topic.to_string());
    assert_eq!(topic.entries.len(), 4);
    assert_eq!(topic.entries[0].branch_names, vec!["Topic".to_string()]);
    Ok(())
}

#[test]
fn test_commit_history_selection() -> anyhow::Result<()> {
    init_tracing();
    let fixture = create_merge_repo()?;
    let repository = GitRepository::open(fixture.temp_dir.path())?;

    let mut history = CommitHistory::new(HistoryConfig::default());
    let events = history.set_repository(Some(Box::new(repository)));
    assert!(events.contains(&HistoryEvent::BranchesChanged));
    assert!(events.contains(&HistoryEvent::EntriesReset));
    assert_eq!(history.branches(), &["main", "side", "Topic"]);
    assert_eq!(history.current_branch(), "main");
    assert_eq!(history.len(), 5);

    let before = history.layout().clone();
    assert!(history.set_current_branch("no-such-branch").is_empty());
    assert_eq!(history.current_branch(), "main");
    assert_eq!(history.layout(), &before);

    let events = history.set_current_branch("side");
    assert!(events.contains(&HistoryEvent::CurrentBranchChanged));
    assert_eq!(history.len(), 3);
    assert_eq!(history.max_lane_offset(), 0);
    assert_eq!(
        history.entry(0).map(|e| e.id.clone()),
        Some(fixture.side.to_string())
    );
    Ok(())
}

#[test]
fn test_long_history_is_capped() -> anyhow::Result<()> {
    let (temp_dir, repo) = create_test_repo()?;
    let mut parent: Option<Oid> = None;
    for i in 0..2_050 {
        let parents: Vec<Oid> = parent.into_iter().collect();
        let oid = create_test_commit(&repo, &format!("Change {}", i), "Ann", &parents, 1_000 + i)?;
        parent = Some(oid);
    }
    set_branch(&repo, "main", parent.expect("commits were written"))?;

    let repository = GitRepository::open(temp_dir.path())?;
    let layout = compute_layout(&repository, "main", &HistoryConfig::default());

    assert_eq!(layout.entries.len(), 2000);
    assert_eq!(layout.warnings, vec![LayoutWarning::HistoryCapped { limit: 2000 }]);
    assert!(layout.entries.iter().all(|e| e.lane == 0));
    let last = layout.entries.last().expect("capped history is not empty");
    assert!(last.connections.is_empty());
    assert_eq!(last.parent_ids.len(), 1);
    Ok(())
}

#[test]
fn test_unresolvable_branch_gives_empty_layout() -> anyhow::Result<()> {
    let (temp_dir, _repo) = create_test_repo()?;
    let repository = GitRepository::open(temp_dir.path())?;

    assert!(repository.list_local_branches()?.is_empty());
    let layout = compute_layout(&repository, "main", &HistoryConfig::default());
    assert!(layout.entries.is_empty());
    assert_eq!(layout.max_lane_offset(), 0);
    assert!(matches!(
        layout.warnings.as_slice(),
        [LayoutWarning::BranchUnresolvable { .. }]
    ));
    Ok(())
}

#[test]
fn test_entries_serialize_with_presentation_names() -> anyhow::Result<()> {
    let fixture = create_merge_repo()?;
    let repository = GitRepository::open(fixture.temp_dir.path())?;
    let layout = compute_layout(&repository, "main", &HistoryConfig::default());

    let json = serde_json::to_value(&layout.entries[0])?;
    assert_eq!(json["displayedSummary"], "Merge side");
    assert_eq!(json["isMainline"], true);
    assert_eq!(json["lanesBefore"], serde_json::json!([0]));
    assert!(json["connections"][1]["toLane"].is_number());
    Ok(())
}
