use crate::git::{ErrorReporter, GitError, HistoryBackend};
use crate::graph::{self, HistoryLayout, LayoutWarning};
use crate::models::CommitEntry;
use crate::state::HistoryConfig;
use std::fmt;
use tracing::info;

/// Change a presentation layer observes after a mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEvent {
    BranchesChanged,
    CurrentBranchChanged,
    LaneSpanChanged,
    /// The entry list was replaced as a whole.
    EntriesReset,
}

/// Laid-out history of the selected branch of one repository.
///
/// Owns the backend and the latest [`HistoryLayout`]. Every change of
/// repository or branch recomputes the layout from scratch.
pub struct CommitHistory {
    backend: Option<Box<dyn HistoryBackend>>,
    config: HistoryConfig,
    branches: Vec<String>,
    current_branch: String,
    layout: HistoryLayout,
}

impl fmt::Debug for CommitHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitHistory")
            .field("has_backend", &self.backend.is_some())
            .field("branches", &self.branches)
            .field("current_branch", &self.current_branch)
            .field("entries", &self.layout.entries.len())
            .finish()
    }
}

impl Default for CommitHistory {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl CommitHistory {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            backend: None,
            config,
            branches: Vec::new(),
            current_branch: String::new(),
            layout: HistoryLayout::default(),
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn entries(&self) -> &[CommitEntry] {
        &self.layout.entries
    }

    pub fn entry(&self, index: usize) -> Option<&CommitEntry> {
        self.layout.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.layout.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.entries.is_empty()
    }

    pub fn branches(&self) -> &[String] {
        &self.branches
    }

    pub fn current_branch(&self) -> &str {
        &self.current_branch
    }

    pub fn max_lane_offset(&self) -> i32 {
        self.layout.max_lane_offset()
    }

    pub fn warnings(&self) -> &[LayoutWarning] {
        &self.layout.warnings
    }

    pub fn layout(&self) -> &HistoryLayout {
        &self.layout
    }

    /// Replace the repository (or drop it with `None`) and reload.
    pub fn set_repository(&mut self, backend: Option<Box<dyn HistoryBackend>>) -> Vec<HistoryEvent> {
        info!(
            "Switching repository ({})",
            if backend.is_some() { "attached" } else { "detached" }
        );
        self.backend = backend;
        self.reload()
    }

    /// Re-read the branch list, keep or pick a branch, and lay it out again.
    pub fn reload(&mut self) -> Vec<HistoryEvent> {
        let mut events = Vec::new();

        let branches = self.read_branches();
        if branches != self.branches {
            self.branches = branches;
            events.push(HistoryEvent::BranchesChanged);
        }

        let selected = self.default_branch();
        if selected != self.current_branch {
            info!("Selected branch '{}'", selected);
            self.current_branch = selected;
            events.push(HistoryEvent::CurrentBranchChanged);
        }

        events.extend(self.relayout());
        events
    }

    /// Select `name` and lay it out. Names that are not local branches are
    /// ignored; an empty name clears the selection.
    pub fn set_current_branch(&mut self, name: &str) -> Vec<HistoryEvent> {
        if name == self.current_branch {
            return Vec::new();
        }
        if !name.is_empty() && !self.branches.iter().any(|b| b == name) {
            tracing::debug!("Ignoring selection of unknown branch '{}'", name);
            return Vec::new();
        }

        info!("Selected branch '{}'", name);
        self.current_branch = name.to_string();
        let mut events = vec![HistoryEvent::CurrentBranchChanged];
        events.extend(self.relayout());
        events
    }

    fn read_branches(&self) -> Vec<String> {
        let Some(backend) = &self.backend else {
            return Vec::new();
        };

        match backend.list_local_branches() {
            Ok(tips) => {
                let mut names: Vec<String> = tips.into_iter().map(|tip| tip.name).collect();
                names.sort_by_key(|name| name.to_lowercase());
                names.dedup();
                names
            }
            Err(e) => {
                ErrorReporter::log_error(&e, "listing branches");
                Vec::new()
            }
        }
    }

    fn has_branch(&self, name: &str) -> bool {
        self.branches.iter().any(|b| b == name)
    }

    /// Current branch if it survived, else HEAD's branch, else the first
    /// preferred name present, else the first branch.
    fn default_branch(&self) -> String {
        if !self.current_branch.is_empty() && self.has_branch(&self.current_branch) {
            return self.current_branch.clone();
        }

        let head = self.backend.as_ref().and_then(|backend| backend.head_branch());
        head.into_iter()
            .chain(self.config.preferred_branches.iter().cloned())
            .find(|name| self.has_branch(name))
            .or_else(|| self.branches.first().cloned())
            .unwrap_or_default()
    }

    fn relayout(&mut self) -> Vec<HistoryEvent> {
        let layout = match &self.backend {
            Some(backend) => {
                graph::compute_layout(backend.as_ref(), &self.current_branch, &self.config)
            }
            None => {
                ErrorReporter::log_error(&GitError::RepositoryUnavailable, "laying out history");
                HistoryLayout::empty(&self.current_branch)
            }
        };

        let mut events = vec![HistoryEvent::EntriesReset];
        if layout.max_lane_offset() != self.layout.max_lane_offset() {
            events.push(HistoryEvent::LaneSpanChanged);
        }
        self.layout = layout;
        events
    }
}
