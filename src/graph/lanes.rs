//! Lane allocation for the commit graph.
//!
//! A single forward pass over the walk-ordered commits. Mainline commits sit
//! on lane 0; every other commit either inherits the lane a child reserved for
//! it or gets a fresh one, alternating to the left and right of the mainline.
//! A lane stays occupied while any pending commit holds a reservation on it
//! and becomes reusable as soon as the last one is visited.

use crate::models::{CommitRecord, Connection};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Side of the mainline the next fresh lane is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    pub fn flipped(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Hands out fresh lanes, alternating sides after every allocation.
#[derive(Debug, Clone, Default)]
pub struct LaneAllocator {
    next: Side,
}

impl LaneAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_side(&self) -> Side {
        self.next
    }

    /// Closest lane to the mainline on the current side that is not in
    /// `used`. The lane is marked used before it is returned.
    pub fn allocate(&mut self, used: &mut BTreeSet<i32>) -> i32 {
        let (mut candidate, step) = match self.next {
            Side::Left => (-1, -1),
            Side::Right => (1, 1),
        };
        while used.contains(&candidate) {
            candidate += step;
        }

        self.next = self.next.flipped();
        used.insert(candidate);
        candidate
    }
}

/// Smallest and largest lane seen during a layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct LaneSpan {
    pub min: i32,
    pub max: i32,
}

impl LaneSpan {
    pub fn observe(&mut self, lane: i32) {
        self.min = self.min.min(lane);
        self.max = self.max.max(lane);
    }

    /// Widest distance from the mainline on either side.
    pub fn max_offset(&self) -> i32 {
        self.min.abs().max(self.max.abs())
    }
}

/// Lane assignment of one commit row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLanes {
    pub lane: i32,
    pub is_mainline: bool,
    pub lanes_before: Vec<i32>,
    pub lanes_after: Vec<i32>,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, Default)]
pub struct LaneAssignment {
    pub rows: Vec<RowLanes>,
    pub span: LaneSpan,
}

/// Mutable state threaded through the pass.
#[derive(Debug)]
pub struct LaneState<'a> {
    mainline: &'a HashSet<String>,
    /// Commits not visited yet.
    pending: HashSet<&'a str>,
    active_lanes: Vec<i32>,
    /// Lanes reserved for pending commits by an already visited child.
    future_lanes: HashMap<String, i32>,
    lane_by_commit: HashMap<String, i32>,
    allocator: LaneAllocator,
    span: LaneSpan,
}

impl<'a> LaneState<'a> {
    pub fn new(commits: &'a [CommitRecord], mainline: &'a HashSet<String>) -> Self {
        Self {
            mainline,
            pending: commits.iter().map(|c| c.id.as_str()).collect(),
            active_lanes: vec![0],
            future_lanes: HashMap::new(),
            lane_by_commit: HashMap::new(),
            allocator: LaneAllocator::new(),
            span: LaneSpan::default(),
        }
    }

    pub fn span(&self) -> LaneSpan {
        self.span
    }

    /// Lay out the next commit in walk order.
    pub fn advance(&mut self, commit: &CommitRecord) -> RowLanes {
        self.pending.remove(commit.id.as_str());

        let mut lanes_before: BTreeSet<i32> = self.active_lanes.iter().copied().collect();
        lanes_before.insert(0);

        let mut used = lanes_before.clone();
        used.extend(self.future_lanes.values().copied());

        let is_mainline = self.mainline.contains(&commit.id);
        let lane = if let Some(&lane) = self.lane_by_commit.get(&commit.id) {
            lane
        } else if is_mainline {
            0
        } else {
            self.allocator.allocate(&mut used)
        };
        self.future_lanes.remove(&commit.id);
        self.lane_by_commit.insert(commit.id.clone(), lane);
        used.insert(lane);
        lanes_before.insert(lane);

        let mut connections = Vec::with_capacity(commit.parent_ids.len());
        for parent in &commit.parent_ids {
            let is_pending = self.pending.contains(parent.as_str());
            if !is_pending && !self.future_lanes.contains_key(parent) {
                continue;
            }

            let is_parent_mainline = self.mainline.contains(parent);
            // every reservation is also recorded in lane_by_commit
            let parent_lane = match self.lane_by_commit.get(parent) {
                Some(&lane) => lane,
                None if is_parent_mainline => 0,
                None => self.allocator.allocate(&mut used),
            };
            self.lane_by_commit.insert(parent.clone(), parent_lane);
            used.insert(parent_lane);
            if is_pending {
                self.future_lanes.insert(parent.clone(), parent_lane);
            }
            self.span.observe(parent_lane);

            connections.push(Connection {
                from_lane: lane,
                to_lane: parent_lane,
                is_mainline_edge: is_mainline,
                is_parent_mainline,
                parent_id: parent.clone(),
            });
        }

        let pending = &self.pending;
        self.future_lanes.retain(|id, _| pending.contains(id.as_str()));

        let mut lanes_after: BTreeSet<i32> = self.future_lanes.values().copied().collect();
        lanes_after.insert(0);

        let lanes_before: Vec<i32> = lanes_before.into_iter().collect();
        let lanes_after: Vec<i32> = lanes_after.into_iter().collect();
        for &observed in lanes_before.iter().chain(lanes_after.iter()) {
            self.span.observe(observed);
        }
        self.active_lanes = lanes_after.clone();

        RowLanes {
            lane,
            is_mainline,
            lanes_before,
            lanes_after,
            connections,
        }
    }
}

/// Assign lanes to `commits`, which must be in walk order (children first).
pub fn assign_lanes(commits: &[CommitRecord], mainline: &HashSet<String>) -> LaneAssignment {
    let mut state = LaneState::new(commits, mainline);
    let rows = commits.iter().map(|commit| state.advance(commit)).collect();
    let span = state.span();

    debug!(
        "Assigned lanes to {} commits, span {}..={}",
        commits.len(),
        span.min,
        span.max
    );
    LaneAssignment { rows, span }
}
