//! Branch-name propagation along lanes.
//!
//! Runs after lane allocation and only reads its per-row output. Names flow
//! from a commit to the parents it reserves, and from a lane to whatever
//! commit lands on it next.

use crate::graph::lanes::RowLanes;
use std::collections::{BTreeMap, HashMap};

/// Per-lane label table carried from one row to the next.
#[derive(Debug)]
pub struct LabelPropagator<'a> {
    current_branch: &'a str,
    unknown_label: &'a str,
    branch_tips: &'a HashMap<String, Vec<String>>,
    lane_labels: HashMap<i32, Vec<String>>,
    reserved_labels: HashMap<String, Vec<String>>,
    /// Pending commits and their reserved lanes. Ordered so that the lane
    /// table rebuild is deterministic when reservations share a lane.
    reserved_lanes: BTreeMap<String, i32>,
}

impl<'a> LabelPropagator<'a> {
    pub fn new(
        current_branch: &'a str,
        unknown_label: &'a str,
        branch_tips: &'a HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            current_branch,
            unknown_label,
            branch_tips,
            lane_labels: HashMap::from([(0, vec![current_branch.to_string()])]),
            reserved_labels: HashMap::new(),
            reserved_lanes: BTreeMap::new(),
        }
    }

    fn current(&self) -> Vec<String> {
        vec![self.current_branch.to_string()]
    }

    /// Names for the commit drawn on `row`, updating the tables for the
    /// rows below it.
    pub fn label_row(&mut self, commit_id: &str, row: &RowLanes) -> Vec<String> {
        let reserved = self.reserved_labels.remove(commit_id);
        self.reserved_lanes.remove(commit_id);

        let mut names = if row.is_mainline {
            self.current()
        } else if let Some(names) = reserved {
            names
        } else if let Some(names) = self.lane_labels.get(&row.lane) {
            names.clone()
        } else {
            self.branch_tips.get(commit_id).cloned().unwrap_or_default()
        };
        if names.is_empty() && !row.is_mainline {
            names.push(self.unknown_label.to_string());
        }
        if !names.is_empty() {
            self.lane_labels.insert(row.lane, names.clone());
        }

        for connection in &row.connections {
            let parent = &connection.parent_id;
            let parent_names = if connection.is_parent_mainline {
                self.current()
            } else if let Some(existing) = self.reserved_labels.get(parent) {
                existing.clone()
            } else if let Some(on_lane) = self.lane_labels.get(&connection.to_lane) {
                on_lane.clone()
            } else if !names.is_empty() {
                names.clone()
            } else {
                self.branch_tips.get(parent).cloned().unwrap_or_default()
            };

            if !parent_names.is_empty() {
                self.reserved_labels.insert(parent.clone(), parent_names);
            }
            self.reserved_lanes.insert(parent.clone(), connection.to_lane);
        }

        self.rebuild_lane_labels();
        names
    }

    fn rebuild_lane_labels(&mut self) {
        let mut next: HashMap<i32, Vec<String>> = HashMap::new();

        for (commit_id, &lane) in &self.reserved_lanes {
            let names = if lane == 0 {
                self.current()
            } else {
                self.reserved_labels
                    .get(commit_id)
                    .filter(|names| !names.is_empty())
                    .or_else(|| self.lane_labels.get(&lane))
                    .cloned()
                    .unwrap_or_default()
            };
            if !names.is_empty() {
                next.insert(lane, names);
            }
        }
        next.entry(0).or_insert_with(|| self.current());

        self.lane_labels = next;
    }
}

/// Branch names for every row of a finished lane assignment.
pub fn propagate_labels(
    commit_ids: &[&str],
    rows: &[RowLanes],
    branch_tips: &HashMap<String, Vec<String>>,
    current_branch: &str,
    unknown_label: &str,
) -> Vec<Vec<String>> {
    let mut propagator = LabelPropagator::new(current_branch, unknown_label, branch_tips);
    commit_ids
        .iter()
        .zip(rows)
        .map(|(id, row)| propagator.label_row(id, row))
        .collect()
}
