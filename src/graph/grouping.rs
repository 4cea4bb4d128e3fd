use crate::models::CommitEntry;

/// Number consecutive entries that share a group key.
///
/// Each maximal run gets `group_index` 0, 1, 2, ... and every member carries
/// the run length in `group_size`.
pub fn assign_groups(entries: &mut [CommitEntry]) {
    let mut run_start = 0;

    for index in 0..entries.len() {
        if index > 0 && entries[index].group_key != entries[index - 1].group_key {
            close_run(&mut entries[run_start..index]);
            run_start = index;
        }
        entries[index].group_index = index - run_start;
    }

    let len = entries.len();
    close_run(&mut entries[run_start..len]);
}

fn close_run(run: &mut [CommitEntry]) {
    let size = run.len();
    for entry in run {
        entry.group_size = size;
    }
}
