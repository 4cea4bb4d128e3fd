pub mod commit;

pub use commit::{BranchTip, CommitEntry, CommitRecord, Connection, GitSignature};
