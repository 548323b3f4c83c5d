//! Set-aware merging of sorted sequences.
//!
//! * [`merge`]: lazy two-way merge of sorted iterators, filtered by a
//!   [`Subset`] of exclusive and shared elements.
//! * [`partition`]: merge of two adjacent sorted partitions of one slice,
//!   either through a scratch buffer or in place with full rollback when the
//!   ordering predicate fails.

pub mod merge;
pub mod partition;
pub mod subset;
pub mod visitor;
mod search;

pub use merge::{
    merge_into, merge_into_by, merge_sorted, merge_sorted_by,
    try_merge_into_by, try_merge_sorted_by,
    MergeSorted, TryMergeSorted,
};
pub use partition::{
    merge_partitions, merge_partitions_by, try_merge_partitions_by,
    merge_partitions_in_place, merge_partitions_in_place_by,
    try_merge_partitions_in_place_by,
};
pub use subset::{ParseSubsetError, Subset};
