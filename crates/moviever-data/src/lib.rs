//! Dataset layer for moviever.
//!
//! Turns raw discover records into a prepared tabular dataset (typed
//! dates, derived year, gems score, resolved genre/language names),
//! persists it as a CSV snapshot, and answers predicate-based queries.

/// Timestamped CSV export of filtered subsets.
pub mod export;
/// Predicate-based row selection.
pub mod filter;
/// Raw-record to prepared-row derivation.
pub mod prepare;
/// Gems score computation.
pub mod score;
/// On-disk CSV snapshot persistence.
pub mod snapshot;
/// Top-gems ranking helpers.
pub mod top_gems;
/// Prepared-row data model.
pub mod types;
