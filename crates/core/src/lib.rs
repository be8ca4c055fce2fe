//! Core types and the purge loop for tablewipe.
//!
//! Nothing in this crate talks to a real database: the loop is written
//! against the [`store::TableStore`] trait and tested with the in-memory
//! backend.

pub mod batch;
pub mod keys;
pub mod purge;
pub mod report;
pub mod store;

pub use keys::{ItemKey, KeySchema, KeyValue};
pub use purge::{purge_table, PurgeOptions, PurgeProgress, PurgeSummary};
pub use store::{PurgeScope, StoreError, TableStore};
