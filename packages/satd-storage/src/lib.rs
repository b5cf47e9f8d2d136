//! Persistence for SATD lineage records
//!
//! One port, two adapters:
//!
//! - `ResolutionSink`: the boundary the miner writes finished batches
//!   through. Batches arrive whole; a failed write never corrupts
//!   records persisted for earlier commit pairs.
//! - `SqliteResolutionStore`: file-backed SQL storage, one transaction
//!   per batch, idempotent on re-runs.
//! - `JsonlWriter`: newline-delimited JSON over any `Write`.
//!
//! ```rust,ignore
//! use satd_storage::{ResolutionSink, SqliteResolutionStore};
//!
//! let mut store = SqliteResolutionStore::new("satd.db")?;
//! store.write_pair(&outcome)?;
//! let counts = store.resolution_counts()?;
//! ```

pub mod error;
pub mod jsonl_writer;
pub mod sink;

#[cfg(feature = "sqlite")]
pub mod sqlite_store;

pub use error::{ErrorKind, Result, StorageError};
pub use jsonl_writer::JsonlWriter;
pub use sink::ResolutionSink;

#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteResolutionStore;
