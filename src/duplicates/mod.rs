//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - The shared digest table ([`DigestTable`])
//! - The bounded hashing pool ([`WorkerPool`])
//! - Collision group derivation ([`build_groups`])
//! - Scan orchestration ([`DuplicateFinder`])

pub mod finder;
pub mod groups;
pub mod pool;
pub mod table;

pub use finder::{validate_directory, DuplicateFinder, FinderConfig, FinderError};
pub use groups::{build_groups, DuplicateGroup, ScanReport, ScanSummary};
pub use pool::{
    Diagnostics, Dispatcher, PoolError, Worker, WorkerPool, DEFAULT_IO_THREADS,
    DEFAULT_QUEUE_CAPACITY,
};
pub use table::{DigestGroup, DigestTable, RecordError, TableSnapshot};
