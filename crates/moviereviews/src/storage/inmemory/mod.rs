//! In-memory storage backend.
//!
//! Stores every table in a `BTreeMap` wrapped in `Arc<RwLock<_>>` and runs
//! each [`QuerySpec`](moviereviews_core::storage::QuerySpec) by evaluating it
//! against the stored items, so results match what the DynamoDB backend
//! returns for the same query.
//!
//! # Example
//!
//! ```rust,ignore
//! use moviereviews::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
