//! Functional core for the movie reviews service.
//!
//! Pure data types and pure functions with no I/O: entity schemas, request
//! payloads, validation, the expression builder, and the repository traits
//! implemented by the storage backends in the `moviereviews` binary.

pub mod movies;
pub mod storage;
