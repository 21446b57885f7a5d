//! # Digimon Database Crate
//!
//! This crate is the read-only data-access boundary over the PostgreSQL
//! dataset (`digimons`, `evolutions`, `requirements` and the per-stage
//! aggregate procedure).
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. The rest of the workspace talks to the
//!   `DigimonStore` trait and never sees driver types or error codes.
//! - **Explicit absence:** Single-row lookups return `Lookup`, which separates
//!   "no such row" from a failed query.
//! - **Asynchronous & Pooled:** All operations are asynchronous and share a
//!   connection pool (`PgPool`).
//!
//! ## Public API
//!
//! - `connect`: Establishes the database connection pool from the loaded settings.
//! - `DigimonStore`: The injectable data-access interface.
//! - `DbRepository`: The PostgreSQL implementation of `DigimonStore`.
//! - `DbError`: The specific error types that can be returned from this crate.
//! - `MemoryStore` (feature `test-util`): An in-memory test double.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::DbError;
#[cfg(any(test, feature = "test-util"))]
pub use memory::{MemoryStore, StoreOp};
pub use repository::DbRepository;
pub use store::{DigimonStore, Lookup, RecordPage};
