//! SQLite storage implementation for Goalpost.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `goalpost-core` and contains:
//! - The storage engine: a pooled set of readers plus a single writer actor
//! - Idempotent schema creation and first-run seeding
//! - Repository implementations for users, goals, badges and quotes
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `goalpost-core` is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain, badge engine)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod badges;
pub mod goals;
pub mod quotes;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, ensure_schema, get_connection, get_db_path, init, read_snapshot, seed_if_empty,
    DbConnection, DbPool, SeedOptions, SeedReport, Storage, WriteHandle,
};

// Re-export repositories
pub use badges::BadgeRepository;
pub use goals::GoalRepository;
pub use quotes::QuoteRepository;
pub use users::UserRepository;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from goalpost-core for convenience
pub use goalpost_core::errors::{DatabaseError, Error, Result};
