//! Goalpost Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the goal tracker: users, goals,
//! quotes, the badge catalog and the badge engine. It is database-agnostic and
//! defines repository traits that are implemented by the `storage-sqlite`
//! crate.

pub mod badges;
pub mod constants;
pub mod errors;
pub mod goals;
pub mod quotes;
pub mod sample_data;
pub mod users;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
