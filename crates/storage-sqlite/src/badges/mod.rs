//! SQLite storage implementation for badges and awards.

mod model;
mod repository;

pub use model::{BadgeDB, UserBadgeDB};
pub use repository::BadgeRepository;
