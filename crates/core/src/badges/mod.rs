//! Badges module - catalog, award records and the badge engine.

mod badge_engine;
mod badges_catalog;
mod badges_model;
mod badges_traits;

pub use badge_engine::{eligible_badges, BadgeEngine};
pub use badges_catalog::default_badge_catalog;
pub use badges_model::{Badge, BadgeProgress, EarnedBadge, UserBadge};
pub use badges_traits::BadgeRepositoryTrait;
