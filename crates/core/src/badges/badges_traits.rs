use crate::badges::badges_model::{Badge, EarnedBadge, UserBadge};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for badge catalog and award persistence
#[async_trait]
pub trait BadgeRepositoryTrait: Send + Sync {
    /// Full catalog, lowest threshold first.
    fn all_badges(&self) -> Result<Vec<Badge>>;
    /// Catalog rows the user has been awarded.
    fn badges_for_user(&self, user_id: &str) -> Result<Vec<Badge>>;
    /// Records an award. Fails with `BadgeAlreadyAwarded` if the pair exists.
    async fn award(&self, user_id: &str, badge_id: &str) -> Result<UserBadge>;
    /// Most recent awards first.
    fn recently_earned(&self, user_id: &str, limit: i64) -> Result<Vec<EarnedBadge>>;
}
