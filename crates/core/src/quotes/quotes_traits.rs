use crate::errors::Result;
use crate::quotes::Quote;
use async_trait::async_trait;

/// Trait for quote repository operations
#[async_trait]
pub trait QuoteRepositoryTrait: Send + Sync {
    async fn save_many(&self, quotes: Vec<Quote>) -> Result<usize>;
    /// Picks one stored quote uniformly at random, `None` if there are none.
    fn random_one(&self) -> Result<Option<Quote>>;
    fn count(&self) -> Result<i64>;
    async fn delete_all(&self) -> Result<usize>;
}
