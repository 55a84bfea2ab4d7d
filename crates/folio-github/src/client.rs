//! Repository source trait.

use crate::types::RepoCard;
use async_trait::async_trait;

/// Source of a user's public repositories.
///
/// Implementations must be `Send + Sync` so the fetch can run on a
/// background task while the UI keeps rendering.
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// Fetch `user`'s public repositories as display cards.
    async fn fetch_repositories(&self, user: &str) -> anyhow::Result<Vec<RepoCard>>;
}
