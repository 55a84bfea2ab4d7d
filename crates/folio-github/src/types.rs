//! Repository card view model.

use serde::{Deserialize, Serialize};

/// Placeholder shown when a repository has no description.
pub const NO_DESCRIPTION: &str = "No description available";

/// One repository card on the repositories page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoCard {
    pub name: String,
    pub description: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub html_url: String,
}

impl RepoCard {
    /// Description for display, with the placeholder fallback.
    pub fn description_or_fallback(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(NO_DESCRIPTION)
    }
}
