//! Repositories page state.

use folio_github::RepoCard;

/// Static placeholder shown when the fetch fails.
pub const FETCH_ERROR_PLACEHOLDER: &str = "Error loading repositories";

/// Loading state of the repository list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RepoListState {
    /// Nothing fetched yet.
    #[default]
    Idle,
    Loading,
    Loaded(Vec<RepoCard>),
    /// Exactly one placeholder message, never partial cards.
    Error(String),
}

impl RepoListState {
    pub fn cards(&self) -> &[RepoCard] {
        match self {
            RepoListState::Loaded(cards) => cards,
            _ => &[],
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, RepoListState::Idle)
    }
}
