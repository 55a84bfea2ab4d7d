//! Public repository listing for the folio site
//!
//! Fetches a fixed user's public repositories from the GitHub API and maps
//! them to the cards the repositories page renders. The fetch goes through
//! the [`RepoSource`] trait so the page logic never depends on the
//! concrete API client.
//!
//! Deliberately minimal: one unauthenticated request, no pagination, no
//! caching, no retries. A failed fetch becomes a single static error
//! placeholder on the page.

pub mod client;
pub mod octocrab_client;
pub mod types;

pub use client::RepoSource;
pub use octocrab_client::OctocrabRepoSource;
pub use types::RepoCard;
