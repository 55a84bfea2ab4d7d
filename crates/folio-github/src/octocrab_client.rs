//! Octocrab-based repository source.

use crate::client::RepoSource;
use crate::types::RepoCard;
use async_trait::async_trait;
use log::debug;
use octocrab::Octocrab;
use serde::Deserialize;
use std::sync::Arc;

/// Repository source backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct OctocrabRepoSource {
    octocrab: Arc<Octocrab>,
}

/// The slice of the repository payload the cards need.
#[derive(Debug, Deserialize)]
struct RepoDto {
    name: String,
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    html_url: String,
}

impl OctocrabRepoSource {
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Build a source against the public API, unauthenticated.
    pub fn public() -> anyhow::Result<Self> {
        let octocrab = Octocrab::builder().build()?;
        Ok(Self::new(Arc::new(octocrab)))
    }
}

#[async_trait]
impl RepoSource for OctocrabRepoSource {
    async fn fetch_repositories(&self, user: &str) -> anyhow::Result<Vec<RepoCard>> {
        debug!("Fetching repositories for {}", user);

        // Raw GET: the typed API has no handler for the public
        // user-repository listing.
        let route = format!("/users/{}/repos", user);
        let repos: Vec<RepoDto> = self.octocrab.get(route, None::<&()>).await?;

        debug!("Fetched {} repositories for {}", repos.len(), user);
        Ok(repos.iter().map(convert_repo).collect())
    }
}

/// Convert the API payload to our card type.
fn convert_repo(repo: &RepoDto) -> RepoCard {
    RepoCard {
        name: repo.name.clone(),
        description: repo.description.clone(),
        stars: repo.stargazers_count,
        forks: repo.forks_count,
        html_url: repo.html_url.clone(),
    }
}
