//! Navigation menu: site-root prefix and active-link computation.

use crate::location::{Location, Protocol};
use serde::{Deserialize, Serialize};

/// Pages reachable from the navigation menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Page {
    Profile,
    Repositories,
    Articles,
    About,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Profile, Page::Repositories, Page::Articles, Page::About];

    /// Link label shown in the menu.
    pub fn label(&self) -> &'static str {
        match self {
            Page::Profile => "Profile",
            Page::Repositories => "Repositories",
            Page::Articles => "Articles",
            Page::About => "About",
        }
    }

    /// Target file the link points at, relative to the site root.
    pub fn target(&self) -> &'static str {
        match self {
            Page::Profile => "index.html",
            Page::Repositories => "repositories.html",
            Page::Articles => "articles.html",
            Page::About => "about.html",
        }
    }
}

/// A single resolved link in the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub page: Page,
    pub href: String,
    pub active: bool,
}

/// A fully resolved navigation menu for one location.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavMenu {
    pub links: Vec<NavLink>,
}

impl NavMenu {
    /// Resolve the menu for `location`.
    ///
    /// `site_dir` is the name of the checkout directory that marks the site
    /// root when serving from a `file://` path.
    pub fn resolve(location: &Location, site_dir: &str) -> Self {
        let root = site_root(location, site_dir);
        let links = Page::ALL
            .iter()
            .map(|&page| NavLink {
                page,
                href: format!("{}{}", root, page.target()),
                active: is_active(location, page),
            })
            .collect();
        Self { links }
    }

    /// The page currently marked active, defaulting to Profile when no link
    /// matches.
    pub fn active_page(&self) -> Page {
        self.links
            .iter()
            .find(|l| l.active)
            .map(|l| l.page)
            .unwrap_or(Page::Profile)
    }
}

/// Compute the prefix under which the site's pages live.
///
/// Three cases, matching the deployments the site is served from:
/// - project page hosts (`*.github.io`): the first path segment is the
///   project name and stays part of the root;
/// - `file://`: the root is the path up to and including the checkout
///   directory named `site_dir`, or empty when it cannot be found;
/// - any other host: the site lives at `/`.
pub fn site_root(location: &Location, site_dir: &str) -> String {
    let mut segments = location.segments();
    // Drop the page file and an `articles/` directory from the end; what is
    // left is the directory hierarchy above the current page.
    if segments.last().is_some_and(|s| s.ends_with(".html")) {
        segments.pop();
    }
    if segments.last() == Some(&"articles") {
        segments.pop();
    }

    if location.protocol == Protocol::File {
        return match segments.iter().position(|&s| s == site_dir) {
            Some(idx) => format!("/{}/", segments[..=idx].join("/")),
            None => String::new(),
        };
    }
    if location.is_project_page() {
        return match segments.first() {
            Some(project) => format!("/{}/", project),
            None => "/".to_string(),
        };
    }
    "/".to_string()
}

/// Decide whether `page`'s link is the active one for `location`.
fn is_active(location: &Location, page: Page) -> bool {
    let mut segments = location.segments();
    // On project page hosts the leading segment is the project name, not a
    // page path.
    if location.is_project_page() && !segments.is_empty() {
        segments.remove(0);
    }

    if page == Page::Articles {
        return segments.contains(&"articles") || location.path.ends_with("articles.html");
    }

    let current = segments.last().copied().unwrap_or("");
    if current == page.target() {
        return true;
    }
    // An empty path (or a bare directory) means the index page.
    current.is_empty() && page == Page::Profile
}
