//! Top-level application state.

use crate::config::AppConfig;
use crate::state::forms::{CommentForm, ReplyForm};
use crate::state::repos::RepoListState;
use crate::state::threads::ThreadSet;
use crate::theme::Theme;
use folio_nav::{Location, NavMenu, Page, Protocol};
use folio_store::DocId;
use std::collections::HashMap;

/// What keyboard input currently drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Moving through pages and comment rows.
    #[default]
    Browse,
    /// Typing into the top-level comment form.
    TopForm,
    /// Typing into the reply form of one thread.
    ReplyForm,
}

/// All state the UI renders from.
pub struct AppState {
    pub running: bool,
    pub page: Page,
    /// The location the site is "served" from; the navigation menu is
    /// re-resolved from it on every page switch.
    pub location: Location,
    pub site_dir: String,
    pub nav: NavMenu,
    pub github_user: String,

    pub repos: RepoListState,
    pub repo_scroll: usize,

    pub threads: ThreadSet,
    /// Selected row index on the articles page.
    pub selection: usize,
    pub focus: Focus,
    pub comment_form: CommentForm,
    pub reply_form: Option<ReplyForm>,
    /// Point-in-time "does this thread already have an answer" results,
    /// fetched once per thread when it is first selected. Can go stale by
    /// design; the promote affordance is only a hint.
    pub answered: HashMap<DocId, bool>,

    pub theme: Theme,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let location = config
            .site_url
            .as_deref()
            .and_then(Location::parse)
            .unwrap_or_else(|| Location::new(Protocol::Https, "localhost", "/index.html"));
        let nav = NavMenu::resolve(&location, &config.site_dir);
        let page = nav.active_page();
        Self {
            running: true,
            page,
            location,
            site_dir: config.site_dir.clone(),
            nav,
            github_user: config.github_user.clone(),
            repos: RepoListState::default(),
            repo_scroll: 0,
            threads: ThreadSet::new(),
            selection: 0,
            focus: Focus::default(),
            comment_form: CommentForm::default(),
            reply_form: None,
            answered: HashMap::new(),
            theme: Theme::default(),
        }
    }

    /// Switch pages the way following a nav link would: update the
    /// location to the link target and re-resolve the menu from it.
    pub fn switch_page(&mut self, page: Page) {
        let root = folio_nav::menu::site_root(&self.location, &self.site_dir);
        self.location.path = format!("{}{}", root, page.target());
        self.nav = NavMenu::resolve(&self.location, &self.site_dir);
        self.page = page;
        self.focus = Focus::Browse;
    }

    /// Clamp the comment selection to the current row count.
    pub fn clamp_selection(&mut self) {
        let rows = self.threads.rows().len();
        if rows == 0 {
            self.selection = 0;
        } else if self.selection >= rows {
            self.selection = rows - 1;
        }
    }

    /// The id of the currently selected comment row, if any.
    pub fn selected_comment(&self) -> Option<DocId> {
        self.threads
            .rows()
            .get(self.selection)
            .map(|row| row.node.id.clone())
    }
}
