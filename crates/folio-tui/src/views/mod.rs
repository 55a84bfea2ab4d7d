//! Rendering. Each page renders from [`AppState`] only; nothing here
//! mutates state or talks to the store.

use crate::state::AppState;
use folio_nav::Page;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

pub mod about;
pub mod articles;
pub mod nav_bar;
pub mod profile;
pub mod repositories;

/// Render the entire application UI.
pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    nav_bar::render(state, chunks[0], f);
    match state.page {
        Page::Profile => profile::render(state, chunks[1], f),
        Page::Repositories => repositories::render(state, chunks[1], f),
        Page::Articles => articles::render(state, chunks[1], f),
        Page::About => about::render(state, chunks[1], f),
    }
}
