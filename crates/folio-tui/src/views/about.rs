//! About page.

use crate::state::AppState;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    let theme = &state.theme;
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("About this site", theme.accent())),
        Line::from(""),
        Line::from(Span::styled(
            "A personal portfolio: profile, public repositories and a few",
            theme.secondary(),
        )),
        Line::from(Span::styled(
            "articles with a small comment section.",
            theme.secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Repositories are fetched for github.com/{}.", state.github_user),
            theme.muted(),
        )),
    ];

    let block = Block::default().title(" About ").borders(Borders::ALL);
    f.render_widget(Paragraph::new(text).block(block), area);
}
