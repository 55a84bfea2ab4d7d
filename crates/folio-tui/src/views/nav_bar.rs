//! Navigation bar, resolved fresh from the current location.

use crate::state::AppState;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    let theme = &state.theme;
    let mut spans = vec![Span::styled(" CR ", theme.accent()), Span::raw("  ")];
    for link in &state.nav.links {
        spans.push(Span::styled(
            link.page.label(),
            theme.nav_link(link.active),
        ));
        spans.push(Span::raw("   "));
    }

    let block = Block::default().borders(Borders::BOTTOM);
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
