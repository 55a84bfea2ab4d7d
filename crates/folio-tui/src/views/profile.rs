//! Profile page.

use crate::state::AppState;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    let theme = &state.theme;
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Christian Riedel", theme.accent())),
        Line::from(""),
        Line::from(Span::styled(
            "Software developer. This is the terminal rendition of my site.",
            theme.secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled("Controls:", theme.text())),
        Line::from(vec![
            Span::styled("  Tab / 1-4  ", theme.accent()),
            Span::styled("- Switch pages", theme.secondary()),
        ]),
        Line::from(vec![
            Span::styled("  j/k        ", theme.accent()),
            Span::styled("- Move around a page", theme.secondary()),
        ]),
        Line::from(vec![
            Span::styled("  q          ", theme.accent()),
            Span::styled("- Quit", theme.secondary()),
        ]),
    ];

    let block = Block::default().title(" Profile ").borders(Borders::ALL);
    f.render_widget(
        Paragraph::new(text).block(block).alignment(Alignment::Left),
        area,
    );
}
