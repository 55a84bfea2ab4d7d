//! Repositories page: one card per public repository.

use crate::state::{AppState, RepoListState};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    let theme = &state.theme;
    let block = Block::default()
        .title(format!(" Repositories ({}) ", state.github_user))
        .borders(Borders::ALL);

    let lines = match &state.repos {
        RepoListState::Idle | RepoListState::Loading => {
            vec![Line::from(Span::styled("Loading…", theme.muted()))]
        }
        RepoListState::Error(message) => {
            // The placeholder is the page; no partial cards around it.
            vec![Line::from(Span::styled(message.clone(), theme.error()))]
        }
        RepoListState::Loaded(cards) if cards.is_empty() => {
            vec![Line::from(Span::styled("No public repositories.", theme.muted()))]
        }
        RepoListState::Loaded(cards) => {
            let mut lines = Vec::new();
            for (idx, card) in cards.iter().enumerate() {
                let marker = if idx == state.repo_scroll { "> " } else { "  " };
                lines.push(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(card.name.clone(), theme.accent()),
                    Span::raw("  "),
                    Span::styled(format!("★ {}", card.stars), theme.secondary()),
                    Span::raw("  "),
                    Span::styled(format!("⑂ {}", card.forks), theme.secondary()),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("    {}", card.description_or_fallback()),
                    theme.text(),
                )));
                lines.push(Line::from(Span::styled(
                    format!("    {}", card.html_url),
                    theme.muted(),
                )));
                lines.push(Line::from(""));
            }
            lines
        }
    };

    let scroll = lines.len().saturating_sub(area.height as usize);
    let scroll = scroll.min(state.repo_scroll * 4) as u16;
    f.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}
