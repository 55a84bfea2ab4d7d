//! Application theme - centralized color and style management.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub status_error: Color,
    pub answer: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub nav_active: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,
            accent: Color::Cyan,
            status_error: Color::Red,
            answer: Color::Green,
            selected_bg: Color::Blue,
            selected_fg: Color::White,
            nav_active: Color::Cyan,
        }
    }
}

impl Theme {
    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.status_error)
    }

    pub fn answer_badge(&self) -> Style {
        Style::default()
            .fg(self.answer)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default().bg(self.selected_bg).fg(self.selected_fg)
    }

    pub fn nav_link(&self, active: bool) -> Style {
        if active {
            Style::default()
                .fg(self.nav_active)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(self.text_primary)
        }
    }
}
