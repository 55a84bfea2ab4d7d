//! Articles page: the article stub plus the threaded comment section.

use crate::state::{AppState, CommentForm, CommentNode, Focus, FormField};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    let form_height = match state.focus {
        Focus::Browse => 0,
        _ => 5,
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(form_height)])
        .split(area);

    render_comments(state, chunks[0], f);
    match state.focus {
        Focus::TopForm => render_form(state, &state.comment_form, "New comment", chunks[1], f),
        Focus::ReplyForm => {
            if let Some(reply) = &state.reply_form {
                render_form(state, &reply.form, "Reply", chunks[1], f);
            }
        }
        Focus::Browse => {}
    }
}

fn render_comments(state: &AppState, area: Rect, f: &mut Frame) {
    let theme = &state.theme;
    let block = Block::default().title(" Comments ").borders(Borders::ALL);

    let rows = state.threads.rows();
    let mut lines = vec![
        Line::from(Span::styled(
            "Notes from the terminal - comments below.",
            theme.secondary(),
        )),
        Line::from(""),
    ];
    if rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "No comments yet. Be the first to comment! [n]",
            theme.muted(),
        )));
    }
    for (idx, row) in rows.iter().enumerate() {
        let record = &row.node.record;
        let selected = idx == state.selection;
        let indent = if row.is_reply { "    " } else { "" };
        let base = if selected { theme.selected() } else { theme.text() };

        let mut header = vec![
            Span::styled(format!("{}{}", indent, record.author), base),
            Span::raw("  "),
        ];
        if let Some(created) = record.created_at {
            header.push(Span::styled(
                created.format("%Y-%m-%d").to_string(),
                theme.muted(),
            ));
            header.push(Span::raw("  "));
        }
        header.push(Span::styled(format!("▲ {}", record.upvotes), theme.accent()));
        if record.is_answer {
            header.push(Span::raw("  "));
            header.push(Span::styled("✔ answer", theme.answer_badge()));
        }
        lines.push(Line::from(header));
        lines.push(Line::from(Span::styled(
            format!("{}{}", indent, record.message),
            theme.secondary(),
        )));

        if selected {
            lines.push(Line::from(Span::styled(
                hint_for(state, row.is_reply, row.node),
                theme.muted(),
            )));
        }
        lines.push(Line::from(""));
    }

    let scroll = (state.selection.saturating_mul(4)).saturating_sub(area.height as usize / 2);
    f.render_widget(
        Paragraph::new(lines).block(block).scroll((scroll as u16, 0)),
        area,
    );
}

/// Key hints for the selected row. The promote affordance only shows while
/// the thread has no known answer.
fn hint_for(state: &AppState, is_reply: bool, node: &CommentNode) -> String {
    let mut hints = vec!["[u] upvote", "[r] reply", "[n] new comment"];
    if is_reply {
        let promotable = node
            .record
            .parent
            .as_ref()
            .map(|parent| {
                !state
                    .answered
                    .get(parent)
                    .copied()
                    .unwrap_or_else(|| state.threads.has_answer(parent))
            })
            .unwrap_or(false);
        if promotable {
            hints.push("[a] mark as answer");
        }
    }
    format!("  {}", hints.join("  "))
}

fn render_form(state: &AppState, form: &CommentForm, title: &str, area: Rect, f: &mut Frame) {
    let theme = &state.theme;
    let block = Block::default()
        .title(format!(" {} (Tab: next field, Enter: submit, Esc: cancel) ", title))
        .borders(Borders::ALL);

    let field_line = |field: FormField, value: &str| {
        let style = if form.focus == field {
            theme.accent()
        } else {
            theme.secondary()
        };
        Line::from(vec![
            Span::styled(format!("{:>8}: ", field.label()), style),
            Span::styled(value.to_string(), theme.text()),
        ])
    };

    let lines = vec![
        field_line(FormField::Name, &form.name.value),
        field_line(FormField::Email, &form.email.value),
        field_line(FormField::Message, &form.message.value),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}
