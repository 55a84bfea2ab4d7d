//! Keyboard handling.

use crate::actions::FormKind;
use crate::effects::Effects;
use crate::state::{AppState, Focus, ReplyForm, RepoListState};
use folio_nav::Page;
use folio_store::DocId;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_key(state: &mut AppState, key: KeyEvent, effects: &Effects) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.running = false;
        return;
    }
    match state.focus {
        Focus::Browse => handle_browse(state, key, effects),
        Focus::TopForm | Focus::ReplyForm => handle_form(state, key, effects),
    }
}

fn handle_browse(state: &mut AppState, key: KeyEvent, effects: &Effects) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => state.running = false,

        KeyCode::Tab => switch_page(state, effects, 1),
        KeyCode::BackTab => switch_page(state, effects, -1),
        KeyCode::Char('1') => goto_page(state, effects, Page::Profile),
        KeyCode::Char('2') => goto_page(state, effects, Page::Repositories),
        KeyCode::Char('3') => goto_page(state, effects, Page::Articles),
        KeyCode::Char('4') => goto_page(state, effects, Page::About),

        _ => match state.page {
            Page::Repositories => handle_repositories(state, key, effects),
            Page::Articles => handle_articles(state, key, effects),
            _ => {}
        },
    }
}

fn switch_page(state: &mut AppState, effects: &Effects, step: isize) {
    let pages = Page::ALL;
    let current = pages.iter().position(|&p| p == state.page).unwrap_or(0);
    let next = (current as isize + step).rem_euclid(pages.len() as isize) as usize;
    goto_page(state, effects, pages[next]);
}

fn goto_page(state: &mut AppState, effects: &Effects, page: Page) {
    state.switch_page(page);
    // First visit to the repositories page kicks off the one fetch.
    if page == Page::Repositories && state.repos.is_idle() {
        state.repos = RepoListState::Loading;
        effects.load_repositories(state.github_user.clone());
    }
}

fn handle_repositories(state: &mut AppState, key: KeyEvent, effects: &Effects) {
    let count = state.repos.cards().len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if state.repo_scroll + 1 < count {
                state.repo_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.repo_scroll = state.repo_scroll.saturating_sub(1);
        }
        KeyCode::Char('r') => {
            state.repos = RepoListState::Loading;
            state.repo_scroll = 0;
            effects.load_repositories(state.github_user.clone());
        }
        _ => {}
    }
}

fn handle_articles(state: &mut AppState, key: KeyEvent, effects: &Effects) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.selection += 1;
            state.clamp_selection();
            prime_answer_gate(state, effects);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.selection = state.selection.saturating_sub(1);
            prime_answer_gate(state, effects);
        }
        KeyCode::Char('u') => {
            if let Some(id) = state.selected_comment() {
                effects.upvote(id);
            }
        }
        KeyCode::Char('a') => {
            let Some((parent, target)) = selected_reply(state) else {
                return;
            };
            if !answer_gate(state, &parent) {
                effects.promote(parent, target);
            }
        }
        KeyCode::Char('n') => {
            state.focus = Focus::TopForm;
        }
        KeyCode::Char('r') => {
            if let Some(parent) = thread_of_selection(state) {
                effects.check_answer(parent.clone());
                state.reply_form = Some(ReplyForm::new(parent));
                state.focus = Focus::ReplyForm;
            }
        }
        _ => {}
    }
}

fn handle_form(state: &mut AppState, key: KeyEvent, effects: &Effects) {
    match key.code {
        KeyCode::Esc => {
            if state.focus == Focus::ReplyForm {
                state.reply_form = None;
            }
            state.focus = Focus::Browse;
        }
        KeyCode::Tab => active_form(state).focus_next(),
        KeyCode::Enter => submit_form(state, effects),
        KeyCode::Backspace => active_form(state).focused_mut().delete_char_before(),
        KeyCode::Left => active_form(state).focused_mut().move_left(),
        KeyCode::Right => active_form(state).focused_mut().move_right(),
        KeyCode::Char(c) => active_form(state).focused_mut().insert_char(c),
        _ => {}
    }
}

fn active_form(state: &mut AppState) -> &mut crate::state::CommentForm {
    match state.focus {
        Focus::ReplyForm => {
            if let Some(reply) = state.reply_form.as_mut() {
                return &mut reply.form;
            }
            &mut state.comment_form
        }
        _ => &mut state.comment_form,
    }
}

fn submit_form(state: &mut AppState, effects: &Effects) {
    match state.focus {
        Focus::TopForm => {
            if let Some(record) = state.comment_form.to_record(None) {
                effects.submit(record, FormKind::TopLevel);
            }
        }
        Focus::ReplyForm => {
            let Some(reply) = state.reply_form.as_ref() else {
                return;
            };
            if let Some(record) = reply.form.to_record(Some(reply.parent.clone())) {
                effects.submit(record, FormKind::Reply);
            }
        }
        Focus::Browse => {}
    }
}

/// The top-level comment the selected row belongs to.
fn thread_of_selection(state: &AppState) -> Option<DocId> {
    let rows = state.threads.rows();
    let row = rows.get(state.selection)?;
    Some(match &row.node.record.parent {
        Some(parent) => parent.clone(),
        None => row.node.id.clone(),
    })
}

/// Selected row as `(parent, reply)` when it is a reply.
fn selected_reply(state: &AppState) -> Option<(DocId, DocId)> {
    let rows = state.threads.rows();
    let row = rows.get(state.selection)?;
    let parent = row.node.record.parent.clone()?;
    Some((parent, row.node.id.clone()))
}

/// Whether the selected thread already has an answer, per the cached
/// point-in-time query (falling back to the view-state when the query has
/// not come back yet).
fn answer_gate(state: &AppState, parent: &DocId) -> bool {
    state
        .answered
        .get(parent)
        .copied()
        .unwrap_or_else(|| state.threads.has_answer(parent))
}

/// Fire the one-time answer query the first time a thread is selected.
fn prime_answer_gate(state: &AppState, effects: &Effects) {
    if let Some(parent) = thread_of_selection(state) {
        if !state.answered.contains_key(&parent) {
            effects.check_answer(parent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use async_trait::async_trait;
    use folio_github::{RepoCard, RepoSource};
    use folio_store::MemoryStore;
    use std::sync::mpsc;
    use std::sync::Arc;

    struct NoRepos;

    #[async_trait]
    impl RepoSource for NoRepos {
        async fn fetch_repositories(&self, _user: &str) -> anyhow::Result<Vec<RepoCard>> {
            Ok(Vec::new())
        }
    }

    fn effects() -> Effects {
        let (tx, _rx) = mpsc::channel();
        Effects::new(
            Arc::new(MemoryStore::new()),
            Arc::new(NoRepos),
            tokio::runtime::Handle::current(),
            tx,
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_tab_cycles_pages() {
        let effects = effects();
        let mut state = AppState::new(&AppConfig::default());
        assert_eq!(state.page, Page::Profile);
        handle_key(&mut state, key(KeyCode::Tab), &effects);
        assert_eq!(state.page, Page::Repositories);
        handle_key(&mut state, key(KeyCode::BackTab), &effects);
        assert_eq!(state.page, Page::Profile);
    }

    #[tokio::test]
    async fn test_first_repositories_visit_starts_loading() {
        let effects = effects();
        let mut state = AppState::new(&AppConfig::default());
        handle_key(&mut state, key(KeyCode::Char('2')), &effects);
        assert_eq!(state.repos, RepoListState::Loading);
    }

    #[tokio::test]
    async fn test_form_typing_and_cancel() {
        let effects = effects();
        let mut state = AppState::new(&AppConfig::default());
        state.switch_page(Page::Articles);
        handle_key(&mut state, key(KeyCode::Char('n')), &effects);
        assert_eq!(state.focus, Focus::TopForm);
        for c in "ada".chars() {
            handle_key(&mut state, key(KeyCode::Char(c)), &effects);
        }
        assert_eq!(state.comment_form.name.value, "ada");
        handle_key(&mut state, key(KeyCode::Tab), &effects);
        handle_key(&mut state, key(KeyCode::Char('x')), &effects);
        assert_eq!(state.comment_form.email.value, "x");
        // Esc cancels without clearing what was typed.
        handle_key(&mut state, key(KeyCode::Esc), &effects);
        assert_eq!(state.focus, Focus::Browse);
        assert_eq!(state.comment_form.name.value, "ada");
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_everywhere() {
        let effects = effects();
        let mut state = AppState::new(&AppConfig::default());
        state.focus = Focus::TopForm;
        handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &effects,
        );
        assert!(!state.running);
    }
}
