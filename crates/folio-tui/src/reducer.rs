//! Reduce actions from asynchronous work into application state.

use crate::actions::{Action, FormKind};
use crate::state::{AppState, Focus, RepoListState, FETCH_ERROR_PLACEHOLDER};
use folio_store::comment::{FIELD_IS_ANSWER, FIELD_PARENT};
use folio_store::{ChangeKind, DocId};

pub fn reduce(state: &mut AppState, action: Action) {
    match action {
        Action::Store(change) => {
            state.threads.apply(&change);
            // A promotion landing from elsewhere arrives as a flagged
            // change; refresh the affordance cache so the thread stops
            // offering "mark as answer".
            if change.kind != ChangeKind::Removed
                && change.doc.get(FIELD_IS_ANSWER).and_then(|v| v.as_bool()) == Some(true)
            {
                if let Some(parent) = change.doc.get(FIELD_PARENT).and_then(|v| v.as_str()) {
                    state.answered.insert(DocId::from(parent), true);
                }
            }
            state.clamp_selection();
        }

        Action::ReposLoaded(cards) => {
            log::info!("Loaded {} repositories", cards.len());
            state.repos = RepoListState::Loaded(cards);
            state.repo_scroll = 0;
        }

        Action::ReposFailed => {
            // One static placeholder replaces the whole container.
            state.repos = RepoListState::Error(FETCH_ERROR_PLACEHOLDER.to_string());
            state.repo_scroll = 0;
        }

        Action::CommentAdded(kind) => match kind {
            FormKind::TopLevel => {
                state.comment_form.reset();
                state.focus = Focus::Browse;
            }
            FormKind::Reply => {
                state.reply_form = None;
                state.focus = Focus::Browse;
            }
        },

        Action::PromotionCommitted { parent, target } => {
            state.threads.apply_promotion(&parent, &target);
            // The affordance gate flips eagerly too.
            state.answered.insert(parent, true);
            state.clamp_selection();
        }

        Action::AnswerStateLoaded { parent, has_answer } => {
            state.answered.insert(parent, has_answer);
        }
    }
}
