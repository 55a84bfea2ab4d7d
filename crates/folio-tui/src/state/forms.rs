//! Comment form state: the top-level form and the per-thread reply form.

use folio_store::{CommentRecord, DocId};

/// A single-line text input with cursor editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub value: String,
    pub cursor: usize,
}

impl TextField {
    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_char_before(&mut self) {
        if self.cursor > 0 {
            let prev_char_start = self.value[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.value.remove(prev_char_start);
            self.cursor = prev_char_start;
        }
    }

    /// Move cursor left by one character.
    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.value[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    /// Move cursor right by one character.
    pub fn move_right(&mut self) {
        if let Some(c) = self.value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Which field of a form has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Email,
    Message,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Email,
            FormField::Email => FormField::Message,
            FormField::Message => FormField::Name,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Message => "Message",
        }
    }
}

/// Name/email/message form, used both for top-level comments and replies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentForm {
    pub name: TextField,
    pub email: TextField,
    pub message: TextField,
    pub focus: FormField,
}

impl CommentForm {
    pub fn field_mut(&mut self, field: FormField) -> &mut TextField {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Message => &mut self.message,
        }
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        self.field_mut(self.focus)
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    /// Reset every field; done only after a successful submission.
    pub fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
        self.focus = FormField::default();
    }

    /// Build the record to submit, or `None` while name or message are
    /// still empty.
    pub fn to_record(&self, parent: Option<DocId>) -> Option<CommentRecord> {
        if self.name.is_empty() || self.message.is_empty() {
            return None;
        }
        let record = match parent {
            Some(parent) => CommentRecord::reply(
                parent,
                self.name.value.trim(),
                self.email.value.trim(),
                self.message.value.trim(),
            ),
            None => CommentRecord::top_level(
                self.name.value.trim(),
                self.email.value.trim(),
                self.message.value.trim(),
            ),
        };
        Some(record)
    }
}

/// The reply form open under one thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyForm {
    /// The top-level comment being replied to.
    pub parent: DocId,
    pub form: CommentForm,
}

impl ReplyForm {
    pub fn new(parent: DocId) -> Self {
        Self {
            parent,
            form: CommentForm::default(),
        }
    }
}
