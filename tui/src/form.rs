use noteboard_core::models::NewNote;
use noteboard_core::validation::{check_field, validate_note, Field, FieldError};
use noteboard_core::ValidationError;

/// How close a field is to its length limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterLevel {
    Normal,
    Warning,
    Error,
}

/// The add-note form: two inputs with live validation and counters.
#[derive(Debug, Clone)]
pub struct NoteForm {
    pub title: String,
    pub body: String,
    pub focus: Field,
    title_error: Option<FieldError>,
    body_error: Option<FieldError>,
}

impl Default for NoteForm {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteForm {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            focus: Field::Title,
            title_error: None,
            body_error: None,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Body => &self.body,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Body => &mut self.body,
        }
    }

    pub fn error(&self, field: Field) -> Option<&FieldError> {
        match field {
            Field::Title => self.title_error.as_ref(),
            Field::Body => self.body_error.as_ref(),
        }
    }

    fn set_error(&mut self, field: Field, error: Option<FieldError>) {
        match field {
            Field::Title => self.title_error = error,
            Field::Body => self.body_error = error,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Field::Title => Field::Body,
            Field::Body => Field::Title,
        };
    }

    /// Type a character into the focused field. Input stops at the field's
    /// maximum length.
    pub fn input(&mut self, c: char) {
        let field = self.focus;
        let (_, max) = field.limits();
        if field == Field::Title && c == '\n' {
            return;
        }
        let value = self.value_mut(field);
        if value.chars().count() >= max {
            return;
        }
        value.push(c);
        self.revalidate(field);
    }

    pub fn backspace(&mut self) {
        let field = self.focus;
        self.value_mut(field).pop();
        self.revalidate(field);
    }

    fn revalidate(&mut self, field: Field) {
        let error = check_field(field, self.value(field));
        self.set_error(field, error);
    }

    /// Trimmed length, limit and level for the counter under a field
    pub fn counter(&self, field: Field) -> (usize, usize, CounterLevel) {
        let len = self.value(field).trim().chars().count();
        let (_, max) = field.limits();
        let (warn_above, error_above) = match field {
            Field::Title => (80, 95),
            Field::Body => (800, 950),
        };
        let level = if len > error_above {
            CounterLevel::Error
        } else if len > warn_above {
            CounterLevel::Warning
        } else {
            CounterLevel::Normal
        };
        (len, max, level)
    }

    /// Validate both fields, keeping the messages for display
    pub fn submit(&mut self) -> Option<NewNote> {
        match validate_note(&self.title, &self.body) {
            Ok(new_note) => {
                self.title_error = None;
                self.body_error = None;
                Some(new_note)
            }
            Err(err) => {
                self.show_errors(&err);
                None
            }
        }
    }

    pub fn show_errors(&mut self, error: &ValidationError) {
        self.title_error = error.for_field(Field::Title).copied();
        self.body_error = error.for_field(Field::Body).copied();
        if let Some(first) = error.errors.first() {
            self.focus = first.field;
        }
    }
}
