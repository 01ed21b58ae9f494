use std::fmt;

use crate::error::ValidationError;
use crate::models::NewNote;

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 100;
pub const BODY_MIN: usize = 10;
pub const BODY_MAX: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Body,
}

impl Field {
    pub fn limits(self) -> (usize, usize) {
        match self {
            Field::Title => (TITLE_MIN, TITLE_MAX),
            Field::Body => (BODY_MIN, BODY_MAX),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Title => write!(f, "title"),
            Field::Body => write!(f, "body"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    Empty,
    TooShort { min: usize },
    TooLong { max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub problem: Problem,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.field {
            Field::Title => "Title",
            Field::Body => "Body",
        };
        match self.problem {
            Problem::Empty => write!(f, "{name} must not be empty"),
            Problem::TooShort { min } => write!(f, "{name} must be at least {min} characters"),
            Problem::TooLong { max } => write!(f, "{name} must be at most {max} characters"),
        }
    }
}

/// Check a single field. Length is counted in characters after trimming.
pub fn check_field(field: Field, value: &str) -> Option<FieldError> {
    let (min, max) = field.limits();
    let len = value.trim().chars().count();
    let problem = if len == 0 {
        Problem::Empty
    } else if len < min {
        Problem::TooShort { min }
    } else if len > max {
        Problem::TooLong { max }
    } else {
        return None;
    };
    Some(FieldError { field, problem })
}

/// Validate both fields of a new note, returning the trimmed payload.
pub fn validate_note(title: &str, body: &str) -> Result<NewNote, ValidationError> {
    let errors: Vec<FieldError> = [
        check_field(Field::Title, title),
        check_field(Field::Body, body),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !errors.is_empty() {
        return Err(ValidationError { errors });
    }

    Ok(NewNote {
        title: title.trim().to_string(),
        body: body.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_note_is_trimmed() {
        let note = validate_note("  My Title ", "\tA sufficiently long body text\n").unwrap();
        assert_eq!(note.title, "My Title");
        assert_eq!(note.body, "A sufficiently long body text");
    }

    #[test]
    fn test_short_title_only() {
        let err = validate_note("ab", "short body").unwrap_err();
        assert_eq!(
            err.errors,
            vec![FieldError { field: Field::Title, problem: Problem::TooShort { min: 3 } }]
        );
    }

    #[test]
    fn test_short_body_only() {
        let err = validate_note("Valid Title", "123456789").unwrap_err();
        assert_eq!(
            err.errors,
            vec![FieldError { field: Field::Body, problem: Problem::TooShort { min: 10 } }]
        );
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let err = validate_note("   ", "          ").unwrap_err();
        assert_eq!(err.errors.len(), 2);
        assert!(err.errors.iter().all(|e| e.problem == Problem::Empty));
    }

    #[test]
    fn test_boundaries() {
        assert!(check_field(Field::Title, "abc").is_none());
        assert!(check_field(Field::Title, &"x".repeat(100)).is_none());
        assert_eq!(
            check_field(Field::Title, &"x".repeat(101)).map(|e| e.problem),
            Some(Problem::TooLong { max: 100 })
        );
        assert!(check_field(Field::Body, "0123456789").is_none());
        assert!(check_field(Field::Body, &"y".repeat(1000)).is_none());
        assert_eq!(
            check_field(Field::Body, &"y".repeat(1001)).map(|e| e.problem),
            Some(Problem::TooLong { max: 1000 })
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // three characters, nine bytes
        assert!(check_field(Field::Title, "日本語").is_none());
    }

    #[test]
    fn test_field_error_message() {
        let err = FieldError { field: Field::Title, problem: Problem::TooShort { min: 3 } };
        assert_eq!(err.to_string(), "Title must be at least 3 characters");
    }
}
