use thiserror::Error;

use crate::validation::FieldError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A failed call against the remote notes service.
///
/// `status` is the HTTP status when the service answered at all; network
/// failures and timeouts carry `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Request error{}: {message}", status_suffix(.status))]
pub struct RequestError {
    pub status: Option<u16>,
    pub message: String,
}

impl RequestError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        Self::new(err.status().map(|s| s.as_u16()), message)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Request(err.into())
    }
}

/// Field-level rejection of a new note. Never reaches the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid note: {}", describe(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn for_field(&self, field: crate::validation::Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
