use async_trait::async_trait;

use crate::error::ValidationError;
use crate::models::{Note, View};

/// What the note list area should show.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Notes sorted newest first
    Notes(Vec<Note>),
    Empty { heading: String, description: String },
}

/// A complete render request: the view and what to put in it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub view: View,
    pub content: Content,
}

impl RenderFrame {
    pub fn notes(&self) -> &[Note] {
        match &self.content {
            Content::Notes(notes) => notes,
            Content::Empty { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loading {
    Hidden,
    /// Replaces the note list while a full load is running
    Page { message: String },
    /// Overlay shown while a single action is in flight
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, "Success!", message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, "Information", message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, "Warning!", message)
    }

    pub fn error(message: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title, message)
    }

    fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Everything the controller needs from the presentation layer.
///
/// Implementations only display what they are given; they never touch the
/// note collections.
#[async_trait]
pub trait Presenter: Send + Sync {
    fn render(&self, frame: RenderFrame);

    fn loading(&self, loading: Loading);

    fn notify(&self, notification: Notification);

    fn report_invalid(&self, error: &ValidationError);

    /// Ask the user to confirm a destructive action
    async fn confirm(&self, message: &str, title: &str) -> bool;

    /// Called once for every intent after it has been fully handled,
    /// whatever its outcome.
    fn settled(&self) {}
}
