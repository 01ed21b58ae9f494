mod http_store;

pub use http_store::HttpNoteStore;

use async_trait::async_trait;

use crate::error::RequestError;
use crate::models::{NewNote, Note};

pub type RequestResult<T> = std::result::Result<T, RequestError>;

/// The remote source of truth for notes.
///
/// Implementations hold no note state of their own and never retry.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn list_active(&self) -> RequestResult<Vec<Note>>;

    async fn list_archived(&self) -> RequestResult<Vec<Note>>;

    async fn get(&self, id: &str) -> RequestResult<Note>;

    /// Create a note; the returned note carries the service-assigned id and
    /// creation time.
    async fn create(&self, note: &NewNote) -> RequestResult<Note>;

    async fn archive(&self, id: &str) -> RequestResult<()>;

    async fn unarchive(&self, id: &str) -> RequestResult<()>;

    async fn delete(&self, id: &str) -> RequestResult<()>;
}
