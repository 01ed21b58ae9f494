use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{NoteStore, RequestResult};
use crate::error::{Error, RequestError, Result};
use crate::models::{Envelope, NewNote, Note};

/// [`NoteStore`] backed by the notes REST service.
#[derive(Debug, Clone)]
pub struct HttpNoteStore {
    base_url: Url,
    client: Client,
}

impl HttpNoteStore {
    pub const DEFAULT_BASE_URL: &'static str = "https://notes-api.dicoding.dev/v2";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let raw = base_url.into();
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "base url must be an http:// or https:// url, got '{}'",
                    raw
                ))
            })?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base url plus `segments`, each percent-encoded as a single path segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // http(s) urls always have a path to extend
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&NewNote>,
    ) -> RequestResult<Envelope<T>> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let result = Self::execute(request).await;
        if let Err(err) = &result {
            tracing::warn!("{} {} failed: {}", method, url, err);
        }
        result
    }

    async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> RequestResult<Envelope<T>> {
        let response = request.send().await?;
        let code = response.status();
        let body = response.bytes().await?;

        // Decode loosely first so error bodies keep their message even when
        // `data` has an unexpected shape.
        let raw = match serde_json::from_slice::<Envelope<Value>>(&body).ok() {
            Some(raw) if code.is_success() && raw.is_success() => raw,
            Some(raw) => {
                let message = raw.message.unwrap_or_else(|| http_error_message(code));
                return Err(RequestError::new(Some(code.as_u16()), message));
            }
            None if code.is_success() => {
                return Err(RequestError::new(
                    Some(code.as_u16()),
                    "response is not a notes service envelope",
                ));
            }
            None => return Err(RequestError::new(Some(code.as_u16()), http_error_message(code))),
        };

        let data = raw
            .data
            .map(serde_json::from_value::<T>)
            .transpose()
            .map_err(|e| {
                RequestError::new(Some(code.as_u16()), format!("unexpected response data: {}", e))
            })?;

        Ok(Envelope {
            status: raw.status,
            data,
            message: raw.message,
        })
    }

    async fn list(&self, segments: &[&str]) -> RequestResult<Vec<Note>> {
        let envelope = self
            .call::<Vec<Note>>(Method::GET, self.endpoint(segments), None)
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn command(&self, method: Method, segments: &[&str]) -> RequestResult<()> {
        let envelope = self
            .call::<Value>(method, self.endpoint(segments), None)
            .await?;
        if let Some(message) = envelope.message {
            tracing::debug!("{}: {}", segments.join("/"), message);
        }
        Ok(())
    }
}

fn http_error_message(code: StatusCode) -> String {
    format!("HTTP error! status: {}", code.as_u16())
}

#[async_trait]
impl NoteStore for HttpNoteStore {
    async fn list_active(&self) -> RequestResult<Vec<Note>> {
        self.list(&["notes"]).await
    }

    async fn list_archived(&self) -> RequestResult<Vec<Note>> {
        self.list(&["notes", "archived"]).await
    }

    async fn get(&self, id: &str) -> RequestResult<Note> {
        let envelope = self
            .call::<Note>(Method::GET, self.endpoint(&["notes", id]), None)
            .await?;
        envelope
            .data
            .ok_or_else(|| RequestError::new(None, format!("response carried no note for {}", id)))
    }

    async fn create(&self, note: &NewNote) -> RequestResult<Note> {
        let envelope = self
            .call::<Note>(Method::POST, self.endpoint(&["notes"]), Some(note))
            .await?;
        envelope
            .data
            .ok_or_else(|| RequestError::new(None, "response carried no created note"))
    }

    async fn archive(&self, id: &str) -> RequestResult<()> {
        self.command(Method::POST, &["notes", id, "archive"]).await
    }

    async fn unarchive(&self, id: &str) -> RequestResult<()> {
        self.command(Method::POST, &["notes", id, "unarchive"]).await
    }

    async fn delete(&self, id: &str) -> RequestResult<()> {
        self.command(Method::DELETE, &["notes", id]).await
    }
}
