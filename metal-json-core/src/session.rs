//! Session context: the state an interactive front end keeps between actions.
//!
//! Holds the last entered repository, path and token, and the most recent
//! conversion with its JSON string. Each conversion replaces the previous one.
//! A failed upload leaves everything in place so it can be retried.

use tracing::{info, warn};

use crate::contract::{ContentStore, Document, Mode, SecretToken};
use crate::convert::{convert, Conversion, ConvertError};
use crate::publish::{publish, Prerequisite, PublishError, PublishReceipt, UploadRequest};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct Session {
    pub repo: String,
    pub path: String,
    pub token: SecretToken,
    pub commit_message: Option<String>,
    conversion: Option<Conversion>,
    json: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert `text` and hold the result as the session's document.
    ///
    /// Empty input leaves the previously held document untouched.
    pub fn convert(&mut self, text: &str, mode: Mode) -> Result<&Conversion, SessionError> {
        let conversion = convert(text, mode)?;
        let json = conversion.document.to_json()?;
        info!(%mode, bytes = json.len(), "Session document replaced");
        self.json = Some(json);
        Ok(self.conversion.insert(conversion))
    }

    pub fn document(&self) -> Option<&Document> {
        self.conversion.as_ref().map(|c| &c.document)
    }

    /// Canonical JSON of the held document.
    pub fn json(&self) -> Option<&str> {
        self.json.as_deref()
    }

    /// Remember the non-empty details and upload the held document.
    pub async fn publish<S>(
        &mut self,
        store: &S,
        repo: &str,
        path: &str,
        token: &SecretToken,
    ) -> Result<PublishReceipt, PublishError>
    where
        S: ContentStore + ?Sized,
    {
        if !repo.trim().is_empty() {
            self.repo = repo.trim().to_string();
        }
        if !path.trim().is_empty() {
            self.path = path.trim().to_string();
        }
        if !token.is_empty() {
            self.token = token.clone();
        }

        let Some(json) = self.json.as_deref() else {
            warn!("Upload requested before any conversion");
            return Err(PublishError::MissingPrerequisites(vec![Prerequisite::Document]));
        };

        let mut request = UploadRequest::new(&self.repo, &self.path, self.token.clone(), json);
        if let Some(message) = &self.commit_message {
            request = request.with_message(message);
        }
        publish(store, &request).await
    }
}
