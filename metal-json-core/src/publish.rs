//! # publish: upsert a document into a remote content store
//!
//! Two sequential calls against a [`ContentStore`]:
//!   1. look up the file to learn its current revision marker (`sha`), if any
//!   2. create-or-replace it with base64 content, attaching the marker when found
//!
//! The read-then-write is not atomic. If another writer lands in between, the
//! remote rejects the stale marker and [`PublishError::is_conflict`] is true.
//! Nothing here retries; whether to try again is up to the caller.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::contract::{ContentStore, ContentTarget, PutContentBody, SecretToken};

pub const DEFAULT_COMMIT_MESSAGE: &str = "Upload JSON file";

/// Everything needed for one upsert.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// `owner/name`
    pub repo: String,
    pub path: String,
    pub token: SecretToken,
    pub content: String,
    pub commit_message: String,
}

impl UploadRequest {
    pub fn new(
        repo: impl Into<String>,
        path: impl Into<String>,
        token: SecretToken,
        content: impl Into<String>,
    ) -> Self {
        UploadRequest {
            repo: repo.into(),
            path: path.into(),
            token,
            content: content.into(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    /// Prerequisites that are absent or malformed, in a stable order.
    pub fn missing(&self) -> Vec<Prerequisite> {
        let mut missing = Vec::new();
        if !is_owner_slash_name(&self.repo) {
            missing.push(Prerequisite::Repo);
        }
        if self.path.trim().trim_start_matches('/').is_empty() {
            missing.push(Prerequisite::Path);
        }
        if self.token.is_empty() {
            missing.push(Prerequisite::Token);
        }
        if self.content.trim().is_empty() {
            missing.push(Prerequisite::Document);
        }
        missing
    }

    fn target(&self) -> ContentTarget {
        ContentTarget {
            repo: self.repo.trim().to_string(),
            path: self.path.trim().trim_start_matches('/').to_string(),
            token: self.token.clone(),
        }
    }
}

fn is_owner_slash_name(repo: &str) -> bool {
    match repo.trim().split_once('/') {
        Some((owner, name)) => !owner.is_empty() && !name.is_empty() && !name.contains('/'),
        None => false,
    }
}

/// Input that must be present before anything is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    Repo,
    Path,
    Token,
    Document,
}

impl std::fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Prerequisite::Repo => "repository (owner/name)",
            Prerequisite::Path => "file path",
            Prerequisite::Token => "access token",
            Prerequisite::Document => "converted document",
        })
    }
}

fn join_prerequisites(missing: &[Prerequisite]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("missing required upload details: {}", join_prerequisites(.0))]
    MissingPrerequisites(Vec<Prerequisite>),

    #[error("Failed to upload file. Status code: {status}. Error: {message}")]
    Rejected {
        status: u16,
        message: String,
        /// Full raw response body, for diagnosis.
        body: String,
    },

    #[error("request to content store failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("content store response could not be read: {0}")]
    InvalidResponse(String),
}

impl PublishError {
    /// The remote refused the write because the file changed since it was read.
    pub fn is_conflict(&self) -> bool {
        matches!(self, PublishError::Rejected { status: 409 | 422, .. })
    }
}

/// Whether the upsert created a new file or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    Updated,
}

/// Metadata the remote assigned to the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub outcome: PublishOutcome,
    pub status: u16,
    /// New revision marker of the file.
    pub content_sha: Option<String>,
    pub commit_sha: Option<String>,
    pub html_url: Option<String>,
}

#[derive(Deserialize)]
struct ExistingFile {
    sha: String,
}

#[derive(Default, Deserialize)]
struct PutResponse {
    content: Option<PutResponseContent>,
    commit: Option<PutResponseCommit>,
}

#[derive(Deserialize)]
struct PutResponseContent {
    sha: Option<String>,
    html_url: Option<String>,
}

#[derive(Deserialize)]
struct PutResponseCommit {
    sha: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Base64 (standard alphabet, padded) of the UTF-8 bytes.
pub fn encode_content(content: &str) -> String {
    STANDARD.encode(content.as_bytes())
}

/// Create or replace `request.path` in `request.repo` with `request.content`.
pub async fn publish<S>(store: &S, request: &UploadRequest) -> Result<PublishReceipt, PublishError>
where
    S: ContentStore + ?Sized,
{
    let missing = request.missing();
    if !missing.is_empty() {
        warn!(?missing, "Upload prerequisites missing, nothing sent");
        return Err(PublishError::MissingPrerequisites(missing));
    }

    let target = request.target();
    info!(repo = %target.repo, path = %target.path, "Publishing document");

    // Step 1: revision marker of the existing file, if there is one.
    let existing = store.get_content(&target).await?;
    let sha = match existing.status {
        200 => {
            let file: ExistingFile = serde_json::from_str(&existing.body).map_err(|e| {
                error!(error = ?e, "Existing file response has no usable sha");
                PublishError::InvalidResponse(format!("existing file metadata: {e}"))
            })?;
            info!(sha = %file.sha, "Found existing file, replacing it");
            Some(file.sha)
        }
        404 => {
            info!("No existing file, creating it");
            None
        }
        other => {
            warn!(status = other, body = %existing.body, "Lookup failed, attempting create without sha");
            None
        }
    };

    // Step 2: upsert.
    let body = PutContentBody {
        message: request.commit_message.clone(),
        content: encode_content(&request.content),
        sha,
    };
    let response = store.put_content(&target, &body).await?;

    let outcome = match response.status {
        201 => PublishOutcome::Created,
        200 => PublishOutcome::Updated,
        status => {
            let message = serde_json::from_str::<ErrorBody>(&response.body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            error!(status, message = %message, body = %response.body, "Content store rejected upload");
            return Err(PublishError::Rejected {
                status,
                message,
                body: response.body,
            });
        }
    };

    let parsed: PutResponse = serde_json::from_str(&response.body).unwrap_or_else(|e| {
        warn!(error = ?e, "Upload succeeded but response metadata could not be parsed");
        PutResponse::default()
    });
    let (content_sha, html_url) = match parsed.content {
        Some(c) => (c.sha, c.html_url),
        None => (None, None),
    };
    let receipt = PublishReceipt {
        outcome,
        status: response.status,
        content_sha,
        commit_sha: parsed.commit.and_then(|c| c.sha),
        html_url,
    };
    info!(?receipt, "File uploaded successfully");
    Ok(receipt)
}
