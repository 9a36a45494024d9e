//! HTTP client for the notes REST API.
//!
//! Every operation is a single round trip with no retries. Non-success
//! statuses become typed [`ApiError`]s; a 401 is always
//! [`ApiError::AuthRequired`] so callers can force a logout.

use crate::auth::TokenStore;
use crate::config::Config;
use crate::errors::ApiError;
use crate::models::{AuthResponse, Credentials, ErrorBody, Note, NoteDraft, NoteUpdate, View};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use std::sync::Arc;

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

// ============================================================================
// Client Interfaces
// ============================================================================

/// Operations on the note resource.
#[async_trait]
pub trait NoteApi: Send + Sync {
    async fn list(&self, view: View) -> Result<Vec<Note>, ApiError>;

    async fn get(&self, id: i64) -> Result<Note, ApiError>;

    async fn create(&self, draft: &NoteDraft) -> Result<Note, ApiError>;

    /// Resolves to the submitted note when the server answers with no content.
    async fn update(&self, note: &Note) -> Result<Note, ApiError>;

    async fn toggle_archive(&self, id: i64) -> Result<(), ApiError>;

    async fn remove(&self, id: i64) -> Result<(), ApiError>;
}

/// Operations on the auth resource. These never carry a bearer token.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Returns the issued bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError>;

    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError>;
}

// ============================================================================
// reqwest Implementation
// ============================================================================

pub struct ApiClient {
    http: reqwest::Client,
    notes_endpoint: String,
    auth_endpoint: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(config: &Config, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            notes_endpoint: config.notes_endpoint(),
            auth_endpoint: config.auth_endpoint(),
            tokens,
        })
    }

    fn note_url(&self, suffix: &str) -> String {
        format!("{}{}", self.notes_endpoint, suffix)
    }

    /// Attach the bearer header when a token is present; omit it otherwise.
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.get_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorized(request).send().await?;
        log::debug!("{} {}", response.status(), response.url());
        check_status(response).await
    }

    async fn auth_post(
        &self,
        path: &str,
        credentials: &Credentials,
        fallback: &str,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.auth_endpoint, path);
        let response = self.http.post(&url).json(credentials).send().await?;
        log::debug!("{} {}", response.status(), url);

        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = if text.trim().is_empty() {
            fallback.to_string()
        } else {
            text
        };
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

/// Map non-success statuses onto the error taxonomy.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::AuthRequired);
    }

    let body = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("API error: {}", status.as_u16()));

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

#[async_trait]
impl NoteApi for ApiClient {
    async fn list(&self, view: View) -> Result<Vec<Note>, ApiError> {
        let url = match view {
            View::Active => self.note_url(""),
            View::Archived => self.note_url("/archived"),
        };
        let response = self.send(self.http.get(url)).await?;
        read_json(response).await
    }

    async fn get(&self, id: i64) -> Result<Note, ApiError> {
        let response = self.send(self.http.get(self.note_url(&format!("/{}", id)))).await?;
        read_json(response).await
    }

    async fn create(&self, draft: &NoteDraft) -> Result<Note, ApiError> {
        let response = self.send(self.http.post(self.note_url("")).json(draft)).await?;
        read_json(response).await
    }

    async fn update(&self, note: &Note) -> Result<Note, ApiError> {
        let request = self
            .http
            .put(self.note_url(&format!("/{}", note.id)))
            .json(&NoteUpdate::from(note));
        let response = self.send(request).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(note.clone());
        }
        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(note.clone());
        }
        Ok(serde_json::from_slice(&body)?)
    }

    async fn toggle_archive(&self, id: i64) -> Result<(), ApiError> {
        self.send(self.http.patch(self.note_url(&format!("/{}/archive", id))))
            .await?;
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.send(self.http.delete(self.note_url(&format!("/{}", id))))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        let response = self.auth_post("/login", credentials, "Failed to login").await?;
        let auth: AuthResponse = read_json(response).await?;
        Ok(auth.token)
    }

    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        self.auth_post("/register", credentials, "Failed to register")
            .await?;
        Ok(())
    }
}
