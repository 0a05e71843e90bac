//! HTTP client for the remote document store.
//!
//! Maps typed calls onto the store's REST endpoints. The client keeps no
//! state beyond the session cookie jar and never retries; callers compose
//! retries with [`RetryPolicy`](crate::retry::RetryPolicy) where they want them.

use std::future::Future;

use reqwest::header::ACCEPT;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ClientConfig;
use crate::models::{Document, DocumentId, User};
use crate::util::{compact_text, normalize_base_url};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid store configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Store HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Store API error: {message} ({status})")]
    Api { status: u16, message: String },
    #[error("Invalid store payload: {0}")]
    InvalidPayload(String),
}

impl StoreError {
    /// HTTP status reported by the store, if the request got that far
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Operations the sync flows need from a document store
pub trait DocumentStore {
    /// Establish a session. Failures are logged, never returned.
    ///
    /// An empty `email` marks an external-identity login that authenticates by
    /// `token` alone.
    fn login(&self, email: &str, token: &str) -> impl Future<Output = ()> + Send;

    fn get_current_user(&self) -> impl Future<Output = StoreResult<User>> + Send;

    /// Persist a new document and return the id the store assigned
    fn create_doc(&self, doc: &Document) -> impl Future<Output = StoreResult<DocumentId>> + Send;

    /// Documents in the order the store returned them
    fn list_docs(&self) -> impl Future<Output = StoreResult<Vec<Document>>> + Send;

    fn get_doc(&self, id: &DocumentId) -> impl Future<Output = StoreResult<Document>> + Send;

    fn delete_doc(&self, id: &DocumentId) -> impl Future<Output = StoreResult<()>> + Send;
}

/// reqwest-backed [`DocumentStore`] talking to `{base_url}/login` and `{base_url}/api/...`
#[derive(Debug, Clone)]
pub struct DocumentStoreClient {
    base_url: String,
    client: reqwest::Client,
}

impl DocumentStoreClient {
    /// Builds a client for an explicit store base URL.
    pub fn new(base_url: impl Into<String>) -> StoreResult<Self> {
        let base_url =
            normalize_base_url(&base_url.into()).map_err(StoreError::InvalidConfiguration)?;
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { base_url, client })
    }

    pub fn from_config(config: &ClientConfig) -> StoreResult<Self> {
        Self::new(config.base_url.as_str())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Log in and report the outcome instead of swallowing it.
    pub async fn try_login(&self, email: &str, token: &str) -> StoreResult<()> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&LoginRequest { email, token })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn fetch_json<T: DeserializeOwned>(&self, route: &str) -> StoreResult<T> {
        tracing::debug!(route, "Fetching from store");
        let response = self
            .client
            .get(self.url(route))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let response = ensure_success(response).await?;
        parse_json(response).await
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }
}

impl DocumentStore for DocumentStoreClient {
    async fn login(&self, email: &str, token: &str) {
        match self.try_login(email, token).await {
            Ok(()) => tracing::info!(external_identity = email.is_empty(), "Logged in"),
            Err(error) => tracing::warn!("Login failed: {}", error),
        }
    }

    async fn get_current_user(&self) -> StoreResult<User> {
        self.fetch_json("/api/user").await
    }

    async fn create_doc(&self, doc: &Document) -> StoreResult<DocumentId> {
        let response = self
            .client
            .post(self.url("/api/doc"))
            .header(ACCEPT, "application/json")
            .json(&doc.without_store_fields())
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let payload: CreatedResponse = parse_json(response).await?;
        if payload.id.trim().is_empty() {
            return Err(StoreError::InvalidPayload(
                "create response did not include an id".to_string(),
            ));
        }
        Ok(DocumentId::new(payload.id))
    }

    async fn list_docs(&self) -> StoreResult<Vec<Document>> {
        // An empty store answers with `null` rather than `[]`.
        let documents: Option<Vec<Document>> = self.fetch_json("/api/doc/list").await?;
        Ok(documents.unwrap_or_default())
    }

    async fn get_doc(&self, id: &DocumentId) -> StoreResult<Document> {
        let route = format!("/api/doc/{}", urlencoding::encode(id.as_str()));
        self.fetch_json(&route).await
    }

    async fn delete_doc(&self, id: &DocumentId) -> StoreResult<()> {
        let route = format!("/api/doc/{}", urlencoding::encode(id.as_str()));
        let response = self.client.delete(self.url(&route)).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    error: Option<String>,
    message: Option<String>,
}

async fn ensure_success(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        message: parse_api_error(status, &body),
    })
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|error| {
        StoreError::InvalidPayload(format!("{error}: {}", compact_text(&body)))
    })
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<StoreErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return message.trim().to_string();
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_string)
    } else {
        trimmed
    }
}
