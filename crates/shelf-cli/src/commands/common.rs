use std::io::{self, IsTerminal, Read};

use chrono::{DateTime, Utc};
use serde::Serialize;
use shelf_core::{ClientConfig, Document, DocumentStoreClient, SyncController};

use crate::cli::GlobalArgs;
use crate::config_profiles::{normalize_text_option, resolve_client_config, CliProfilesConfig};
use crate::error::CliError;

pub type Controller = SyncController<DocumentStoreClient>;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DocumentListItem {
    pub id: String,
    pub title: String,
    pub path: String,
    pub updated_at: Option<String>,
}

/// How to sign in before running a command
#[derive(Debug, PartialEq, Eq)]
pub enum SignIn {
    Basic { email: String, token: String },
    IdentityToken(String),
}

/// Resolve the client configuration for this invocation.
///
/// `--base-url` wins over the selected profile, which wins over the
/// environment and the built-in defaults.
pub fn load_client_config(global: &GlobalArgs) -> Result<ClientConfig, CliError> {
    let profiles = CliProfilesConfig::load()?;
    let profile_name = profiles.resolve_profile_name(global.profile.as_deref());
    let config = resolve_client_config(
        |key| std::env::var(key).ok(),
        profiles.profile(&profile_name),
        global.base_url.clone(),
    )?;
    Ok(config)
}

/// Pick the sign-in for the given flags. `--email` takes precedence over an
/// identity token, which may also come from `SHELF_IDENTITY_TOKEN`.
pub fn resolve_sign_in(global: &GlobalArgs) -> Result<Option<SignIn>, CliError> {
    if let Some(email) = normalize_text_option(global.email.clone()) {
        let token = normalize_text_option(global.token.clone())
            .ok_or_else(|| CliError::Auth("--token is required with --email".to_string()))?;
        return Ok(Some(SignIn::Basic { email, token }));
    }
    Ok(normalize_text_option(global.identity_token.clone()).map(SignIn::IdentityToken))
}

/// Build a controller for the configured store and sign in when credentials were given.
pub async fn connect(global: &GlobalArgs) -> Result<Controller, CliError> {
    let config = load_client_config(global)?;
    let sign_in = resolve_sign_in(global)?;
    tracing::debug!(base_url = %config.base_url, "Connecting to store");

    let client = DocumentStoreClient::from_config(&config)?;
    let controller = SyncController::new(client).with_retry_policy(config.retry);

    match sign_in {
        Some(SignIn::Basic { email, token }) => controller
            .store()
            .try_login(&email, &token)
            .await
            .map_err(|error| CliError::Auth(error.to_string()))?,
        Some(SignIn::IdentityToken(token)) => {
            controller.sign_in_with_identity_token(&token).await;
        }
        None => {}
    }

    Ok(controller)
}

pub fn format_document_lines(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .map(|document| {
            let id = document
                .id
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string);
            let updated = document
                .updated_at
                .map_or_else(|| "-".to_string(), format_timestamp);
            format!("{id}  {updated}  {}  {}", document.path, document.title)
        })
        .collect()
}

pub fn document_to_list_item(document: &Document) -> DocumentListItem {
    DocumentListItem {
        id: document
            .id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        title: document.title.clone(),
        path: document.path.clone(),
        updated_at: document.updated_at.map(|timestamp| timestamp.to_rfc3339()),
    }
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

pub fn normalize_document_id(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyDocumentId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_title(title: &str) -> Result<String, CliError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyTitle)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Content passed on the command line, else piped stdin, else empty.
pub fn resolve_document_content(content: Option<String>) -> Result<String, CliError> {
    if let Some(content) = content {
        return Ok(content);
    }
    Ok(read_piped_stdin()?.unwrap_or_default())
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(Some(buffer))
}
