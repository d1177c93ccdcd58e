// src/infrastructure/notehub.rs
use crate::application::NoteGateway;
use crate::domain::{CreateNotePayload, DeletedNote, DomainError, Note, NotesPage, QueryKey};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::wire;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Extra attempts for list requests after a transport error or 5xx
const LIST_RETRIES: u32 = 1;

const TRANSPORT_ERROR: &str = "Network error: could not reach the notes service";

const NOT_DELETED: &str = "Note was not deleted";

/// `NoteGateway` backed by the NoteHub REST API
pub struct HttpNoteGateway {
    client: Client,
    base_url: Url,
    token: String,
}

impl HttpNoteGateway {
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        if config.token.trim().is_empty() {
            return Err(DomainError::Configuration(
                "Bearer token must not be empty".to_string(),
            ));
        }
        let base_url = Url::parse(&config.api_url).map_err(|e| {
            DomainError::Configuration(format!("Invalid API URL {}: {}", config.api_url, e))
        })?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DomainError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        info!(%base_url, "Notes gateway ready");
        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, DomainError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DomainError::Configuration(format!("API URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }

    /// Turn a response into its JSON body, or a user-facing error
    async fn read_body(response: Response) -> Result<Value, DomainError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = wire::error_message(status.as_u16(), &body);
            warn!(status = status.as_u16(), %message, "Notes service returned an error");
            return Err(DomainError::Network(message));
        }

        let text = response.text().await.map_err(|e| {
            warn!(error = %e, "Failed to read response body");
            DomainError::Network(TRANSPORT_ERROR.to_string())
        })?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, "Response body is not JSON");
            DomainError::Network("Invalid response from the notes service".to_string())
        })
    }

    async fn send_once(&self, request: RequestBuilder) -> Result<Value, DomainError> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Request to notes service failed");
            DomainError::Network(TRANSPORT_ERROR.to_string())
        })?;
        Self::read_body(response).await
    }
}

#[async_trait]
impl NoteGateway for HttpNoteGateway {
    #[instrument(level = "debug", skip(self))]
    async fn list_notes(&self, key: &QueryKey) -> Result<NotesPage, DomainError> {
        let url = self.endpoint(&["notes"])?;
        let mut params: Vec<(&str, String)> = vec![
            ("page", key.page().to_string()),
            ("perPage", key.per_page().to_string()),
        ];
        if let Some(search) = key.search() {
            params.push(("search", search.to_string()));
        }

        let mut attempt = 0;
        let response = loop {
            let request = self.authorized(self.client.get(url.clone()).query(&params));
            match request.send().await {
                Ok(response) if response.status().is_server_error() && attempt < LIST_RETRIES => {
                    warn!(status = response.status().as_u16(), "Server error, retrying once");
                }
                Ok(response) => break response,
                Err(e) if attempt < LIST_RETRIES => {
                    warn!(error = %e, "Transport error, retrying once");
                }
                Err(e) => {
                    warn!(error = %e, "Request to notes service failed");
                    return Err(DomainError::Network(TRANSPORT_ERROR.to_string()));
                }
            }
            attempt += 1;
        };

        let body = Self::read_body(response).await?;
        let page = wire::normalize_page(body, key);
        debug!(
            items = page.items.len(),
            total_pages = page.total_pages,
            "Fetched notes page"
        );
        Ok(page)
    }

    #[instrument(level = "debug", skip(self, payload), fields(title = %payload.title))]
    async fn create_note(&self, payload: &CreateNotePayload) -> Result<Note, DomainError> {
        let url = self.endpoint(&["notes"])?;
        let body = self
            .send_once(self.authorized(self.client.post(url).json(payload)))
            .await?;
        Ok(wire::normalize_note(&body))
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_note(&self, id: &str) -> Result<DeletedNote, DomainError> {
        let url = self.endpoint(&["notes", id])?;
        let body = self
            .send_once(self.authorized(self.client.delete(url)))
            .await?;
        let deleted = wire::normalize_deleted(body, id);
        if !deleted.deleted {
            warn!(note_id = id, "Notes service refused the delete");
            return Err(DomainError::Network(NOT_DELETED.to_string()));
        }
        Ok(deleted)
    }
}
