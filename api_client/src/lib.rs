//! Client for the native photo backend.
//!
//! Every call is a `POST {base}/invoke/{command}` carrying camelCase JSON
//! arguments. Preview generation progress is pushed on `GET {base}/events`
//! as newline-delimited JSON.

pub mod events;
mod mock;
pub mod models;

pub use events::{EventGuard, EventSubscription, PreviewEvent};
pub use models::{
    DirectoryClusters, FaceCluster, FaceClusters, Folder, FolderEntry, Photo, PhotoData,
    PhotoSummary,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tokio::sync::mpsc;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:7878";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiClientError {
    #[error("Request Error: {0}")]
    Request(String),
    #[error("Backend Error: {0}")]
    Backend(String),
    #[error("Decode Error: {0}")]
    Decode(String),
    #[error("Other Error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BACKEND_URL.to_string())
    }

    /// Create a client talking to a backend at a custom address.
    pub fn with_base_url(base_url: String) -> Self {
        ApiClient {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn invoke<A, T>(&self, command: &str, args: &A) -> Result<T, ApiClientError>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        if mock::enabled() {
            let args = serde_json::to_value(args).map_err(|e| ApiClientError::Other(e.to_string()))?;
            let value = mock::respond(command, &args)?;
            return serde_json::from_value(value).map_err(|e| ApiClientError::Decode(e.to_string()));
        }

        tracing::debug!(command, "invoking backend command");
        let url = format!("{}/invoke/{}", self.base_url, command);
        let response = self
            .client
            .post(&url)
            .json(args)
            .send()
            .await
            .map_err(|e| ApiClientError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(command, "backend command failed: {}", error_text);
            return Err(ApiClientError::Backend(error_text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiClientError::Request(e.to_string()))?;
        // Unit-returning commands may answer with an empty body.
        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(body).map_err(|e| ApiClientError::Decode(e.to_string()))
    }

    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub async fn get_folders(&self) -> Result<Vec<Folder>, ApiClientError> {
        self.invoke("get_folders", &json!({})).await
    }

    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub async fn add_folder(&self, path: &str) -> Result<Folder, ApiClientError> {
        self.invoke("add_folder", &json!({ "path": path })).await
    }

    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub async fn delete_folder(&self, path: &str) -> Result<(), ApiClientError> {
        self.invoke::<_, serde_json::Value>("delete_folder", &json!({ "path": path }))
            .await
            .map(|_| ())
    }

    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub async fn get_photos_from_path(
        &self,
        path: &str,
        tag_filters: &[String],
    ) -> Result<PhotoData, ApiClientError> {
        self.invoke(
            "get_photos_from_path",
            &json!({ "path": path, "tagFilters": tag_filters }),
        )
        .await
    }

    /// Face clusters of the directories at the given paths, or of all
    /// directories. The result is keyed by directory id.
    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub async fn get_face_clusters(
        &self,
        dirs: Option<&[String]>,
    ) -> Result<FaceClusters, ApiClientError> {
        self.invoke("get_face_clusters", &json!({ "dirs": dirs })).await
    }

    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub async fn get_basic_metadata(
        &self,
        photo_ids: &[String],
    ) -> Result<Vec<PhotoSummary>, ApiClientError> {
        if photo_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.invoke("get_basic_metadata", &json!({ "photoIds": photo_ids }))
            .await
    }

    /// Open the push event stream. The reader task lives as long as the
    /// returned subscription.
    pub async fn subscribe_events(&self) -> Result<EventSubscription, ApiClientError> {
        let (tx, rx) = mpsc::unbounded_channel();

        if mock::enabled() {
            let handle = tokio::spawn(async move {
                for event in mock::preview_events() {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            });
            return Ok(EventSubscription::new(rx, EventGuard::new(handle)));
        }

        let url = format!("{}/events", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiClientError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiClientError::Backend(error_text));
        }

        tracing::info!("Subscribed to backend events at {}", url);
        let stream = Box::pin(response.bytes_stream());
        let handle = tokio::spawn(events::pump_events(stream, tx));
        Ok(EventSubscription::new(rx, EventGuard::new(handle)))
    }
}
