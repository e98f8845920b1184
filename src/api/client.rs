use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{AutocompleteEntry, InteractionRequestBody, SearchRequestBody};
use super::MedicationApi;
use crate::config::WidgetConfig;
use crate::models::{InteractionResult, MedicationCandidate, MedicationId, SearchResult};

/// HTTP client for the medication backend.
#[derive(Clone)]
pub struct HttpMedicationApi {
    base_url: String,
    client: reqwest::Client,
    timeout_ms: u64,
}

impl HttpMedicationApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    pub fn from_config(config: &WidgetConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn send_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_connect() {
            ApiError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            ApiError::Timeout(self.timeout_ms)
        } else {
            ApiError::HttpClient(e.to_string())
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        response.json().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.timeout_ms)
            } else {
                ApiError::ResponseParsing(e.to_string())
            }
        })
    }
}

impl MedicationApi for HttpMedicationApi {
    async fn autocomplete(&self, query: &str) -> Result<Vec<MedicationCandidate>, ApiError> {
        let response = self
            .client
            .get(self.url("autocomplete"))
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        // The backend answers "nothing matched" with a 404 + message body.
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(query, "Autocomplete returned 404, treating as no results");
            return Ok(Vec::new());
        }

        let entries: Vec<AutocompleteEntry> = self.read_json(response).await?;
        Ok(entries.into_iter().map(MedicationCandidate::from).collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        let response = self
            .client
            .post(self.url("search"))
            .json(&SearchRequestBody { query })
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        self.read_json(response).await
    }

    async fn check_interactions(
        &self,
        ids: &[MedicationId],
    ) -> Result<Vec<InteractionResult>, ApiError> {
        let response = self
            .client
            .post(self.url("interactions"))
            .json(&InteractionRequestBody { drugs: ids })
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        self.read_json(response).await
    }
}
