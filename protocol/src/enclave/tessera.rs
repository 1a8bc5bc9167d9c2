//! HTTP client for the enclave's third-party API.

use reqwest::Client;

use super::{EnclaveError, StoreRawRequest, StoreRawResponse};
use crate::config::{ENCLAVE_STORE_RAW_PATH, HTTP_TIMEOUT};

/// Talks to the enclave's `/storeraw` endpoint.
#[derive(Debug, Clone)]
pub struct TesseraClient {
    base_url: String,
    client: Client,
}

impl TesseraClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, EnclaveError> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| EnclaveError::Transport(e.to_string()))?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn store_raw_url(&self) -> String {
        format!("{}{}", self.base_url, ENCLAVE_STORE_RAW_PATH)
    }

    /// POSTs the payload and returns the storage key.
    pub async fn store_raw(&self, request: &StoreRawRequest) -> Result<StoreRawResponse, EnclaveError> {
        let url = self.store_raw_url();
        tracing::debug!(%url, recipients = request.to.len(), "storing raw payload");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| EnclaveError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnclaveError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<StoreRawResponse>()
            .await
            .map_err(|e| EnclaveError::MalformedResponse(e.to_string()))
    }
}
