//! Azure Computer Vision Read API client.
//!
//! The image is posted to the analyze endpoint, which answers with an
//! `Operation-Location` URL; that URL is then polled until the analysis
//! finishes or the [`PollSchedule`] is exhausted.

use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Response};
use tracing::{debug, info};

use super::poll::{poll_operation, OperationSource, PollSchedule};
use super::response::ReadOperation;
use super::upload::ImageUpload;
use super::RecognizedText;
use crate::error::{FacturaError, Result, ServiceError, TransportError};
use crate::models::config::OcrServiceConfig;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "Operation-Location";

/// Client for the Read API, configured explicitly by the caller.
pub struct AzureReadClient {
    http: Client,
    config: OcrServiceConfig,
    schedule: PollSchedule,
}

impl AzureReadClient {
    /// Create a client. Fails with a configuration error when credentials
    /// are missing.
    pub fn new(config: OcrServiceConfig) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let schedule = PollSchedule::from_config(&config.poll);

        Ok(Self {
            http,
            config,
            schedule,
        })
    }

    pub fn schedule(&self) -> &PollSchedule {
        &self.schedule
    }

    /// Recognize the text of an image.
    pub async fn recognize(&self, upload: &ImageUpload) -> Result<RecognizedText> {
        let operation_url = self.submit(upload).await?;
        info!("Analysis started for {}", upload.name());

        let operation = PendingOperation {
            client: self,
            url: operation_url,
        };
        let result = poll_operation(&operation, &self.schedule).await?;

        let text = RecognizedText::from_analyze_result(&result);
        debug!(
            "Recognized {} lines on {} pages",
            text.line_count(),
            result.read_results.len()
        );
        Ok(text)
    }

    /// Start an analysis and return its operation URL.
    pub async fn submit(&self, upload: &ImageUpload) -> Result<String> {
        let url = self.config.analyze_url();
        debug!("POST {} ({} bytes)", url, upload.bytes().len());

        let response = self
            .http
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(upload.bytes().to_vec())
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let response = ensure_success(response).await?;
        operation_location(response.headers())
    }

    async fn fetch_operation(&self, url: &str) -> Result<ReadOperation> {
        let response = self
            .http
            .get(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let response = ensure_success(response).await?;
        response.json::<ReadOperation>().await.map_err(|e| -> FacturaError {
            if e.is_decode() {
                ServiceError::MalformedResponse(e.to_string()).into()
            } else {
                TransportError::Request(e.to_string()).into()
            }
        })
    }
}

/// An accepted analysis, identified by its operation URL.
struct PendingOperation<'a> {
    client: &'a AzureReadClient,
    url: String,
}

impl OperationSource for PendingOperation<'_> {
    async fn fetch(&self) -> Result<ReadOperation> {
        self.client.fetch_operation(&self.url).await
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TransportError::HttpStatus {
        status: status.as_u16(),
        body,
    }
    .into())
}

fn operation_location(headers: &HeaderMap) -> Result<String> {
    headers
        .get(OPERATION_LOCATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| TransportError::MissingOperationLocation.into())
}
