use std::time::Duration;

use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;

use crate::types::CreateReportBody;
use crate::{ReportId, ReportRecord, TransportError, TransportErrorKind};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            max_bytes: 4 * 1024 * 1024,
        }
    }
}

/// The remote side of the report list.
#[async_trait::async_trait]
pub trait ReportApi: Send + Sync {
    async fn list_reports(&self) -> Result<Vec<ReportRecord>, TransportError>;
    async fn create_report(&self, title: &str) -> Result<ReportRecord, TransportError>;
    async fn delete_report(&self, id: ReportId) -> Result<(), TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestReportApi {
    settings: ClientSettings,
    client: reqwest::Client,
    collection_url: Url,
}

impl ReqwestReportApi {
    pub fn new(settings: ClientSettings) -> Result<Self, TransportError> {
        let collection_url = format!("{}/reports", settings.base_url.trim_end_matches('/'));
        let collection_url = Url::parse(&collection_url)
            .map_err(|err| TransportError::new(TransportErrorKind::InvalidUrl, err.to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::new(TransportErrorKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            client,
            collection_url,
        })
    }

    fn item_url(&self, id: ReportId) -> Result<Url, TransportError> {
        let raw = format!("{}/{id}", self.collection_url);
        Url::parse(&raw)
            .map_err(|err| TransportError::new(TransportErrorKind::InvalidUrl, err.to_string()))
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response, TransportError> {
        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(
                TransportErrorKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(response)
    }

    /// Reads the body up to `max_bytes` and decodes it as JSON.
    async fn read_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(TransportError::new(
                    TransportErrorKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(TransportError::new(
                    TransportErrorKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&body)
            .map_err(|err| TransportError::new(TransportErrorKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ReportApi for ReqwestReportApi {
    async fn list_reports(&self) -> Result<Vec<ReportRecord>, TransportError> {
        let response = self
            .send(Method::GET, self.collection_url.clone(), None)
            .await?;
        self.read_json(response).await
    }

    async fn create_report(&self, title: &str) -> Result<ReportRecord, TransportError> {
        let body = serde_json::to_vec(&CreateReportBody { title })
            .map_err(|err| TransportError::new(TransportErrorKind::Decode, err.to_string()))?;
        let response = self
            .send(Method::POST, self.collection_url.clone(), Some(body))
            .await?;
        self.read_json(response).await
    }

    async fn delete_report(&self, id: ReportId) -> Result<(), TransportError> {
        let url = self.item_url(id)?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(TransportErrorKind::Timeout, err.to_string());
    }
    TransportError::new(TransportErrorKind::Network, err.to_string())
}
