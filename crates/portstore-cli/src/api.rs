//! Portstore API Client

use anyhow::{anyhow, bail, Context, Result};
use reqwest::{Body, Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tokio_util::io::ReaderStream;

/// API Client for Portstore
pub struct PortstoreClient {
    client: Client,
    base_url: String,
}

// ============================================
// API Response Types
// ============================================

/// Success envelope; only the payload is of interest here
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    slug: String,
    message: String,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct PortResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub alias: Vec<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub coordinates: Vec<f64>,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub unlocs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: usize,
}

#[derive(Debug, Deserialize)]
struct IngestResponse {
    total_ports: usize,
}

impl PortstoreClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/ports/{id}` with the id percent-encoded as a single path segment
    fn port_url(&self, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base URL {:?}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Base URL {:?} cannot take a path", self.base_url))?
            .pop_if_empty()
            .extend(["ports", id]);
        Ok(url)
    }

    /// Health check
    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .context("Failed to connect to Portstore API")?;

        if !resp.status().is_success() {
            bail!("API error ({})", resp.status());
        }

        resp.json().await.context("Failed to parse response")
    }

    /// Get a single port
    pub async fn get_port(&self, id: &str) -> Result<PortResponse> {
        let resp = self
            .client
            .get(self.url("/port"))
            .query(&[("id", id)])
            .send()
            .await
            .context("Failed to connect to Portstore API")?;

        unwrap_envelope(resp).await
    }

    /// Number of stored ports
    pub async fn count(&self) -> Result<usize> {
        let resp = self
            .client
            .get(self.url("/count"))
            .send()
            .await
            .context("Failed to connect to Portstore API")?;

        let count: CountResponse = unwrap_envelope(resp).await?;
        Ok(count.count)
    }

    /// Stream a ports file to the bulk upload endpoint
    pub async fn upload(&self, path: &Path) -> Result<usize> {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open {:?}", path))?;

        let resp = self
            .client
            .post(self.url("/ports"))
            .header("content-type", "application/json")
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await
            .context("Failed to connect to Portstore API")?;

        let ingest: IngestResponse = unwrap_envelope(resp).await?;
        Ok(ingest.total_ports)
    }

    /// Delete one port
    pub async fn delete_port(&self, id: &str) -> Result<String> {
        let resp = self
            .client
            .delete(self.port_url(id)?)
            .send()
            .await
            .context("Failed to connect to Portstore API")?;

        unwrap_envelope(resp).await
    }

    /// Delete every port
    pub async fn delete_all(&self) -> Result<String> {
        let resp = self
            .client
            .delete(self.url("/ports"))
            .query(&[("all", "true")])
            .send()
            .await
            .context("Failed to connect to Portstore API")?;

        unwrap_envelope(resp).await
    }
}

async fn unwrap_envelope<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await.context("Failed to read response")?;

    if !status.is_success() {
        bail!("{}", describe_error(status.as_u16(), &body));
    }

    let envelope: Envelope<T> =
        serde_json::from_str(&body).context("Failed to parse response")?;
    Ok(envelope.data)
}

fn describe_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(err) => format!("API error ({}): {} [{}]", status, err.message, err.slug),
        Err(_) => format!("API error ({}): {}", status, body),
    }
}
