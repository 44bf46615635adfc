// src/extract/client.rs
use anyhow::{Context, Result};
use reqwest::{multipart, Client};
use serde_json::Value;
use std::{path::Path, time::Duration};
use tokio::{fs, time::Instant};
use tracing::{info, instrument};
use url::Url;

use crate::config::Config;

const EXTRACT_PATH: &str = "extract";

/// Talks to the hosted PDF table extraction service.
#[derive(Debug, Clone)]
pub struct ExtractClient {
    http: Client,
    endpoint: Url,
}

impl ExtractClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.api_url)
            .with_context(|| format!("parsing api_url {}", config.api_url))?;
        let endpoint = join_endpoint(&base)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building HTTP client")?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Read `pdf_path` and upload it.
    pub async fn extract_file(&self, pdf_path: &Path) -> Result<Value> {
        let bytes = fs::read(pdf_path)
            .await
            .with_context(|| format!("reading {}", pdf_path.display()))?;
        let file_name = pdf_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "statement.pdf".to_string());
        self.extract_bytes(&file_name, bytes).await
    }

    /// One multipart POST with a single `file` field. No retries.
    #[instrument(level = "info", skip(self, bytes), fields(endpoint = %self.endpoint, size = bytes.len()))]
    pub async fn extract_bytes(&self, file_name: &str, bytes: Vec<u8>) -> Result<Value> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .context("building multipart file part")?;
        let form = multipart::Form::new().part("file", part);

        let start = Instant::now();
        let body = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("POST {}", self.endpoint))?
            .error_for_status()?
            .json::<Value>()
            .await
            .with_context(|| format!("reading JSON body from {}", self.endpoint))?;
        info!(elapsed = ?start.elapsed(), "extraction response received");
        Ok(body)
    }
}

/// `<base>/extract`, whether or not the base ends in a slash.
fn join_endpoint(base: &Url) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(EXTRACT_PATH)
        .with_context(|| format!("joining {} onto {}", EXTRACT_PATH, base))
}
