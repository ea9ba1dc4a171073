// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! HTTP client for the pipeline coordinator

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::CoordinatorConfig;
use crate::identify::IdentificationResult;
use crate::{IdentifierError, Result};

/// A file the coordinator wants identified
///
/// Files waiting for identification have no ssdeep hash yet, so most fields
/// besides the id are optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub id: i64,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(rename = "ssdeep", default)]
    pub fuzzy_hash: Option<String>,
}

#[derive(Deserialize)]
struct FilesResponse {
    files: Vec<FileDescriptor>,
}

/// Coordinator API client
///
/// Holds no state between calls apart from the connection pool.
pub struct CoordinatorClient {
    client: Client,
    base_url: String,
}

impl CoordinatorClient {
    /// Create a new coordinator client
    pub fn new(config: &CoordinatorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let base_url = config.url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List files that still need identification
    pub async fn list_unidentified(&self) -> Result<Vec<FileDescriptor>> {
        let url = format!("{}/unidentified-files-info", self.base_url);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let response = expect_ok("list unidentified files", response).await?;

        let body = response.bytes().await?;
        let listing: FilesResponse = serde_json::from_slice(&body)?;
        Ok(listing.files)
    }

    /// Download the content of one file
    pub async fn fetch(&self, id: i64) -> Result<Vec<u8>> {
        let url = format!("{}/files/{}", self.base_url, id);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let response = expect_ok(&format!("fetch of file {}", id), response).await?;

        Ok(response.bytes().await?.to_vec())
    }

    /// Download one file into a temporary file under `dir`
    ///
    /// The file is deleted when the returned handle is dropped.
    pub async fn fetch_to_temp(&self, id: i64, dir: &Path) -> Result<NamedTempFile> {
        let content = self.fetch(id).await?;

        let mut file = tempfile::Builder::new().prefix("ident_").tempfile_in(dir)?;
        file.write_all(&content)?;
        file.flush()?;

        debug!("Stored file {} ({} bytes) at {:?}", id, content.len(), file.path());
        Ok(file)
    }

    /// Report the identification of one file
    pub async fn submit(&self, id: i64, result: &IdentificationResult) -> Result<()> {
        let url = format!("{}/files/{}", self.base_url, id);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(result).send().await?;
        expect_ok(&format!("submit of file {}", id), response).await?;

        Ok(())
    }
}

/// Turn anything but 200 into an error carrying the response body
async fn expect_ok(operation: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(IdentifierError::Coordinator {
        operation: operation.to_string(),
        status: status.as_u16(),
        body,
    })
}
