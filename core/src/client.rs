//! HTTP client for the provisioning API
//!
//! Thin typed wrapper over the Fastly-style REST endpoints the pipeline
//! drives. The API key is installed as a default header at construction;
//! every method is a single request with no retry, so a failed call is
//! terminal for the run.

use std::time::Duration;

use reqwest::{header, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.fastly.com";

/// Request header carrying the API key
pub const API_KEY_HEADER: &str = "Fastly-Key";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Provisioning API client
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for `base_url` authenticating with `api_key`.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            header::HeaderValue::from_str(api_key).map_err(|_| Error::Auth)?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(DEFAULT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Creates a new service, returning its ID and newest version number.
    ///
    /// 401 maps to [`Error::Auth`], 409 (name already registered) to
    /// [`Error::Conflict`].
    pub async fn create_service(&self, name: &str) -> Result<(String, u64)> {
        let url = self.endpoint("/service")?;
        debug!(%name, "creating service");
        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(Error::Conflict(name.to_string()));
        }
        let response = check(response).await?;
        let created: ServiceCreated = response.json().await?;
        let version = created
            .versions
            .iter()
            .map(|v| v.number)
            .max()
            .unwrap_or(1);
        Ok((created.id, version))
    }

    /// Registers one domain to a service version.
    pub async fn add_domain(&self, service_id: &str, version: u64, domain: &str) -> Result<()> {
        let url = self.endpoint(&format!("/service/{service_id}/version/{version}/domain"))?;
        debug!(%domain, "registering domain");
        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "name": domain }))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Registers a backend to a service version.
    pub async fn add_backend(
        &self,
        service_id: &str,
        version: u64,
        backend: &NewBackend<'_>,
    ) -> Result<()> {
        let url = self.endpoint(&format!("/service/{service_id}/version/{version}/backend"))?;
        debug!(name = backend.name, "registering backend");
        let response = self.http.post(url).json(backend).send().await?;
        check(response).await?;
        Ok(())
    }

    /// Uploads a snippet to a service version, returning its ID.
    pub async fn add_snippet(
        &self,
        service_id: &str,
        version: u64,
        snippet: &NewSnippet<'_>,
    ) -> Result<String> {
        let url = self.endpoint(&format!("/service/{service_id}/version/{version}/snippet"))?;
        debug!(name = snippet.name, dynamic = snippet.dynamic, "uploading snippet");
        let response = self.http.post(url).json(snippet).send().await?;
        let response = check(response).await?;
        let created: SnippetCreated = response.json().await?;
        Ok(created.id)
    }

    /// Replaces a dynamic snippet's content in place (no new version).
    pub async fn update_snippet(
        &self,
        service_id: &str,
        snippet_id: &str,
        content: &str,
    ) -> Result<()> {
        let url = self.endpoint(&format!("/service/{service_id}/snippet/{snippet_id}"))?;
        debug!(%snippet_id, "replacing dynamic snippet content");
        let response = self
            .http
            .put(url)
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Validates a service version.
    ///
    /// Remote-reported validation errors map to [`Error::Validation`]
    /// carrying the diagnostic payload verbatim.
    pub async fn validate(&self, service_id: &str, version: u64) -> Result<()> {
        let url = self.endpoint(&format!("/service/{service_id}/version/{version}/validate"))?;
        let response = check(self.http.get(url).send().await?).await?;
        let body = response.text().await?;
        let report: ValidationReport = serde_json::from_str(&body).unwrap_or_default();
        if report.status == "ok" {
            Ok(())
        } else {
            Err(Error::Validation { detail: body })
        }
    }

    /// Activates a service version, making it live.
    pub async fn activate(&self, service_id: &str, version: u64) -> Result<()> {
        let url = self.endpoint(&format!("/service/{service_id}/version/{version}/activate"))?;
        let response = self.http.put(url).send().await?;
        check(response).await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

/// Maps non-2xx responses onto the error taxonomy.
async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Auth);
    }
    let detail = response.text().await.unwrap_or_default();
    Err(Error::Remote {
        status: status.as_u16(),
        detail,
    })
}

/// Backend registration request body
#[derive(Debug, Serialize)]
pub struct NewBackend<'a> {
    /// Backend name
    pub name: &'a str,
    /// IPv4 address
    pub ipv4: &'a str,
    /// Port
    pub port: u16,
}

/// Snippet upload request body
#[derive(Debug, Serialize)]
pub struct NewSnippet<'a> {
    /// Snippet name
    pub name: &'a str,
    /// 0 = static (fixed at this version), 1 = dynamic (replaceable after
    /// activation)
    pub dynamic: u8,
    /// Snippet type
    #[serde(rename = "type")]
    pub snippet_type: &'a str,
    /// Snippet content
    pub content: &'a str,
    /// Numeric priority; lower values initialize first
    pub priority: u32,
}

#[derive(Debug, Deserialize)]
struct ServiceCreated {
    id: String,
    versions: Vec<VersionInfo>,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct SnippetCreated {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct ValidationReport {
    #[serde(default)]
    status: String,
}
