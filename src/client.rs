//! Remote access to the vigilance platform API
//!
//! `ApiClient` is the only way out of the process: it attaches the
//! credential, enforces the request timeout and folds every upstream
//! status into the error taxonomy in one place. The raw HTTP exchange
//! sits behind the `Transport` trait so tests can script responses
//! without a network.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::{Result, VigiliaError, Violations};

/// Longest upstream body quoted in a log line
const ERROR_EXCERPT_LEN: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// One outbound API call, before transport concerns apply
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

/// Raw upstream answer: status plus unparsed body
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Wire-level exchange with the platform
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the exchange; only transport failures (unreachable host,
    /// timeout) are errors here, HTTP error statuses come back as responses.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Production transport over reqwest
pub struct HttpTransport {
    http: reqwest::Client,
    config: Arc<Config>,
}

impl HttpTransport {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| VigiliaError::Execution {
                status: None,
                detail: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { http, config })
    }

    fn map_transport_error(&self, path: &str, e: reqwest::Error) -> VigiliaError {
        if e.is_timeout() {
            VigiliaError::Timeout(self.config.timeout_ms)
        } else {
            VigiliaError::Execution {
                status: None,
                detail: format!("transport failure for {path}: {e}"),
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.config.base_url, request.path);
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .http
            .request(method, url)
            .bearer_auth(&self.config.api_key)
            .header(reqwest::header::ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_transport_error(&request.path, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(&request.path, e))?;

        Ok(ApiResponse { status, body })
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= ERROR_EXCERPT_LEN {
        trimmed.to_string()
    } else {
        let mut cut = ERROR_EXCERPT_LEN;
        while !trimmed.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &trimmed[..cut])
    }
}

/// Typed client over a transport
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        Ok(Self {
            transport: Arc::new(HttpTransport::new(config)?),
        })
    }

    /// Swap in a scripted transport; used by tests.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        self.call(HttpMethod::Get, path, query, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(String, String)],
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.call(HttpMethod::Post, path, query, Some(body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.call(HttpMethod::Patch, path, &[], Some(body)).await
    }

    /// DELETE with no response body expected beyond the status.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .transport
            .send(ApiRequest {
                method: HttpMethod::Delete,
                path: path.to_string(),
                query: Vec::new(),
                body: None,
            })
            .await?;
        if (200..300).contains(&response.status) {
            Ok(())
        } else {
            Err(self.status_error(HttpMethod::Delete, path, &response))
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(String, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let response = self
            .transport
            .send(ApiRequest {
                method,
                path: path.to_string(),
                query: query.to_vec(),
                body,
            })
            .await?;

        tracing::debug!(
            method = method.as_str(),
            path,
            status = response.status,
            "platform call"
        );

        if !(200..300).contains(&response.status) {
            return Err(self.status_error(method, path, &response));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            VigiliaError::UpstreamValidation(format!("{}: {}", path, e))
        })
    }

    /// Single point where upstream statuses become taxonomy errors.
    ///
    /// The response body is quoted whole in the error; the log line carries
    /// only an excerpt.
    fn status_error(
        &self,
        method: HttpMethod,
        path: &str,
        response: &ApiResponse,
    ) -> VigiliaError {
        let body = response.body.trim();
        tracing::debug!(
            method = method.as_str(),
            path,
            status = response.status,
            body = %excerpt(body),
            "platform refused the call"
        );
        match response.status {
            400 | 422 => VigiliaError::Parameter(Violations::of(
                "request",
                format!("rejected by the platform: {body}"),
            )),
            401 => VigiliaError::Unauthorized(
                "the platform rejected the configured API credential".to_string(),
            ),
            403 => VigiliaError::Forbidden(path.to_string()),
            404 => VigiliaError::NotFound(path.to_string()),
            status => VigiliaError::Execution {
                status: Some(status),
                detail: format!("{} {} returned {}: {}", method.as_str(), path, status, body),
            },
        }
    }
}
