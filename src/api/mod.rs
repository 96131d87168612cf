pub mod resources;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::session::{LocalStorage, TOKEN_KEY};

pub use resources::{AuthApi, AuthResponse, Credentials, ResourceApi};

/// `Bearer <token>` when durable storage holds a token, `None` otherwise.
///
/// A storage read failure is treated like a missing token.
pub fn authorization_header(storage: &dyn LocalStorage) -> Option<String> {
    match storage.get_item(TOKEN_KEY) {
        Ok(Some(token)) => Some(format!("Bearer {}", token)),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("cannot read token for credential attachment: {}", e);
            None
        }
    }
}

/// HTTP transport to the remote resource API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn LocalStorage>,
    log_requests: bool,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        storage: Arc<dyn LocalStorage>,
    ) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            storage,
            log_requests: false,
        })
    }

    pub fn from_config(config: &ApiConfig, storage: Arc<dyn LocalStorage>) -> Result<Self, ClientError> {
        let mut client = Self::new(&config.base_url, Duration::from_secs(config.timeout_secs), storage)?;
        client.log_requests = config.enable_request_logging;
        Ok(client)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base address with `path` appended; the base's own path is kept
    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&joined)?)
    }

    /// Request builder with the stored credential attached, if any
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.url(path)?;
        if self.log_requests {
            tracing::info!(%method, %url, "remote request");
        }

        let builder = self.http.request(method, url);
        Ok(match authorization_header(self.storage.as_ref()) {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        })
    }

    /// Send and decode a JSON body, unwrapping a `{"success", "data"}` envelope
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::check(request.send().await?).await?;
        let body: Value = response.json().await?;
        serde_json::from_value(unwrap_envelope(body)).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Send and ignore any body
    pub async fn send_empty(&self, request: RequestBuilder) -> Result<(), ClientError> {
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ClientError::from_status(status.as_u16(), &body);
        tracing::warn!(status = status.as_u16(), "remote request failed: {}", err);
        Err(err)
    }
}

fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("success") && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
