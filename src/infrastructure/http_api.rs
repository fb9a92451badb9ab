// SPDX-License-Identifier: MPL-2.0
//! REST adapter implementing [`NotificationApi`] with `reqwest`.
//!
//! Every call carries the session cookie (when configured) plus any cookie
//! the server sets, and has a per-request timeout. Failures are classified
//! into [`ApiError`] variants: transport problems are `Network`, non-2xx
//! statuses are `Server`, undecodable bodies and unbuildable URLs are `Parse`.

use crate::application::port::{ApiError, ApiResult, NotificationApi};
use crate::config::Config;
use crate::domain::notification::{NotificationId, NotificationRecord};
use crate::error::{Error, Result};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("property-notifications/", env!("CARGO_PKG_VERSION"));

/// `{ "result": ... }` wrapper used by every read endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: T,
}

/// HTTP client for the notification endpoints.
#[derive(Debug, Clone)]
pub struct HttpNotificationApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpNotificationApi {
    /// Builds a client rooted at `base_url`.
    pub fn new(base_url: Url, timeout: Duration, session_cookie: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| Error::Config(format!("invalid session cookie: {e}")))?;
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base: with_trailing_slash(base_url),
        })
    }

    /// Builds a client from the base URL, timeout and cookie in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.validated_base_url()?,
            config.request_timeout(),
            config.session_cookie.as_deref(),
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base
            .join(path)
            .map_err(|e| ApiError::Parse(format!("invalid endpoint `{path}`: {e}")))
    }

    async fn send(&self, method: Method, path: &str) -> ApiResult<reqwest::Response> {
        let url = self.endpoint(path)?;
        tracing::trace!(%method, %url, "notification request");
        let response = self
            .client
            .request(method, url)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response.status())?;
        Ok(response)
    }

    async fn get_result<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.send(Method::GET, path).await?;
        let body = response.text().await.map_err(transport_error)?;
        parse_envelope(&body)
    }

    async fn send_command(&self, method: Method, path: String) -> ApiResult<()> {
        self.send(method, &path).await.map(drop)
    }
}

impl NotificationApi for HttpNotificationApi {
    fn unread_count(&self) -> BoxFuture<'_, ApiResult<u32>> {
        self.get_result("notifications/count/unread").boxed()
    }

    fn list(&self) -> BoxFuture<'_, ApiResult<Vec<NotificationRecord>>> {
        self.get_result("notifications").boxed()
    }

    fn mark_read(&self, id: NotificationId) -> BoxFuture<'_, ApiResult<()>> {
        self.send_command(Method::PUT, format!("notifications/{id}/read"))
            .boxed()
    }

    fn mark_all_read(&self) -> BoxFuture<'_, ApiResult<()>> {
        self.send_command(Method::PUT, "notifications/read-all".to_string())
            .boxed()
    }

    fn delete(&self, id: NotificationId) -> BoxFuture<'_, ApiResult<()>> {
        self.send_command(Method::DELETE, format!("notifications/{id}"))
            .boxed()
    }
}

/// Makes relative joins append to the base path instead of replacing its last segment.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn transport_error(err: reqwest::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

fn check_status(status: StatusCode) -> ApiResult<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::Server {
            status: status.as_u16(),
        })
    }
}

fn parse_envelope<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(|envelope| envelope.result)
        .map_err(|e| ApiError::Parse(e.to_string()))
}
