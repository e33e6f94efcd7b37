//! Async JSON-over-HTTP client with per-call timeout, cancellation, and
//! response validation.
//!
//! # Design
//! `HttpClient` wraps a `reqwest::Client` and nothing else, so clones share a
//! connection pool but never share call state. Each call resolves an
//! `HttpRequest`, races the round-trip against its cancellation token and
//! timer, then hands the captured `HttpResponse` to `interpret`. The timer
//! lives inside the call's future, so it is gone once the call returns.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};

#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing `reqwest::Client` (custom TLS, proxies, pool size).
    pub fn with_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Issue one call and decode the response into `T`.
    ///
    /// An empty 2xx body decodes as JSON `null`, so `T` must accept `null`
    /// (`()`, `Option<_>`, `Value`) for endpoints that may answer empty.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let value = self.request_value(method, url, options).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Issue one call and return the decoded JSON value untouched.
    pub async fn request_value(
        &self,
        method: HttpMethod,
        url: &str,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let request = HttpRequest::build(method, url, &options)?;

        let token = match &options.cancel {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        let timeout = options.timeout;
        let timer = async move {
            match timeout {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending::<()>().await,
            }
        };

        debug!(%method, url, ?timeout, "sending request");

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            _ = timer => {
                token.cancel();
                None
            }
            result = self.send(request) => Some(result),
        };

        let Some(response) = outcome else {
            debug!(%method, url, "request aborted");
            return Err(ApiError::Aborted {
                method,
                url: url.to_string(),
            });
        };

        let response = response?;
        debug!(%method, url, status = response.status, "received response");
        response.interpret(method, url, options.validator.as_ref())
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.inner.request(request.method.into(), &request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = if response.status().is_success() {
            response.text().await?
        } else {
            // error bodies are best-effort
            response.text().await.unwrap_or_default()
        };

        Ok(HttpResponse { status, body })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        mut options: RequestOptions,
    ) -> Result<T, ApiError> {
        options.body = None;
        self.request(HttpMethod::Get, url, options).await
    }

    pub async fn post<T, B>(&self, url: &str, body: &B, options: RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Post, url, options.json(body)?).await
    }

    pub async fn put<T, B>(&self, url: &str, body: &B, options: RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Put, url, options.json(body)?).await
    }

    pub async fn patch<T, B>(&self, url: &str, body: &B, options: RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Patch, url, options.json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        url: &str,
        mut options: RequestOptions,
    ) -> Result<T, ApiError> {
        options.body = None;
        self.request(HttpMethod::Delete, url, options).await
    }
}
