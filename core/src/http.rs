//! Plain-data HTTP types shared by the client and its callers.
//!
//! # Design
//! A call is described by `RequestOptions`, resolved into an `HttpRequest`
//! (method, URL, merged headers, serialized body) before any I/O happens, and
//! the network result is captured as an `HttpResponse` before it is
//! interpreted. Both halves are deterministic and tested without a server.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Predicate run against the decoded body of a 2xx response.
pub type Validator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Per-call options. Everything is optional; `Default` gives a plain call
/// with the JSON content-type header, no body, no timeout, no validator.
#[derive(Clone, Default)]
pub struct RequestOptions {
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
    pub cancel: Option<CancellationToken>,
    pub timeout: Option<Duration>,
    pub validator: Option<Validator>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any earlier one whose name differs only in case.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Serialize `body` into the JSON value sent with the request.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn cancel_with(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// A zero duration means no timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn timeout_ms(self, ms: u64) -> Self {
        self.timeout(Duration::from_millis(ms))
    }

    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("cancel", &self.cancel.is_some())
            .field("timeout", &self.timeout)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// An HTTP request described as plain data, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Resolve a request from its options. Caller headers replace the default
    /// content type when their names match case-insensitively.
    pub fn build(method: HttpMethod, url: &str, options: &RequestOptions) -> Result<Self, ApiError> {
        let mut headers = Vec::with_capacity(options.headers.len() + 1);
        if !options
            .headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case(CONTENT_TYPE))
        {
            headers.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
        }
        headers.extend(options.headers.iter().map(|(k, v)| (k.clone(), v.clone())));

        let body = options.body.as_ref().map(serde_json::to_string).transpose()?;

        Ok(Self {
            method,
            url: url.to_string(),
            headers,
            body,
        })
    }
}

/// The status and raw text of a completed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn the response into the decoded JSON value, or the matching error.
    ///
    /// Empty 2xx bodies decode to `Value::Null`. Non-2xx bodies that fail to
    /// parse are dropped rather than reported.
    pub fn interpret(
        self,
        method: HttpMethod,
        url: &str,
        validator: Option<&Validator>,
    ) -> Result<Value, ApiError> {
        if !self.is_success() {
            let body = serde_json::from_str::<Value>(&self.body).ok();
            return Err(ApiError::Http {
                method,
                url: url.to_string(),
                status: self.status,
                body,
            });
        }

        let value = if self.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&self.body)?
        };

        if let Some(validator) = validator {
            if !(**validator)(&value) {
                return Err(ApiError::Validation {
                    method,
                    url: url.to_string(),
                    status: self.status,
                    body: value,
                });
            }
        }

        Ok(value)
    }
}
