//! Async API client core for the waterlog hydration-tracking service.
//!
//! # Overview
//! `HttpClient` is the single request/response boundary: it sends JSON,
//! races each call against an optional timeout and cancellation token, runs
//! an optional validator over the decoded body, and reports every failure as
//! one `ApiError`. `WaterlogApi` layers one typed method per endpoint on top.
//!
//! # Design
//! - Request building (`HttpRequest::build`) and response interpretation
//!   (`HttpResponse::interpret`) are plain functions over data; only
//!   `HttpClient::send` touches the network.
//! - No retries. A failed call is reported once; fallbacks such as
//!   `api::or_empty` are the caller's choice.
//! - The signed-in user is an explicit `Session`, never global state.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod hydration;
pub mod session;
pub mod types;

pub use api::{or_empty, WaterlogApi};
pub use client::HttpClient;
pub use config::{ClientConfig, ConfigError};
pub use endpoints::Endpoints;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions, Validator};
pub use session::Session;
pub use tokio_util::sync::CancellationToken;
pub use types::{
    NewUser, NewWaterRecord, ReceivedStamp, SendStamp, Stamp, StampId, User, UserId, UserStamp,
    UserStampId, UserUpdate, WaterId, WaterRecord, WaterRecordUpdate,
};
