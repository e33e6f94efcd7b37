//! Typed operations for each waterlog endpoint.
//!
//! # Design
//! `WaterlogApi` is `HttpClient` plus `Endpoints` plus the configured default
//! timeout. It holds no user state; anything scoped to the signed-in user
//! takes a `Session` argument.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::client::HttpClient;
use crate::config::ClientConfig;
use crate::endpoints::Endpoints;
use crate::error::ApiError;
use crate::http::RequestOptions;
use crate::session::Session;
use crate::types::{
    NewUser, NewWaterRecord, ReceivedStamp, SendStamp, Stamp, StampId, User, UserId, UserStamp,
    UserStampId, UserUpdate, WaterId, WaterRecord, WaterRecordUpdate,
};

#[derive(Debug, Clone)]
pub struct WaterlogApi {
    client: HttpClient,
    endpoints: Endpoints,
    timeout: Option<Duration>,
}

impl WaterlogApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(HttpClient::new(), config)
    }

    pub fn with_client(client: HttpClient, config: &ClientConfig) -> Self {
        Self {
            client,
            endpoints: Endpoints::new(&config.base_url),
            timeout: config.timeout,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    fn options(&self) -> RequestOptions {
        match self.timeout {
            Some(timeout) => RequestOptions::new().timeout(timeout),
            None => RequestOptions::new(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        self.client.get(&url, self.options()).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, url: String, body: &B) -> Result<T, ApiError> {
        self.client.post(&url, body, self.options()).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, url: String, body: &B) -> Result<T, ApiError> {
        self.client.put(&url, body, self.options()).await
    }

    pub async fn get_user_info(&self, user_id: UserId) -> Result<User, ApiError> {
        self.get(self.endpoints.user_info(user_id)).await
    }

    pub async fn get_nearby_users(&self) -> Result<Vec<User>, ApiError> {
        self.get(self.endpoints.nearby_users()).await
    }

    pub async fn get_water_records(&self, user_id: UserId) -> Result<Vec<WaterRecord>, ApiError> {
        self.get(self.endpoints.water_records(user_id)).await
    }

    pub async fn get_today_water_records(&self, user_id: UserId) -> Result<Vec<WaterRecord>, ApiError> {
        self.get(self.endpoints.water_records_today(user_id)).await
    }

    /// The most recent record, or `None` when the user has logged nothing.
    pub async fn get_latest_water_record(&self, user_id: UserId) -> Result<Option<WaterRecord>, ApiError> {
        match self.get(self.endpoints.water_records_latest(user_id)).await {
            Ok(record) => Ok(record),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn get_stamps(&self) -> Result<Vec<Stamp>, ApiError> {
        self.get(self.endpoints.stamps()).await
    }

    pub async fn get_stamp_info(&self, stamp_id: StampId) -> Result<Stamp, ApiError> {
        self.get(self.endpoints.stamp_info(stamp_id)).await
    }

    /// Stamps received by `user_id`, newest first.
    pub async fn get_stamps_sent_info(&self, user_id: UserId) -> Result<Vec<ReceivedStamp>, ApiError> {
        self.get(self.endpoints.stamps_sent(user_id)).await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<Option<User>, ApiError> {
        self.post(self.endpoints.create_user(), user).await
    }

    pub async fn create_water_record(
        &self,
        user_id: UserId,
        record: &NewWaterRecord,
    ) -> Result<WaterRecord, ApiError> {
        self.post(self.endpoints.create_water_record(user_id), record).await
    }

    pub async fn update_user_info(&self, user_id: UserId, update: &UserUpdate) -> Result<User, ApiError> {
        self.put(self.endpoints.update_user(user_id), update).await
    }

    pub async fn update_water_record(
        &self,
        water_id: WaterId,
        update: &WaterRecordUpdate,
    ) -> Result<WaterRecord, ApiError> {
        self.put(self.endpoints.update_water_record(water_id), update).await
    }

    pub async fn send_stamp(&self, stamp: &SendStamp) -> Result<UserStamp, ApiError> {
        self.post(self.endpoints.send_stamp(), stamp).await
    }

    /// Mark a received stamp as answered. The server rejects a second reply
    /// with 400.
    pub async fn respond_stamp(&self, user_stamp_id: UserStampId) -> Result<UserStamp, ApiError> {
        self.put(self.endpoints.respond_stamp(user_stamp_id), &serde_json::json!({}))
            .await
    }

    pub async fn my_profile(&self, session: &Session) -> Result<Option<User>, ApiError> {
        match session.user_id() {
            Some(user_id) => self.get_user_info(user_id).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn my_today_water_records(&self, session: &Session) -> Result<Vec<WaterRecord>, ApiError> {
        match session.user_id() {
            Some(user_id) => self.get_today_water_records(user_id).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn my_received_stamps(&self, session: &Session) -> Result<Vec<ReceivedStamp>, ApiError> {
        match session.user_id() {
            Some(user_id) => self.get_stamps_sent_info(user_id).await,
            None => Ok(Vec::new()),
        }
    }
}

/// Screen-level fallback: log the failure and carry on with an empty value.
pub fn or_empty<T: Default>(result: Result<T, ApiError>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!(error = %e, status = ?e.status(), "failed to fetch {what}, using empty result");
        T::default()
    })
}
