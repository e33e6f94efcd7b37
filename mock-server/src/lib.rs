use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::debug;

pub const API_PREFIX: &str = "/api/v1";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub user_name: String,
    pub bio: Option<String>,
    #[serde(rename = "X")]
    pub x: Option<String>,
    pub photo_url: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

#[derive(Deserialize)]
pub struct NewUser {
    pub user_name: String,
    pub bio: Option<String>,
    #[serde(rename = "X")]
    pub x: Option<String>,
    pub photo_url: Option<String>,
    pub password_hash: String,
}

#[derive(Deserialize)]
pub struct UserUpdate {
    pub user_name: Option<String>,
    pub bio: Option<String>,
    #[serde(rename = "X")]
    pub x: Option<String>,
    pub photo_url: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WaterRecord {
    pub water_id: i64,
    pub water_date: NaiveDateTime,
    pub water_type: Option<String>,
    pub water_amount: i64,
    pub lat: f64,
    pub lon: f64,
    pub comment: Option<String>,
    pub user_id: i64,
}

#[derive(Deserialize)]
pub struct NewWaterRecord {
    pub water_amount: i64,
    pub lat: f64,
    pub lon: f64,
    pub water_type: Option<String>,
    pub comment: Option<String>,
}

#[derive(Deserialize)]
pub struct WaterRecordUpdate {
    pub water_date: Option<NaiveDateTime>,
    pub water_type: Option<String>,
    pub water_amount: Option<i64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Stamp {
    pub stamp_id: i64,
    pub message: Option<String>,
    pub image_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserStamp {
    pub user_stamp_id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub stamp_id: i64,
    pub after_stamp: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Deserialize)]
pub struct SendStamp {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub stamp_id: i64,
}

/// In-memory stand-in for the service's tables. Ids are assigned from one
/// counter per table, starting at 1.
#[derive(Debug, Default)]
pub struct Store {
    users: BTreeMap<i64, User>,
    water_records: BTreeMap<i64, WaterRecord>,
    stamps: BTreeMap<i64, Stamp>,
    user_stamps: BTreeMap<i64, UserStamp>,
}

impl Store {
    /// An empty store holding only the stamp catalog.
    pub fn with_catalog() -> Self {
        let mut store = Self::default();
        for (message, image_url) in [
            ("Stay hydrated!", "https://example.com/stamps/drop.png"),
            ("Nice sip!", "https://example.com/stamps/cup.png"),
            ("Cheers!", "https://example.com/stamps/cheers.png"),
        ] {
            let stamp_id = next_id(&store.stamps);
            store.stamps.insert(
                stamp_id,
                Stamp {
                    stamp_id,
                    message: Some(message.to_string()),
                    image_url: image_url.to_string(),
                },
            );
        }
        store
    }
}

fn next_id<V>(table: &BTreeMap<i64, V>) -> i64 {
    table.keys().next_back().map_or(1, |id| id + 1)
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

fn not_found(what: &str) -> (StatusCode, Json<Value>) {
    error(StatusCode::NOT_FOUND, &format!("{what} not found"))
}

/// Check required fields before decoding so missing ones yield a 400 with
/// the field name instead of axum's generic rejection.
fn require_fields<T: serde::de::DeserializeOwned>(data: Value, fields: &[&str]) -> ApiResult<T> {
    for field in fields {
        if data.get(field).map_or(true, Value::is_null) {
            return Err(error(
                StatusCode::BAD_REQUEST,
                &format!("Missing required field: {field}"),
            ));
        }
    }
    serde_json::from_value(data).map_err(|e| error(StatusCode::BAD_REQUEST, &e.to_string()))
}

pub fn app() -> Router {
    app_with_store(Store::with_catalog())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    let api = Router::new()
        .route("/users", post(create_user))
        .route("/users/nearby", get(nearby_users))
        .route("/users/{id}", get(get_user).put(update_user))
        .route(
            "/water_records/{id}",
            get(list_water_records).post(create_water_record).put(update_water_record),
        )
        .route("/water_records/today/{user_id}", get(today_water_records))
        .route("/water_records/now/{user_id}", get(latest_water_record))
        .route("/stamps", get(list_stamps))
        .route("/stamps/{id}", get(get_stamp))
        .route("/stamps/send", post(send_stamp))
        .route("/stamps/send/{user_id}", get(received_stamps))
        .route("/stamps/reply/{id}", put(reply_stamp))
        .with_state(db);
    Router::new()
        .nest(API_PREFIX, api)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- users ---

async fn create_user(
    State(db): State<Db>,
    Json(data): Json<Value>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let input: NewUser = require_fields(data, &["user_name", "password_hash"])?;
    let mut store = db.write().await;
    let user = User {
        user_id: next_id(&store.users),
        user_name: input.user_name,
        bio: input.bio,
        x: input.x,
        photo_url: input.photo_url,
        password_hash: input.password_hash,
    };
    debug!(user_id = user.user_id, "created user");
    store.users.insert(user.user_id, user.clone());
    Ok((StatusCode::CREATED, Json(user)))
}

async fn nearby_users(State(db): State<Db>) -> Json<Vec<User>> {
    let store = db.read().await;
    Json(store.users.values().cloned().collect())
}

async fn get_user(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<User>> {
    let store = db.read().await;
    store.users.get(&id).cloned().map(Json).ok_or_else(|| not_found("User"))
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(data): Json<Value>,
) -> ApiResult<Json<User>> {
    let input: UserUpdate = require_fields(data, &[])?;
    let mut store = db.write().await;
    let user = store.users.get_mut(&id).ok_or_else(|| not_found("User"))?;
    if let Some(user_name) = input.user_name {
        user.user_name = user_name;
    }
    if input.bio.is_some() {
        user.bio = input.bio;
    }
    if input.x.is_some() {
        user.x = input.x;
    }
    if input.photo_url.is_some() {
        user.photo_url = input.photo_url;
    }
    if let Some(password_hash) = input.password_hash {
        user.password_hash = password_hash;
    }
    Ok(Json(user.clone()))
}

// --- water records ---

fn records_for(store: &Store, user_id: i64) -> Vec<WaterRecord> {
    let mut records: Vec<WaterRecord> = store
        .water_records
        .values()
        .filter(|r| r.user_id == user_id)
        .cloned()
        .collect();
    records.sort_by(|a, b| {
        b.water_date
            .cmp(&a.water_date)
            .then(b.water_id.cmp(&a.water_id))
    });
    records
}

async fn list_water_records(State(db): State<Db>, Path(user_id): Path<i64>) -> Json<Vec<WaterRecord>> {
    let store = db.read().await;
    Json(records_for(&store, user_id))
}

async fn today_water_records(State(db): State<Db>, Path(user_id): Path<i64>) -> Json<Vec<WaterRecord>> {
    let store = db.read().await;
    let today = now().date();
    Json(
        records_for(&store, user_id)
            .into_iter()
            .filter(|r| r.water_date.date() == today)
            .collect(),
    )
}

async fn latest_water_record(State(db): State<Db>, Path(user_id): Path<i64>) -> ApiResult<Json<WaterRecord>> {
    let store = db.read().await;
    records_for(&store, user_id)
        .into_iter()
        .next()
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "No water records found", "user_id": user_id })),
            )
        })
}

async fn create_water_record(
    State(db): State<Db>,
    Path(user_id): Path<i64>,
    Json(data): Json<Value>,
) -> ApiResult<(StatusCode, Json<WaterRecord>)> {
    let input: NewWaterRecord = require_fields(data, &["water_amount", "lat", "lon"])?;
    let mut store = db.write().await;
    if !store.users.contains_key(&user_id) {
        return Err(not_found("User"));
    }
    let record = WaterRecord {
        water_id: next_id(&store.water_records),
        water_date: now(),
        water_type: input.water_type,
        water_amount: input.water_amount,
        lat: input.lat,
        lon: input.lon,
        comment: input.comment,
        user_id,
    };
    debug!(water_id = record.water_id, user_id, "created water record");
    store.water_records.insert(record.water_id, record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_water_record(
    State(db): State<Db>,
    Path(water_id): Path<i64>,
    Json(data): Json<Value>,
) -> ApiResult<Json<Value>> {
    let input: WaterRecordUpdate = require_fields(data, &[])?;
    let mut store = db.write().await;
    let record = store.water_records.get_mut(&water_id).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Water record not found", "water_id": water_id })),
        )
    })?;
    if let Some(water_date) = input.water_date {
        record.water_date = water_date;
    }
    if input.water_type.is_some() {
        record.water_type = input.water_type;
    }
    if let Some(water_amount) = input.water_amount {
        record.water_amount = water_amount;
    }
    if let Some(lat) = input.lat {
        record.lat = lat;
    }
    if let Some(lon) = input.lon {
        record.lon = lon;
    }
    if input.comment.is_some() {
        record.comment = input.comment;
    }

    let mut body = serde_json::to_value(&*record)
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;
    body["message"] = json!("Water record updated successfully");
    Ok(Json(body))
}

// --- stamps ---

async fn list_stamps(State(db): State<Db>) -> Json<Vec<Stamp>> {
    let store = db.read().await;
    Json(store.stamps.values().cloned().collect())
}

async fn get_stamp(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<Stamp>> {
    let store = db.read().await;
    store.stamps.get(&id).cloned().map(Json).ok_or_else(|| not_found("Stamp"))
}

async fn received_stamps(State(db): State<Db>, Path(user_id): Path<i64>) -> ApiResult<Json<Vec<Value>>> {
    let store = db.read().await;
    if !store.users.contains_key(&user_id) {
        return Err(not_found("User"));
    }
    let mut received: Vec<&UserStamp> = store
        .user_stamps
        .values()
        .filter(|s| s.receiver_id == user_id)
        .collect();
    received.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then(b.user_stamp_id.cmp(&a.user_stamp_id))
    });

    let mut out = Vec::with_capacity(received.len());
    for user_stamp in received {
        let stamp = store.stamps.get(&user_stamp.stamp_id);
        let sender = store.users.get(&user_stamp.sender_id);
        let mut entry = serde_json::to_value(user_stamp)
            .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;
        entry["stamp_message"] = json!(stamp.and_then(|s| s.message.clone()));
        entry["stamp_image_url"] = json!(stamp.map(|s| s.image_url.clone()).unwrap_or_default());
        entry["sender_name"] = json!(sender.map(|u| u.user_name.clone()).unwrap_or_default());
        out.push(entry);
    }
    Ok(Json(out))
}

async fn send_stamp(
    State(db): State<Db>,
    Json(data): Json<Value>,
) -> ApiResult<(StatusCode, Json<UserStamp>)> {
    let input: SendStamp = require_fields(data, &["sender_id", "receiver_id", "stamp_id"])?;
    let mut store = db.write().await;
    if !store.users.contains_key(&input.sender_id) || !store.users.contains_key(&input.receiver_id) {
        return Err(not_found("Sender or receiver"));
    }
    if !store.stamps.contains_key(&input.stamp_id) {
        return Err(not_found("Stamp"));
    }
    let at = now();
    let user_stamp = UserStamp {
        user_stamp_id: next_id(&store.user_stamps),
        sender_id: input.sender_id,
        receiver_id: input.receiver_id,
        stamp_id: input.stamp_id,
        after_stamp: false,
        created_at: at,
        updated_at: at,
    };
    debug!(user_stamp_id = user_stamp.user_stamp_id, "stamp sent");
    store.user_stamps.insert(user_stamp.user_stamp_id, user_stamp.clone());
    Ok((StatusCode::CREATED, Json(user_stamp)))
}

async fn reply_stamp(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<UserStamp>> {
    let mut store = db.write().await;
    let user_stamp = store.user_stamps.get_mut(&id).ok_or_else(|| not_found("Stamp"))?;
    if user_stamp.after_stamp {
        return Err(error(StatusCode::BAD_REQUEST, "Stamp already replied"));
    }
    user_stamp.after_stamp = true;
    user_stamp.updated_at = now();
    Ok(Json(user_stamp.clone()))
}
