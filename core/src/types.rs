//! Domain DTOs for the waterlog service.
//!
//! # Design
//! These mirror the service's JSON field names, including its `X` handle
//! field. The mock-server crate defines its own copies; integration tests
//! catch any drift between the two.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type StampId = i64;
pub type WaterId = i64;
pub type UserStampId = i64;

/// A registered user. Reads never include `password_hash`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(rename = "X", default)]
    pub x_handle: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

/// Request payload for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "X", skip_serializing_if = "Option::is_none")]
    pub x_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub password_hash: String,
}

/// Partial user update. Only the fields present in the JSON are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "X", skip_serializing_if = "Option::is_none")]
    pub x_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

/// One logged intake event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterRecord {
    pub water_id: WaterId,
    pub water_date: NaiveDateTime,
    #[serde(default)]
    pub water_type: Option<String>,
    /// Millilitres.
    pub water_amount: i64,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub comment: Option<String>,
    pub user_id: UserId,
}

/// Request payload for logging an intake. The server stamps the time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWaterRecord {
    pub water_amount: i64,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaterRecordUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// An entry in the static stamp catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stamp {
    pub stamp_id: StampId,
    #[serde(default)]
    pub message: Option<String>,
    pub image_url: String,
}

/// A stamp sent from one user to another.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStamp {
    pub user_stamp_id: UserStampId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub stamp_id: StampId,
    /// Set once the receiver has responded.
    #[serde(default)]
    pub after_stamp: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A received stamp joined with its catalog entry and sender name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceivedStamp {
    #[serde(flatten)]
    pub stamp: UserStamp,
    #[serde(default)]
    pub stamp_message: Option<String>,
    pub stamp_image_url: String,
    pub sender_name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendStamp {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub stamp_id: StampId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_uses_service_field_names() {
        let user: User = serde_json::from_value(json!({
            "user_id": 1,
            "user_name": "mio",
            "bio": null,
            "X": "@mio",
            "photo_url": null
        }))
        .unwrap();
        assert_eq!(user.x_handle.as_deref(), Some("@mio"));
        assert!(user.password_hash.is_none());

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["X"], "@mio");
        assert!(back.get("password_hash").is_none());
    }

    #[test]
    fn water_record_parses_naive_iso_timestamps() {
        let record: WaterRecord = serde_json::from_value(json!({
            "water_id": 3,
            "water_date": "2025-07-01T09:30:15.123456",
            "water_type": "tea",
            "water_amount": 250,
            "lat": 35.68,
            "lon": 139.76,
            "comment": null,
            "user_id": 1
        }))
        .unwrap();
        assert_eq!(record.water_amount, 250);
        assert_eq!(record.water_date.to_string(), "2025-07-01 09:30:15.123456");
    }

    #[test]
    fn partial_updates_omit_absent_fields() {
        let update = WaterRecordUpdate {
            water_amount: Some(500),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"water_amount": 500}));
        assert_eq!(serde_json::to_value(UserUpdate::default()).unwrap(), json!({}));
    }

    #[test]
    fn received_stamp_flattens_user_stamp() {
        let received: ReceivedStamp = serde_json::from_value(json!({
            "user_stamp_id": 4,
            "sender_id": 1,
            "receiver_id": 2,
            "stamp_id": 1,
            "after_stamp": false,
            "created_at": "2025-07-01T10:00:00",
            "updated_at": "2025-07-01T10:00:00",
            "stamp_message": "Stay hydrated!",
            "stamp_image_url": "https://img/1.png",
            "sender_name": "mio"
        }))
        .unwrap();
        assert_eq!(received.stamp.user_stamp_id, 4);
        assert_eq!(received.sender_name, "mio");
    }

    #[test]
    fn new_user_requires_password_hash() {
        let result: Result<NewUser, _> = serde_json::from_value(json!({"user_name": "a"}));
        assert!(result.is_err());
    }
}
