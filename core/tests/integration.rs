//! Full hydration and stamp lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every
//! `WaterlogApi` operation over real HTTP. Validates that the core's DTOs,
//! endpoints, and error mapping line up with the server's routes.

use std::time::Duration;

use tokio::net::TcpListener;
use waterlog_core::{
    hydration, or_empty, ApiError, ClientConfig, NewUser, NewWaterRecord, RequestOptions, SendStamp,
    Session, UserUpdate, WaterRecordUpdate, WaterlogApi,
};

async fn start_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { mock_server::run(listener).await.unwrap() });
    format!("http://{addr}{}", mock_server::API_PREFIX)
}

fn new_user(name: &str) -> NewUser {
    NewUser {
        user_name: name.to_string(),
        bio: Some("drinks a lot".to_string()),
        x_handle: Some(format!("@{name}")),
        photo_url: None,
        password_hash: "hash".to_string(),
    }
}

fn drink(amount: i64, kind: &str) -> NewWaterRecord {
    NewWaterRecord {
        water_amount: amount,
        lat: 35.68,
        lon: 139.76,
        water_type: Some(kind.to_string()),
        comment: None,
    }
}

#[tokio::test]
async fn hydration_lifecycle() {
    let base = start_server().await;
    let api = WaterlogApi::new(&ClientConfig::new(&base).with_timeout(Duration::from_secs(5)));

    // Step 1: sign up and open a session.
    let mio = api.create_user(&new_user("mio")).await.unwrap().expect("created user");
    assert_eq!(mio.user_name, "mio");
    assert!(mio.password_hash.is_none(), "hash must not be echoed");
    let session = Session::signed_in(mio.user_id);

    // Step 2: no records yet.
    assert!(api.get_water_records(mio.user_id).await.unwrap().is_empty());
    assert!(api.get_latest_water_record(mio.user_id).await.unwrap().is_none());

    // Step 3: log two drinks.
    let first = api.create_water_record(mio.user_id, &drink(250, "water")).await.unwrap();
    let second = api.create_water_record(mio.user_id, &drink(500, "tea")).await.unwrap();
    assert_eq!(first.user_id, mio.user_id);
    assert!(second.water_id > first.water_id);

    // Step 4: today's total and the latest pin.
    let today = api.my_today_water_records(&session).await.unwrap();
    assert_eq!(hydration::daily_total_ml(&today), 750);
    assert_eq!(
        hydration::filled_cups(750, hydration::DEFAULT_GOAL_ML, hydration::DEFAULT_CUPS),
        1
    );
    let latest = api.get_latest_water_record(mio.user_id).await.unwrap().unwrap();
    assert_eq!(latest.water_id, second.water_id);

    let nearby = api.get_nearby_users().await.unwrap();
    let records = api.get_water_records(mio.user_id).await.unwrap();
    let pins = hydration::map_pins(&nearby, &records);
    assert_eq!(pins.len(), 1);
    assert_eq!(pins[0].user_name, "mio");

    // Step 5: edit a record.
    let update = WaterRecordUpdate {
        comment: Some("with ice".to_string()),
        ..Default::default()
    };
    let edited = api.update_water_record(first.water_id, &update).await.unwrap();
    assert_eq!(edited.comment.as_deref(), Some("with ice"));
    assert_eq!(edited.water_amount, 250);

    // Step 6: edit the profile.
    let update = UserUpdate {
        bio: Some("tea person".to_string()),
        ..Default::default()
    };
    let updated = api.update_user_info(mio.user_id, &update).await.unwrap();
    assert_eq!(updated.bio.as_deref(), Some("tea person"));
    assert_eq!(updated.x_handle.as_deref(), Some("@mio"));
    assert_eq!(api.my_profile(&session).await.unwrap(), Some(updated));
}

#[tokio::test]
async fn stamp_lifecycle() {
    let base = start_server().await;
    let api = WaterlogApi::new(&ClientConfig::new(&base));

    let mio = api.create_user(&new_user("mio")).await.unwrap().unwrap();
    let ren = api.create_user(&new_user("ren")).await.unwrap().unwrap();
    let nearby = api.get_nearby_users().await.unwrap();
    assert_eq!(nearby.len(), 2);

    // Catalog reads are idempotent.
    let stamps = api.get_stamps().await.unwrap();
    assert_eq!(api.get_stamps().await.unwrap(), stamps);
    let stamp = api.get_stamp_info(stamps[0].stamp_id).await.unwrap();
    assert_eq!(stamp, stamps[0]);

    let sent = api
        .send_stamp(&SendStamp {
            sender_id: ren.user_id,
            receiver_id: mio.user_id,
            stamp_id: stamp.stamp_id,
        })
        .await
        .unwrap();
    assert!(!sent.after_stamp);

    let received = api.my_received_stamps(&Session::signed_in(mio.user_id)).await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].sender_name, "ren");
    assert_eq!(received[0].stamp, sent);
    assert_eq!(received[0].stamp_image_url, stamp.image_url);

    let replied = api.respond_stamp(sent.user_stamp_id).await.unwrap();
    assert!(replied.after_stamp);

    let err = api.respond_stamp(sent.user_stamp_id).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.body().unwrap()["error"], "Stamp already replied");
}

#[tokio::test]
async fn missing_resources_surface_status() {
    let base = start_server().await;
    let api = WaterlogApi::new(&ClientConfig::new(&base));

    let err = api.get_user_info(404).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.body().unwrap()["error"], "User not found");

    let err = api.get_stamp_info(99).await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));

    let err = api.create_water_record(1, &drink(100, "water")).await.unwrap_err();
    assert!(err.is_not_found());

    // screens fall back to empty lists
    let received = or_empty(api.get_stamps_sent_info(1).await, "received stamps");
    assert!(received.is_empty());
}

#[tokio::test]
async fn raw_client_validator_against_catalog() {
    let base = start_server().await;
    let api = WaterlogApi::new(&ClientConfig::new(&base));
    let url = api.endpoints().stamps();

    let options = RequestOptions::new()
        .validate(|v| v.as_array().is_some_and(|a| a.iter().all(|s| s.get("image_url").is_some())));
    let stamps: Vec<waterlog_core::Stamp> = api.client().get(&url, options).await.unwrap();
    assert_eq!(stamps.len(), 3);

    let options = RequestOptions::new().validate(|v| v.is_object());
    let err = api
        .client()
        .get::<serde_json::Value>(&url, options)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation { status: 200, .. }));
}
