//! Intake arithmetic behind the progress cups and map water-level icons.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::types::{User, UserId, WaterRecord};

pub const DEFAULT_GOAL_ML: i64 = 2000;
pub const DEFAULT_CUPS: u32 = 4;

/// Minutes after which a pin's water level reads empty.
pub const FRESHNESS_WINDOW_MINUTES: i64 = 120;

pub fn daily_total_ml(records: &[WaterRecord]) -> i64 {
    records.iter().map(|r| r.water_amount).sum()
}

/// Number of cups filled out of `cups` when `goal_ml` fills all of them.
pub fn filled_cups(amount_ml: i64, goal_ml: i64, cups: u32) -> u32 {
    if goal_ml <= 0 || cups == 0 || amount_ml <= 0 {
        return 0;
    }
    let filled = amount_ml.saturating_mul(i64::from(cups)) / goal_ml;
    filled.min(i64::from(cups)) as u32
}

/// Linear decay from 1.0 at `water_date` to 0.0 after the freshness window.
pub fn freshness(water_date: NaiveDateTime, now: NaiveDateTime) -> f64 {
    let minutes = (now - water_date).num_minutes();
    if minutes <= 0 {
        1.0
    } else if minutes > FRESHNESS_WINDOW_MINUTES {
        0.0
    } else {
        1.0 - minutes as f64 / FRESHNESS_WINDOW_MINUTES as f64
    }
}

/// One marker on the nearby-users map: a user's most recent drink.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPin {
    pub user_id: UserId,
    pub user_name: String,
    pub photo_url: Option<String>,
    pub comment: Option<String>,
    pub water_amount: i64,
    pub water_date: NaiveDateTime,
    pub lat: f64,
    pub lon: f64,
}

/// Join each user to their latest record by `water_date`. On equal dates the
/// record seen first wins. Users with no record get no pin.
pub fn map_pins(users: &[User], records: &[WaterRecord]) -> Vec<MapPin> {
    let mut latest: HashMap<UserId, &WaterRecord> = HashMap::new();
    for record in records {
        latest
            .entry(record.user_id)
            .and_modify(|current| {
                if record.water_date > current.water_date {
                    *current = record;
                }
            })
            .or_insert(record);
    }

    users
        .iter()
        .filter_map(|user| {
            let record = latest.get(&user.user_id)?;
            Some(MapPin {
                user_id: user.user_id,
                user_name: user.user_name.clone(),
                photo_url: user.photo_url.clone(),
                comment: record.comment.clone(),
                water_amount: record.water_amount,
                water_date: record.water_date,
                lat: record.lat,
                lon: record.lon,
            })
        })
        .collect()
}
