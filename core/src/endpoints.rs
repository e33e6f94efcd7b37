//! URL resolution for every resource the service exposes.

use crate::types::{StampId, UserId, UserStampId, WaterId};

/// Builds absolute endpoint URLs from a base address such as
/// `http://localhost:5000/api/v1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_info(&self, user_id: UserId) -> String {
        format!("{}/users/{user_id}", self.base_url)
    }

    pub fn nearby_users(&self) -> String {
        format!("{}/users/nearby", self.base_url)
    }

    pub fn create_user(&self) -> String {
        format!("{}/users", self.base_url)
    }

    pub fn update_user(&self, user_id: UserId) -> String {
        self.user_info(user_id)
    }

    pub fn water_records(&self, user_id: UserId) -> String {
        format!("{}/water_records/{user_id}", self.base_url)
    }

    pub fn water_records_today(&self, user_id: UserId) -> String {
        format!("{}/water_records/today/{user_id}", self.base_url)
    }

    pub fn water_records_latest(&self, user_id: UserId) -> String {
        format!("{}/water_records/now/{user_id}", self.base_url)
    }

    pub fn create_water_record(&self, user_id: UserId) -> String {
        self.water_records(user_id)
    }

    /// Updates are addressed by record id, not user id.
    pub fn update_water_record(&self, water_id: WaterId) -> String {
        format!("{}/water_records/{water_id}", self.base_url)
    }

    pub fn stamps(&self) -> String {
        format!("{}/stamps", self.base_url)
    }

    pub fn stamp_info(&self, stamp_id: StampId) -> String {
        format!("{}/stamps/{stamp_id}", self.base_url)
    }

    /// Stamps received by `user_id`.
    pub fn stamps_sent(&self, user_id: UserId) -> String {
        format!("{}/stamps/send/{user_id}", self.base_url)
    }

    pub fn send_stamp(&self) -> String {
        format!("{}/stamps/send", self.base_url)
    }

    pub fn respond_stamp(&self, user_stamp_id: UserStampId) -> String {
        format!("{}/stamps/reply/{user_stamp_id}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Endpoints {
        Endpoints::new("http://localhost:5000/api/v1")
    }

    #[test]
    fn user_paths() {
        let e = endpoints();
        assert_eq!(e.user_info(7), "http://localhost:5000/api/v1/users/7");
        assert_eq!(e.nearby_users(), "http://localhost:5000/api/v1/users/nearby");
        assert_eq!(e.create_user(), "http://localhost:5000/api/v1/users");
        assert_eq!(e.update_user(7), e.user_info(7));
    }

    #[test]
    fn water_record_paths() {
        let e = endpoints();
        assert_eq!(e.water_records(42), "http://localhost:5000/api/v1/water_records/42");
        assert_eq!(
            e.water_records_today(42),
            "http://localhost:5000/api/v1/water_records/today/42"
        );
        assert_eq!(
            e.water_records_latest(42),
            "http://localhost:5000/api/v1/water_records/now/42"
        );
        assert_eq!(e.create_water_record(42), e.water_records(42));
        assert_eq!(e.update_water_record(3), "http://localhost:5000/api/v1/water_records/3");
    }

    #[test]
    fn stamp_paths() {
        let e = endpoints();
        assert_eq!(e.stamps(), "http://localhost:5000/api/v1/stamps");
        assert_eq!(e.stamp_info(2), "http://localhost:5000/api/v1/stamps/2");
        assert_eq!(e.stamps_sent(9), "http://localhost:5000/api/v1/stamps/send/9");
        assert_eq!(e.send_stamp(), "http://localhost:5000/api/v1/stamps/send");
        assert_eq!(e.respond_stamp(5), "http://localhost:5000/api/v1/stamps/reply/5");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let e = Endpoints::new("http://localhost:5000/api/v1/");
        assert_eq!(e.base_url(), "http://localhost:5000/api/v1");
        assert_eq!(e.stamps(), "http://localhost:5000/api/v1/stamps");
    }
}
