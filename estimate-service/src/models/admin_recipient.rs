use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A staff member linked for chat-memo notifications.
///
/// Keyed by `role` ("owner", "boss", ...); the stored refresh token is
/// exchanged for a short-lived access token at send time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRecipient {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub role: String,
    pub refresh_token: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_utc: DateTime<Utc>,
}

impl AdminRecipient {
    pub fn new(role: String, refresh_token: String) -> Self {
        Self {
            id: None,
            role,
            refresh_token,
            updated_utc: Utc::now(),
        }
    }
}
