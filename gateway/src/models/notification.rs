use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::core::Id;

/// Event type of the notification the relation service emits for a new follower
pub const FOLLOW_CREATED: &str = "follow_created";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Notification {
    pub id: Id,
    pub user_id: Id,
    #[serde(rename = "type")]
    pub notification_type: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct SendNotificationRequest {
    pub user_id: Id,
    #[serde(rename = "type")]
    pub notification_type: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct SendNotificationResponse {
    pub notification_id: Id,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct NotificationFeed {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub total_pages: i64,
}

impl NotificationFeed {
    pub fn of_type<'a>(&'a self, notification_type: &'a str) -> impl Iterator<Item = &'a Notification> {
        self.notifications
            .iter()
            .filter(move |n| n.notification_type == notification_type)
    }
}
