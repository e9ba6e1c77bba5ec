use serde::{Deserialize, Serialize};

/// An in-app notification (friend requests, herd invites, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppNotification {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "senderId")]
    pub sender_id: String,
    #[serde(rename = "recipientId")]
    pub recipient_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub read: bool,
    pub message: String,
}

/// Number of notifications not yet marked read.
pub fn unread_count(notifications: &[AppNotification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}
