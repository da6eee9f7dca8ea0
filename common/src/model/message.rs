use serde::{Deserialize, Serialize};

use crate::model::UserBrief;

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub delivered: bool,
    pub create_time: i64,
}

/// message resolved with both participants, the shape clients receive
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct MessageWithUsers {
    #[serde(flatten)]
    pub message: Message,
    pub sender: UserBrief,
    pub receiver: UserBrief,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SendMessageRequest {
    pub receiver_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// one shared image in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    pub url: String,
    pub create_time: i64,
}

/// events pushed over the websocket; delivery is fire-and-forget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum WsEvent {
    /// a new message for the receiver's room
    NewMessage(Box<MessageWithUsers>),
    /// confirmation echoed to the sender's room
    MessageSent(Box<MessageWithUsers>),
}

/// inbound frame a connected client may send instead of the http endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientMessage {
    pub receiver_id: String,
    #[serde(default)]
    pub text: String,
}
