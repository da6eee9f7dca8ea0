use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::SinkExt;
use tokio::sync::RwLock;

type ClientSender = Arc<RwLock<SplitSink<WebSocket, Message>>>;

/// one websocket connection; a user may hold several, one per device
pub struct Client {
    pub sender: ClientSender,
    pub user_id: String,
    pub device_id: String,
}

impl Client {
    pub async fn send_text(&self, msg: String) -> Result<(), axum::Error> {
        self.sender.write().await.send(Message::Text(msg)).await
    }
}
