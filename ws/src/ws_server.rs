use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures::{SinkExt, StreamExt};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use common::errors::Error;
use utils::claims::verify_token;

use crate::client::Client;
use crate::manager::Manager;

pub const HEART_BEAT_INTERVAL: u64 = 30;

#[derive(Clone)]
struct WsState {
    manager: Manager,
    jwt_secret: String,
}

/// the realtime endpoint; the token travels in the path because browsers
/// cannot set headers on a websocket handshake
pub fn router(manager: Manager, jwt_secret: String) -> Router {
    Router::new()
        .route("/ws/:user_id/conn/:token/:device_id", get(websocket_handler))
        .with_state(WsState {
            manager,
            jwt_secret,
        })
}

fn verify_conn(user_id: &str, token: &str, jwt_secret: &str) -> Result<(), Error> {
    let claims = verify_token(token, jwt_secret)?;
    if claims.sub != user_id {
        return Err(Error::unauthorized_with_details(
            "token does not belong to this user".to_string(),
        ));
    }
    Ok(())
}

async fn websocket_handler(
    Path((user_id, token, device_id)): Path<(String, String, String)>,
    ws: WebSocketUpgrade,
    State(state): State<WsState>,
) -> Result<impl IntoResponse, Error> {
    verify_conn(&user_id, &token, &state.jwt_secret)?;
    Ok(ws.on_upgrade(move |socket| websocket(user_id, device_id, socket, state)))
}

async fn websocket(user_id: String, device_id: String, ws: WebSocket, state: WsState) {
    info!("client connected, user id: {}", user_id);
    let mut hub = state.manager.clone();
    let (ws_tx, mut ws_rx) = ws.split();
    let shared_tx = Arc::new(RwLock::new(ws_tx));
    let client = Client {
        user_id: user_id.clone(),
        device_id: device_id.clone(),
        sender: shared_tx.clone(),
    };
    hub.register(user_id.clone(), client).await;

    // send ping message to client
    let cloned_tx = shared_tx.clone();
    let mut ping_task = tokio::spawn(async move {
        loop {
            if let Err(e) = cloned_tx
                .write()
                .await
                .send(Message::Ping(Vec::new()))
                .await
            {
                error!("send ping error: {:?}", e);
                // break this task, it will end this conn
                break;
            }
            tokio::time::sleep(Duration::from_secs(HEART_BEAT_INTERVAL)).await;
        }
    });

    // receive message from client
    let cloned_hub = hub.clone();
    let sender_id = user_id.clone();
    let shared_tx = shared_tx.clone();
    let mut rec_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_rx.next().await {
            match msg {
                Message::Text(text) => {
                    let result = serde_json::from_str(&text);
                    if result.is_err() {
                        error!("deserialize error: {:?}; source: {text}", result.err());
                        continue;
                    }

                    if cloned_hub
                        .broadcast(sender_id.clone(), result.unwrap())
                        .await
                        .is_err()
                    {
                        // if broadcast not available, close the connection
                        break;
                    }
                }
                Message::Ping(_) => {
                    if let Err(e) = shared_tx
                        .write()
                        .await
                        .send(Message::Pong(Vec::new()))
                        .await
                    {
                        error!("reply ping error: {:?}", e);
                        break;
                    }
                }
                Message::Pong(_) => {}
                Message::Close(info) => {
                    if let Some(info) = info {
                        warn!("client closed {}", info.reason);
                    }
                    break;
                }
                Message::Binary(_) => {
                    debug!("binary frames are not part of the protocol");
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut ping_task) => rec_task.abort(),
        _ = (&mut rec_task) => ping_task.abort(),
    }

    // lost the connection, remove the client from hub
    hub.unregister(user_id, device_id).await;
    debug!("client thread exit {}", hub.hub.iter().count());
}
