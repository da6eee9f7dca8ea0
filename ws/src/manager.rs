use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use cache::Cache;
use common::errors::Error;
use common::model::{ClientMessage, Message, MessageWithUsers, UserBrief, WsEvent};
use db::DbRepo;

use crate::client::Client;

type UserID = String;
type DeviceID = String;
/// connected clients, grouped by user
type Hub = Arc<DashMap<UserID, DashMap<DeviceID, Client>>>;

/// owns the client hub; everything that wants to push to a connected user
/// goes through here
#[derive(Clone)]
pub struct Manager {
    tx: mpsc::Sender<(String, ClientMessage)>,
    pub hub: Hub,
    cache: Arc<dyn Cache>,
    db: Arc<DbRepo>,
}

impl Manager {
    pub fn new(
        tx: mpsc::Sender<(String, ClientMessage)>,
        cache: Arc<dyn Cache>,
        db: Arc<DbRepo>,
    ) -> Self {
        Manager {
            tx,
            hub: Arc::new(DashMap::new()),
            cache,
            db,
        }
    }

    /// resolve the participants and push the event pair: the receiver gets
    /// the message, the sender gets the delivery echo. both sends are
    /// fire-and-forget
    pub async fn deliver(&self, message: Message) -> Result<MessageWithUsers, Error> {
        let ids = [message.sender_id.clone(), message.receiver_id.clone()];
        let users = self.db.user.get_users_by_ids(&ids).await?;
        let brief = |id: &str| -> Result<UserBrief, Error> {
            users
                .iter()
                .find(|u| u.id == id)
                .map(UserBrief::from)
                .ok_or_else(|| Error::not_found_with_details(format!("user {id} not found")))
        };

        let resolved = MessageWithUsers {
            sender: brief(&message.sender_id)?,
            receiver: brief(&message.receiver_id)?,
            message,
        };

        let event = WsEvent::NewMessage(Box::new(resolved.clone()));
        self.send_event(&resolved.message.receiver_id, &event).await;

        let echo = WsEvent::MessageSent(Box::new(resolved.clone()));
        self.send_event(&resolved.message.sender_id, &echo).await;

        Ok(resolved)
    }

    pub async fn send_event(&self, user_id: &str, event: &WsEvent) {
        if let Some(clients) = self.hub.get(user_id) {
            self.send_to_clients(&clients, event).await;
        }
    }

    async fn send_to_clients(&self, clients: &DashMap<DeviceID, Client>, event: &WsEvent) {
        let content = match serde_json::to_string(event) {
            Ok(content) => content,
            Err(e) => {
                error!("serialize event error: {:?}", e);
                return;
            }
        };
        for client in clients.iter() {
            if let Err(e) = client.value().send_text(content.clone()).await {
                error!("event send error: {:?}", e);
            }
        }
    }

    pub async fn register(&mut self, id: String, client: Client) {
        if let Some(cli) = self.hub.get_mut(&id) {
            cli.insert(client.device_id.clone(), client);
        } else {
            let dash_map = DashMap::new();
            dash_map.insert(client.device_id.clone(), client);
            self.hub.insert(id.clone(), dash_map);
        }
        if let Err(e) = self.cache.user_online(&id).await {
            error!("mark online error: {:?}", e);
        }
        if let Ok(count) = self.cache.online_count().await {
            debug!("{} users online", count);
        }
    }

    pub async fn unregister(&mut self, id: String, device_id: String) {
        let mut last_one = false;
        if let Some(clients) = self.hub.get_mut(&id) {
            if clients.len() == 1 {
                last_one = true;
            } else {
                clients.remove(&device_id);
            }
        };
        if last_one {
            self.hub.remove(&id);
            if let Err(e) = self.cache.user_offline(&id).await {
                error!("mark offline error: {:?}", e);
            }
        }
        debug!("unregister client: {:?}", id);
    }

    /// messages sent over the socket instead of the http endpoint; they are
    /// persisted first and then pushed like any other
    pub async fn run(&mut self, mut receiver: mpsc::Receiver<(String, ClientMessage)>) {
        info!("manager start");
        while let Some((sender_id, client_msg)) = receiver.recv().await {
            debug!("receive message: {:?}", client_msg);
            let stored = match self
                .db
                .msg
                .send(&sender_id, &client_msg.receiver_id, &client_msg.text, vec![])
                .await
            {
                Ok(stored) => stored,
                Err(e) => {
                    error!("store message error: {:?}", e);
                    continue;
                }
            };

            if let Err(e) = self.deliver(stored).await {
                error!("deliver message error: {:?}", e);
            }
        }
    }

    pub async fn broadcast(&self, sender_id: String, msg: ClientMessage) -> Result<(), Error> {
        self.tx
            .send((sender_id, msg))
            .await
            .map_err(|e| Error::broadcast(e.to_string()))
    }
}
