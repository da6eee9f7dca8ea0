use async_trait::async_trait;

use common::errors::Error;
use common::model::{MediaItem, Message};

#[async_trait]
pub trait MsgRepo: Send + Sync {
    async fn send(
        &self,
        sender_id: &str,
        receiver_id: &str,
        text: &str,
        images: Vec<String>,
    ) -> Result<Message, Error>;

    /// full history between two users, oldest first
    async fn get_between(&self, user_id: &str, other_id: &str) -> Result<Vec<Message>, Error>;

    /// mark everything the other user sent as read
    async fn mark_read(&self, user_id: &str, other_id: &str) -> Result<(), Error>;

    /// the newest message of each conversation the user is in, newest
    /// conversation first
    async fn conversations(&self, user_id: &str) -> Result<Vec<Message>, Error>;

    /// every image exchanged between the two users, newest first
    async fn shared_media(&self, user_id: &str, other_id: &str) -> Result<Vec<MediaItem>, Error>;
}
