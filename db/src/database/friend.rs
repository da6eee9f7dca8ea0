use async_trait::async_trait;

use common::errors::Error;
use common::model::{FriendRequest, RespondAction};

/// the relationship store; one record per unordered user pair.
///
/// every lookup that takes two users matches both orders of the pair, so a
/// second request in the opposite direction can never coexist with the first
#[async_trait]
pub trait FriendRepo: Send + Sync {
    /// create a pending request from sender to receiver.
    ///
    /// a pending or accepted record for the pair, in either direction, is a
    /// conflict; a rejected record is revived as a fresh pending request in
    /// the new direction
    async fn create_request(&self, sender_id: &str, receiver_id: &str)
        -> Result<FriendRequest, Error>;

    async fn get_request(&self, id: &str) -> Result<Option<FriendRequest>, Error>;

    /// the single record for the pair, whichever direction it was sent in
    async fn get_pair(&self, user_id: &str, other_id: &str)
        -> Result<Option<FriendRequest>, Error>;

    /// accept or reject a pending request by id; only the receiver may
    /// respond, and only while the request is still pending
    async fn respond(
        &self,
        id: &str,
        responder_id: &str,
        action: RespondAction,
    ) -> Result<FriendRequest, Error>;

    /// accept the pending request sent by `from_id` to `user_id`
    async fn accept_from(&self, user_id: &str, from_id: &str) -> Result<FriendRequest, Error>;

    /// remove the pending request with exactly this direction; returns
    /// whether one existed
    async fn delete_pending(&self, sender_id: &str, receiver_id: &str) -> Result<bool, Error>;

    /// dissolve an accepted friendship; returns whether one existed
    async fn delete_accepted(&self, user_id: &str, other_id: &str) -> Result<bool, Error>;

    /// every record the user participates in, any status
    async fn get_for_user(&self, user_id: &str) -> Result<Vec<FriendRequest>, Error>;

    /// pending requests addressed to the user
    async fn get_incoming_pending(&self, user_id: &str) -> Result<Vec<FriendRequest>, Error>;

    /// ids of the user's accepted friends
    async fn get_friend_ids(&self, user_id: &str) -> Result<Vec<String>, Error>;

    /// every accepted edge in the graph, for mutual-friend computation
    async fn get_all_accepted(&self) -> Result<Vec<FriendRequest>, Error>;
}
