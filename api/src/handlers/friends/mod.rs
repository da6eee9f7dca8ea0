mod friend_handlers;

pub(crate) use friend_handlers::*;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateFriendRequest {
    pub receiver_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub action: String,
}
