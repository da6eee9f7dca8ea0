mod msg_handlers;

pub(crate) use msg_handlers::*;

use serde::Serialize;

use common::model::{Message, UserBrief};

/// one entry per chat partner, carrying the newest message exchanged
/// and whether the partner currently has a socket connected
#[derive(Debug, Serialize)]
pub struct ConversationEntry {
    pub partner: UserBrief,
    pub online: bool,
    pub last_message: Message,
}
