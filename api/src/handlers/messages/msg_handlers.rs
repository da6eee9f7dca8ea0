use std::collections::HashMap;

use axum::extract::State;
use axum::Json;

use common::errors::Error;
use common::model::{MediaItem, Message, MessageWithUsers, SendMessageRequest, UserBrief};

use crate::api_utils::custom_extract::{ClaimsExtractor, JsonExtractor, PathExtractor};
use crate::handlers::messages::ConversationEntry;
use crate::AppState;

pub async fn send_message(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    JsonExtractor(req): JsonExtractor<SendMessageRequest>,
) -> Result<Json<MessageWithUsers>, Error> {
    if req.text.is_empty() && req.images.is_empty() {
        return Err(Error::bad_request("message is empty".to_string()));
    }
    if req.receiver_id == claims.sub {
        return Err(Error::unprocessable(
            "you cannot message yourself".to_string(),
        ));
    }
    state
        .db
        .user
        .get_user_by_id(&req.receiver_id)
        .await?
        .ok_or_else(|| Error::not_found_with_details("user not found".to_string()))?;

    let stored = state
        .db
        .msg
        .send(&claims.sub, &req.receiver_id, &req.text, req.images)
        .await?;

    // push to any connected devices, both sides
    let resolved = state.hub.deliver(stored).await?;
    Ok(Json(resolved))
}

/// full history with one user; opening it marks their messages as read
pub async fn get_messages(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    PathExtractor(other_id): PathExtractor<String>,
) -> Result<Json<Vec<Message>>, Error> {
    state.db.msg.mark_read(&claims.sub, &other_id).await?;
    let messages = state.db.msg.get_between(&claims.sub, &other_id).await?;
    Ok(Json(messages))
}

pub async fn conversations(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
) -> Result<Json<Vec<ConversationEntry>>, Error> {
    let latest = state.db.msg.conversations(&claims.sub).await?;

    let partner_ids: Vec<String> = latest
        .iter()
        .map(|msg| {
            if msg.sender_id == claims.sub {
                msg.receiver_id.clone()
            } else {
                msg.sender_id.clone()
            }
        })
        .collect();
    let partners: HashMap<String, UserBrief> = state
        .db
        .user
        .get_users_by_ids(&partner_ids)
        .await?
        .iter()
        .map(|user| (user.id.clone(), UserBrief::from(user)))
        .collect();

    let mut entries = Vec::with_capacity(latest.len());
    for msg in latest {
        let partner_id = if msg.sender_id == claims.sub {
            &msg.receiver_id
        } else {
            &msg.sender_id
        };
        let Some(partner) = partners.get(partner_id) else {
            // the partner account was deleted; skip the conversation
            continue;
        };
        // presence is best effort; a cache hiccup must not fail the listing
        let online = state.cache.is_online(partner_id).await.unwrap_or(false);
        entries.push(ConversationEntry {
            partner: partner.clone(),
            online,
            last_message: msg,
        });
    }
    Ok(Json(entries))
}

pub async fn shared_media(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    PathExtractor(other_id): PathExtractor<String>,
) -> Result<Json<Vec<MediaItem>>, Error> {
    let media = state.db.msg.shared_media(&claims.sub, &other_id).await?;
    Ok(Json(media))
}
