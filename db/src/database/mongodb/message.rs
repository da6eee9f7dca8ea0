use std::collections::HashSet;

use async_trait::async_trait;
use bson::doc;
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use nanoid::nanoid;

use common::errors::Error;
use common::model::{timestamp, MediaItem, Message};

use crate::database::message::MsgRepo;
use crate::database::mongodb::COLL_MESSAGE;

pub(crate) struct MongoMsg {
    coll: Collection<Message>,
}

impl MongoMsg {
    pub(crate) fn new(db: Database) -> Self {
        Self {
            coll: db.collection(COLL_MESSAGE),
        }
    }

    fn between_filter(user_id: &str, other_id: &str) -> bson::Document {
        doc! {
            "$or": [
                {"sender_id": user_id, "receiver_id": other_id},
                {"sender_id": other_id, "receiver_id": user_id},
            ]
        }
    }
}

/// keep only the first message seen per counterpart; input must already be
/// sorted newest first
fn latest_per_counterpart(user_id: &str, messages: Vec<Message>) -> Vec<Message> {
    let mut seen = HashSet::new();
    messages
        .into_iter()
        .filter(|msg| {
            let other = if msg.sender_id == user_id {
                &msg.receiver_id
            } else {
                &msg.sender_id
            };
            seen.insert(other.clone())
        })
        .collect()
}

#[async_trait]
impl MsgRepo for MongoMsg {
    async fn send(
        &self,
        sender_id: &str,
        receiver_id: &str,
        text: &str,
        images: Vec<String>,
    ) -> Result<Message, Error> {
        let message = Message {
            id: nanoid!(),
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            text: text.to_string(),
            images,
            is_read: false,
            delivered: false,
            create_time: timestamp(),
        };
        self.coll.insert_one(&message, None).await?;
        Ok(message)
    }

    async fn get_between(&self, user_id: &str, other_id: &str) -> Result<Vec<Message>, Error> {
        let options = FindOptions::builder()
            .sort(doc! {"create_time": 1})
            .build();
        Ok(self
            .coll
            .find(Self::between_filter(user_id, other_id), options)
            .await?
            .try_collect()
            .await?)
    }

    async fn mark_read(&self, user_id: &str, other_id: &str) -> Result<(), Error> {
        let filter = doc! {
            "sender_id": other_id,
            "receiver_id": user_id,
            "is_read": false,
        };
        self.coll
            .update_many(filter, doc! {"$set": {"is_read": true}}, None)
            .await?;
        Ok(())
    }

    async fn conversations(&self, user_id: &str) -> Result<Vec<Message>, Error> {
        let filter = doc! {"$or": [{"sender_id": user_id}, {"receiver_id": user_id}]};
        let options = FindOptions::builder()
            .sort(doc! {"create_time": -1})
            .build();
        let messages: Vec<Message> = self
            .coll
            .find(filter, options)
            .await?
            .try_collect()
            .await?;
        Ok(latest_per_counterpart(user_id, messages))
    }

    async fn shared_media(&self, user_id: &str, other_id: &str) -> Result<Vec<MediaItem>, Error> {
        let mut filter = Self::between_filter(user_id, other_id);
        filter.insert("images.0", doc! {"$exists": true});
        let options = FindOptions::builder()
            .sort(doc! {"create_time": -1})
            .build();
        let messages: Vec<Message> = self
            .coll
            .find(filter, options)
            .await?
            .try_collect()
            .await?;

        Ok(messages
            .into_iter()
            .flat_map(|msg| {
                msg.images
                    .into_iter()
                    .map(move |url| MediaItem {
                        url,
                        create_time: msg.create_time,
                    })
                    .collect::<Vec<_>>()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: &str, sender: &str, receiver: &str, ts: i64) -> Message {
        Message {
            id: id.to_string(),
            sender_id: sender.to_string(),
            receiver_id: receiver.to_string(),
            text: String::new(),
            images: vec![],
            is_read: false,
            delivered: false,
            create_time: ts,
        }
    }

    #[test]
    fn latest_per_counterpart_keeps_newest_each_pair() {
        // newest first, the order the query returns
        let messages = vec![
            msg("m4", "bob", "alice", 40),
            msg("m3", "alice", "bob", 30),
            msg("m2", "carol", "alice", 20),
            msg("m1", "alice", "carol", 10),
        ];

        let latest = latest_per_counterpart("alice", messages);
        let ids: Vec<&str> = latest.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m4", "m2"]);
    }
}
