mod friend;
mod message;
mod post;
mod project;
mod story;
mod user;
mod utils;

use std::time::Duration;

use bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};
use tracing::warn;

use common::config::Config;

pub(crate) use friend::MongoFriend;
pub(crate) use message::MongoMsg;
pub(crate) use post::MongoPost;
pub(crate) use project::MongoProject;
pub(crate) use story::MongoStory;
pub(crate) use user::MongoUser;

pub(crate) const COLL_USER: &str = "users";
pub(crate) const COLL_FRIEND_REQUEST: &str = "friend_requests";
pub(crate) const COLL_MESSAGE: &str = "messages";
pub(crate) const COLL_POST: &str = "posts";
pub(crate) const COLL_STORY: &str = "stories";
pub(crate) const COLL_PROJECT: &str = "projects";

/// stories live for 24 hours
const STORY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub(crate) async fn connect(config: &Config) -> Database {
    Client::with_uri_str(config.db.mongodb.url())
        .await
        .unwrap()
        .database(&config.db.mongodb.database)
}

pub(crate) async fn create_indexes(db: &Database) {
    let indexes = [
        (COLL_USER, IndexModel::builder().keys(doc! {"email": 1}).build()),
        (
            COLL_FRIEND_REQUEST,
            IndexModel::builder().keys(doc! {"sender_id": 1}).build(),
        ),
        (
            COLL_FRIEND_REQUEST,
            IndexModel::builder().keys(doc! {"receiver_id": 1}).build(),
        ),
        (
            COLL_MESSAGE,
            IndexModel::builder()
                .keys(doc! {"sender_id": 1, "receiver_id": 1})
                .build(),
        ),
        (COLL_POST, IndexModel::builder().keys(doc! {"user_id": 1}).build()),
        (
            COLL_STORY,
            IndexModel::builder()
                .keys(doc! {"expire_at": 1})
                .options(IndexOptions::builder().expire_after(STORY_TTL).build())
                .build(),
        ),
    ];

    for (coll, index) in indexes {
        if let Err(e) = db
            .collection::<bson::Document>(coll)
            .create_index(index, None)
            .await
        {
            warn!("create index on {} failed: {:?}", coll, e);
        }
    }
}
