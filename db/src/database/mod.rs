pub(crate) mod friend;
pub(crate) mod message;
mod mongodb;
pub(crate) mod post;
pub(crate) mod project;
pub(crate) mod story;
pub(crate) mod user;

use common::config::Config;

use crate::database::friend::FriendRepo;
use crate::database::message::MsgRepo;
use crate::database::post::PostRepo;
use crate::database::project::ProjectRepo;
use crate::database::story::StoryRepo;
use crate::database::user::UserRepo;

/// one handle per collection family, all backed by the same mongodb database
pub struct DbRepo {
    pub user: Box<dyn UserRepo>,
    pub friend: Box<dyn FriendRepo>,
    pub msg: Box<dyn MsgRepo>,
    pub post: Box<dyn PostRepo>,
    pub story: Box<dyn StoryRepo>,
    pub project: Box<dyn ProjectRepo>,
}

impl DbRepo {
    pub async fn from_config(config: &Config) -> Self {
        let db = mongodb::connect(config).await;
        Self::from_database(db).await
    }

    pub async fn from_database(db: ::mongodb::Database) -> Self {
        mongodb::create_indexes(&db).await;

        Self {
            user: Box::new(mongodb::MongoUser::new(db.clone())),
            friend: Box::new(mongodb::MongoFriend::new(db.clone())),
            msg: Box::new(mongodb::MongoMsg::new(db.clone())),
            post: Box::new(mongodb::MongoPost::new(db.clone())),
            story: Box::new(mongodb::MongoStory::new(db.clone())),
            project: Box::new(mongodb::MongoProject::new(db)),
        }
    }
}
