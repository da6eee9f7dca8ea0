use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use nanoid::nanoid;

use common::errors::Error;
use common::model::{timestamp, CreateStoryRequest, Story};

use crate::database::mongodb::utils::to_doc;
use crate::database::mongodb::COLL_STORY;
use crate::database::story::StoryRepo;

/// stories are stored as raw documents so the ttl field, a bson date the
/// index requires, stays out of the api model
pub(crate) struct MongoStory {
    coll: Collection<Document>,
}

impl MongoStory {
    pub(crate) fn new(db: Database) -> Self {
        Self {
            coll: db.collection(COLL_STORY),
        }
    }
}

#[async_trait]
impl StoryRepo for MongoStory {
    async fn create_story(&self, user_id: &str, req: CreateStoryRequest) -> Result<Story, Error> {
        let story = Story {
            id: nanoid!(),
            user_id: user_id.to_string(),
            image_url: req.image_url,
            text: req.text,
            create_time: timestamp(),
        };

        let mut doc = to_doc(&story)?;
        doc.insert("expire_at", bson::DateTime::now());
        self.coll.insert_one(doc, None).await?;

        Ok(story)
    }

    async fn get_all(&self) -> Result<Vec<Story>, Error> {
        let options = FindOptions::builder()
            .sort(doc! {"create_time": -1})
            .build();
        let docs: Vec<Document> = self.coll.find(None, options).await?.try_collect().await?;
        docs.into_iter()
            .map(|doc| bson::from_document(doc).map_err(Error::from))
            .collect()
    }
}
