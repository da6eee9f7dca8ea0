use async_trait::async_trait;
use bson::doc;
use futures::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};
use nanoid::nanoid;

use common::errors::Error;
use common::model::{timestamp, Comment, CreatePostRequest, Post, User};

use crate::database::mongodb::utils::to_doc;
use crate::database::mongodb::COLL_POST;
use crate::database::post::PostRepo;

pub(crate) struct MongoPost {
    coll: Collection<Post>,
}

impl MongoPost {
    pub(crate) fn new(db: Database) -> Self {
        Self {
            coll: db.collection(COLL_POST),
        }
    }

    fn return_after() -> FindOneAndUpdateOptions {
        FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build()
    }

    fn newest_first() -> FindOptions {
        FindOptions::builder().sort(doc! {"create_time": -1}).build()
    }
}

#[async_trait]
impl PostRepo for MongoPost {
    async fn create_post(&self, author: &User, req: CreatePostRequest) -> Result<Post, Error> {
        let post = Post {
            id: nanoid!(),
            user_id: author.id.clone(),
            username: author.username.clone(),
            avatar: author.avatar.clone(),
            text: req.text,
            images: req.images,
            likes: vec![],
            comments: vec![],
            create_time: timestamp(),
        };
        self.coll.insert_one(&post, None).await?;
        Ok(post)
    }

    async fn get_post(&self, post_id: &str) -> Result<Option<Post>, Error> {
        Ok(self.coll.find_one(doc! {"_id": post_id}, None).await?)
    }

    async fn feed(&self) -> Result<Vec<Post>, Error> {
        Ok(self
            .coll
            .find(None, Self::newest_first())
            .await?
            .try_collect()
            .await?)
    }

    async fn get_by_user(&self, user_id: &str) -> Result<Vec<Post>, Error> {
        Ok(self
            .coll
            .find(doc! {"user_id": user_id}, Self::newest_first())
            .await?
            .try_collect()
            .await?)
    }

    async fn toggle_like(&self, post_id: &str, user_id: &str) -> Result<Post, Error> {
        let post = self
            .get_post(post_id)
            .await?
            .ok_or_else(|| Error::not_found_with_details("post not found".to_string()))?;

        let update = if post.likes.iter().any(|id| id == user_id) {
            doc! {"$pull": {"likes": user_id}}
        } else {
            doc! {"$addToSet": {"likes": user_id}}
        };

        self.coll
            .find_one_and_update(doc! {"_id": post_id}, update, Self::return_after())
            .await?
            .ok_or_else(|| Error::not_found_with_details("post not found".to_string()))
    }

    async fn add_comment(&self, post_id: &str, comment: Comment) -> Result<Post, Error> {
        let update = doc! {"$push": {"comments": to_doc(&comment)?}};
        self.coll
            .find_one_and_update(doc! {"_id": post_id}, update, Self::return_after())
            .await?
            .ok_or_else(|| Error::not_found_with_details("post not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use common::config::Config;
    use utils::mongodb_tester::MongoDbTester;

    use super::*;

    struct TestPost {
        repo: MongoPost,
        _tester: MongoDbTester,
    }

    impl TestPost {
        async fn new() -> Self {
            let config = Config::load("../common/fixtures/devconnect.yml").unwrap();
            let mongo = &config.db.mongodb;
            let tester =
                MongoDbTester::new(&mongo.host, mongo.port, &mongo.user, &mongo.password).await;
            let db = tester.database().await;
            Self {
                repo: MongoPost::new(db),
                _tester: tester,
            }
        }
    }

    #[tokio::test]
    #[ignore = "requires a running mongodb"]
    async fn like_toggles_on_and_off() {
        let t = TestPost::new().await;
        let author = User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            ..Default::default()
        };
        let post = t
            .repo
            .create_post(&author, CreatePostRequest::default())
            .await
            .unwrap();

        let liked = t.repo.toggle_like(&post.id, "u2").await.unwrap();
        assert_eq!(liked.likes, vec!["u2"]);

        let unliked = t.repo.toggle_like(&post.id, "u2").await.unwrap();
        assert!(unliked.likes.is_empty());
    }
}
