use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};

use common::errors::Error;
use common::model::{timestamp, User, UserUpdate};

use crate::database::mongodb::COLL_USER;
use crate::database::user::UserRepo;

/// search results are capped so a broad term cannot dump the whole table
const SEARCH_LIMIT: i64 = 50;

pub(crate) struct MongoUser {
    coll: Collection<User>,
}

impl MongoUser {
    pub(crate) fn new(db: Database) -> Self {
        Self {
            coll: db.collection(COLL_USER),
        }
    }
}

/// a profile counts as completed once the onboarding fields are all set
fn profile_completed(user: &User) -> bool {
    !user.profile_name.is_empty() && !user.town.is_empty() && !user.gender.is_empty()
}

#[async_trait]
impl UserRepo for MongoUser {
    async fn create_user(&self, user: User) -> Result<User, Error> {
        let taken = self
            .coll
            .find_one(
                doc! {"$or": [{"email": &user.email}, {"username": &user.username}]},
                None,
            )
            .await?;
        if taken.is_some() {
            return Err(Error::conflict(
                "email or username already in use".to_string(),
            ));
        }

        self.coll.insert_one(&user, None).await?;
        Ok(user)
    }

    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>, Error> {
        Ok(self.coll.find_one(doc! {"_id": user_id}, None).await?)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        Ok(self.coll.find_one(doc! {"email": email}, None).await?)
    }

    async fn get_users_by_ids(&self, user_ids: &[String]) -> Result<Vec<User>, Error> {
        let filter = doc! {"_id": {"$in": user_ids}};
        Ok(self.coll.find(filter, None).await?.try_collect().await?)
    }

    async fn get_all_except(&self, user_id: &str) -> Result<Vec<User>, Error> {
        let filter = doc! {"_id": {"$ne": user_id}};
        Ok(self.coll.find(filter, None).await?.try_collect().await?)
    }

    async fn search_users(&self, term: &str) -> Result<Vec<User>, Error> {
        let regex = doc! {"$regex": term, "$options": "i"};
        let filter = doc! {
            "$or": [
                {"username": regex.clone()},
                {"email": regex.clone()},
                {"profile_name": regex},
            ]
        };
        let options = FindOptions::builder().limit(SEARCH_LIMIT).build();
        Ok(self.coll.find(filter, options).await?.try_collect().await?)
    }

    async fn update_profile(&self, user_id: &str, update: UserUpdate) -> Result<User, Error> {
        let mut set = Document::new();
        if let Some(profile_name) = update.profile_name {
            set.insert("profile_name", profile_name);
        }
        if let Some(town) = update.town {
            set.insert("town", town);
        }
        if let Some(place_of_birth) = update.place_of_birth {
            set.insert("place_of_birth", place_of_birth);
        }
        if let Some(gender) = update.gender {
            set.insert("gender", gender);
        }
        if let Some(bio) = update.bio {
            set.insert("bio", bio);
        }
        if let Some(avatar) = update.avatar {
            set.insert("avatar", avatar);
        }
        set.insert("update_time", timestamp());

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let user = self
            .coll
            .find_one_and_update(doc! {"_id": user_id}, doc! {"$set": set}, options)
            .await?
            .ok_or_else(|| Error::not_found_with_details("user not found".to_string()))?;

        // the flag follows the fields, both ways
        let completed = profile_completed(&user);
        if completed != user.is_profile_completed {
            self.coll
                .update_one(
                    doc! {"_id": user_id},
                    doc! {"$set": {"is_profile_completed": completed}},
                    None,
                )
                .await?;
        }

        Ok(User {
            is_profile_completed: completed,
            ..user
        })
    }

    async fn set_premium(&self, user_id: &str) -> Result<User, Error> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.coll
            .find_one_and_update(
                doc! {"_id": user_id},
                doc! {"$set": {"is_premium": true, "update_time": timestamp()}},
                options,
            )
            .await?
            .ok_or_else(|| Error::not_found_with_details("user not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use common::config::Config;
    use common::errors::ErrorKind;
    use utils::mongodb_tester::MongoDbTester;

    use super::*;

    fn user(id: &str, username: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            ..Default::default()
        }
    }

    struct TestUser {
        repo: MongoUser,
        _tester: MongoDbTester,
    }

    impl TestUser {
        async fn new() -> Self {
            let config = Config::load("../common/fixtures/devconnect.yml").unwrap();
            let mongo = &config.db.mongodb;
            let tester =
                MongoDbTester::new(&mongo.host, mongo.port, &mongo.user, &mongo.password).await;
            let db = tester.database().await;
            Self {
                repo: MongoUser::new(db),
                _tester: tester,
            }
        }
    }

    #[test]
    fn profile_completed_requires_all_onboarding_fields() {
        let mut u = user("u1", "alice", "alice@mail.com");
        assert!(!profile_completed(&u));

        u.profile_name = "Alice".to_string();
        u.town = "Berlin".to_string();
        assert!(!profile_completed(&u));

        u.gender = "female".to_string();
        assert!(profile_completed(&u));
    }

    #[tokio::test]
    #[ignore = "requires a running mongodb"]
    async fn duplicate_email_or_username_conflicts() {
        let t = TestUser::new().await;
        t.repo
            .create_user(user("u1", "alice", "alice@mail.com"))
            .await
            .unwrap();

        let err = t
            .repo
            .create_user(user("u2", "alice2", "alice@mail.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Conflict);

        let err = t
            .repo
            .create_user(user("u3", "alice", "other@mail.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Conflict);
    }

    #[tokio::test]
    #[ignore = "requires a running mongodb"]
    async fn update_profile_flips_completed_flag() {
        let t = TestUser::new().await;
        t.repo
            .create_user(user("u1", "alice", "alice@mail.com"))
            .await
            .unwrap();

        let updated = t
            .repo
            .update_profile(
                "u1",
                UserUpdate {
                    profile_name: Some("Alice".to_string()),
                    town: Some("Berlin".to_string()),
                    gender: Some("female".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.is_profile_completed);

        let stored = t.repo.get_user_by_id("u1").await.unwrap().unwrap();
        assert!(stored.is_profile_completed);
    }
}
