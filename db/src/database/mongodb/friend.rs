use async_trait::async_trait;
use bson::doc;
use futures::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Collection, Database};
use nanoid::nanoid;

use common::errors::Error;
use common::model::{timestamp, FriendRequest, FriendRequestStatus, RespondAction};

use crate::database::friend::FriendRepo;
use crate::database::mongodb::COLL_FRIEND_REQUEST;

pub(crate) struct MongoFriend {
    coll: Collection<FriendRequest>,
}

impl MongoFriend {
    pub(crate) fn new(db: Database) -> Self {
        Self {
            coll: db.collection(COLL_FRIEND_REQUEST),
        }
    }

    /// matches the pair record regardless of which side sent it
    fn pair_filter(user_id: &str, other_id: &str) -> bson::Document {
        doc! {
            "$or": [
                {"sender_id": user_id, "receiver_id": other_id},
                {"sender_id": other_id, "receiver_id": user_id},
            ]
        }
    }

    fn return_after() -> FindOneAndUpdateOptions {
        FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build()
    }
}

#[async_trait]
impl FriendRepo for MongoFriend {
    async fn create_request(
        &self,
        sender_id: &str,
        receiver_id: &str,
    ) -> Result<FriendRequest, Error> {
        match self.get_pair(sender_id, receiver_id).await? {
            Some(existing) => match existing.status {
                FriendRequestStatus::Accepted => {
                    Err(Error::conflict("you are already friends".to_string()))
                }
                FriendRequestStatus::Pending => {
                    Err(Error::conflict("friend request already exists".to_string()))
                }
                // a rejected pair may try again; revive the record so the
                // one-record-per-pair rule still holds
                FriendRequestStatus::Rejected => {
                    let update = doc! {"$set": {
                        "sender_id": sender_id,
                        "receiver_id": receiver_id,
                        "status": "Pending",
                        "update_time": timestamp(),
                    }};
                    self.coll
                        .find_one_and_update(
                            doc! {"_id": &existing.id},
                            update,
                            Self::return_after(),
                        )
                        .await?
                        .ok_or_else(|| Error::not_found())
                }
            },
            None => {
                let now = timestamp();
                let request = FriendRequest {
                    id: nanoid!(),
                    sender_id: sender_id.to_string(),
                    receiver_id: receiver_id.to_string(),
                    status: FriendRequestStatus::Pending,
                    create_time: now,
                    update_time: now,
                };
                self.coll.insert_one(&request, None).await?;
                Ok(request)
            }
        }
    }

    async fn get_request(&self, id: &str) -> Result<Option<FriendRequest>, Error> {
        Ok(self.coll.find_one(doc! {"_id": id}, None).await?)
    }

    async fn get_pair(
        &self,
        user_id: &str,
        other_id: &str,
    ) -> Result<Option<FriendRequest>, Error> {
        Ok(self
            .coll
            .find_one(Self::pair_filter(user_id, other_id), None)
            .await?)
    }

    async fn respond(
        &self,
        id: &str,
        responder_id: &str,
        action: RespondAction,
    ) -> Result<FriendRequest, Error> {
        let request = self
            .get_request(id)
            .await?
            .ok_or_else(|| Error::not_found_with_details("friend request not found".to_string()))?;

        if request.receiver_id != responder_id {
            return Err(Error::forbidden(
                "only the receiver can respond to a friend request".to_string(),
            ));
        }
        if request.status != FriendRequestStatus::Pending {
            return Err(Error::unprocessable(
                "friend request is no longer pending".to_string(),
            ));
        }

        let status: FriendRequestStatus = action.into();
        let update = doc! {"$set": {
            "status": status.to_string(),
            "update_time": timestamp(),
        }};
        self.coll
            .find_one_and_update(doc! {"_id": id}, update, Self::return_after())
            .await?
            .ok_or_else(|| Error::not_found())
    }

    async fn accept_from(&self, user_id: &str, from_id: &str) -> Result<FriendRequest, Error> {
        let filter = doc! {
            "sender_id": from_id,
            "receiver_id": user_id,
            "status": "Pending",
        };
        let update = doc! {"$set": {
            "status": "Accepted",
            "update_time": timestamp(),
        }};
        self.coll
            .find_one_and_update(filter, update, Self::return_after())
            .await?
            .ok_or_else(|| {
                Error::conflict("no pending friend request from this user".to_string())
            })
    }

    async fn delete_pending(&self, sender_id: &str, receiver_id: &str) -> Result<bool, Error> {
        let filter = doc! {
            "sender_id": sender_id,
            "receiver_id": receiver_id,
            "status": "Pending",
        };
        let result = self.coll.delete_one(filter, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_accepted(&self, user_id: &str, other_id: &str) -> Result<bool, Error> {
        let mut filter = Self::pair_filter(user_id, other_id);
        filter.insert("status", "Accepted");
        let result = self.coll.delete_one(filter, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn get_for_user(&self, user_id: &str) -> Result<Vec<FriendRequest>, Error> {
        let filter = doc! {"$or": [{"sender_id": user_id}, {"receiver_id": user_id}]};
        Ok(self.coll.find(filter, None).await?.try_collect().await?)
    }

    async fn get_incoming_pending(&self, user_id: &str) -> Result<Vec<FriendRequest>, Error> {
        let filter = doc! {"receiver_id": user_id, "status": "Pending"};
        Ok(self.coll.find(filter, None).await?.try_collect().await?)
    }

    async fn get_friend_ids(&self, user_id: &str) -> Result<Vec<String>, Error> {
        let filter = doc! {
            "$or": [{"sender_id": user_id}, {"receiver_id": user_id}],
            "status": "Accepted",
        };
        let records: Vec<FriendRequest> =
            self.coll.find(filter, None).await?.try_collect().await?;
        Ok(records
            .iter()
            .map(|fs| fs.counterpart(user_id).to_string())
            .collect())
    }

    async fn get_all_accepted(&self) -> Result<Vec<FriendRequest>, Error> {
        let filter = doc! {"status": "Accepted"};
        Ok(self.coll.find(filter, None).await?.try_collect().await?)
    }
}

#[cfg(test)]
mod tests {
    use common::config::Config;
    use common::errors::ErrorKind;
    use utils::mongodb_tester::MongoDbTester;

    use super::*;

    struct TestFriend {
        repo: MongoFriend,
        _tester: MongoDbTester,
    }

    impl TestFriend {
        async fn new() -> Self {
            let config = Config::load("../common/fixtures/devconnect.yml").unwrap();
            let mongo = &config.db.mongodb;
            let tester =
                MongoDbTester::new(&mongo.host, mongo.port, &mongo.user, &mongo.password).await;
            let db = tester.database().await;
            Self {
                repo: MongoFriend::new(db),
                _tester: tester,
            }
        }
    }

    #[tokio::test]
    #[ignore = "requires a running mongodb"]
    async fn reverse_direction_request_conflicts() {
        let t = TestFriend::new().await;
        t.repo.create_request("alice", "bob").await.unwrap();

        let err = t.repo.create_request("bob", "alice").await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Conflict);
    }

    #[tokio::test]
    #[ignore = "requires a running mongodb"]
    async fn only_receiver_may_respond() {
        let t = TestFriend::new().await;
        let fs = t.repo.create_request("alice", "bob").await.unwrap();

        let err = t
            .repo
            .respond(&fs.id, "alice", RespondAction::Accept)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Forbidden);

        let fs = t
            .repo
            .respond(&fs.id, "bob", RespondAction::Accept)
            .await
            .unwrap();
        assert_eq!(fs.status, FriendRequestStatus::Accepted);

        // a second response hits the no-longer-pending guard
        let err = t
            .repo
            .respond(&fs.id, "bob", RespondAction::Reject)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Unprocessable);
    }

    #[tokio::test]
    #[ignore = "requires a running mongodb"]
    async fn accept_from_links_both_sides() {
        let t = TestFriend::new().await;
        t.repo.create_request("alice", "bob").await.unwrap();

        let fs = t.repo.accept_from("bob", "alice").await.unwrap();
        assert_eq!(fs.status, FriendRequestStatus::Accepted);

        assert_eq!(t.repo.get_friend_ids("alice").await.unwrap(), vec!["bob"]);
        assert_eq!(t.repo.get_friend_ids("bob").await.unwrap(), vec!["alice"]);
    }

    #[tokio::test]
    #[ignore = "requires a running mongodb"]
    async fn accept_without_pending_conflicts() {
        let t = TestFriend::new().await;

        let err = t.repo.accept_from("bob", "alice").await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Conflict);

        // an already-accepted pair is no longer pending either
        t.repo.create_request("alice", "bob").await.unwrap();
        t.repo.accept_from("bob", "alice").await.unwrap();
        let err = t.repo.accept_from("bob", "alice").await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Conflict);
    }

    #[tokio::test]
    #[ignore = "requires a running mongodb"]
    async fn declined_request_returns_pair_to_none() {
        let t = TestFriend::new().await;
        t.repo.create_request("alice", "bob").await.unwrap();

        // delete_pending is direction-sensitive; the receiver declines
        // the inbound record, so the sender/receiver order must match
        assert!(!t.repo.delete_pending("bob", "alice").await.unwrap());
        assert!(t.repo.delete_pending("alice", "bob").await.unwrap());

        assert!(t.repo.get_pair("alice", "bob").await.unwrap().is_none());
        assert!(t.repo.get_pair("bob", "alice").await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires a running mongodb"]
    async fn rejected_pair_can_try_again() {
        let t = TestFriend::new().await;
        let fs = t.repo.create_request("alice", "bob").await.unwrap();
        t.repo
            .respond(&fs.id, "bob", RespondAction::Reject)
            .await
            .unwrap();

        // bob now sends one the other way; the pair still has one record
        let revived = t.repo.create_request("bob", "alice").await.unwrap();
        assert_eq!(revived.id, fs.id);
        assert_eq!(revived.sender_id, "bob");
        assert_eq!(revived.status, FriendRequestStatus::Pending);
    }

    #[tokio::test]
    #[ignore = "requires a running mongodb"]
    async fn delete_accepted_is_idempotent() {
        let t = TestFriend::new().await;
        t.repo.create_request("alice", "bob").await.unwrap();
        t.repo.accept_from("bob", "alice").await.unwrap();

        assert!(t.repo.delete_accepted("bob", "alice").await.unwrap());
        assert!(!t.repo.delete_accepted("bob", "alice").await.unwrap());
        assert!(t.repo.get_friend_ids("alice").await.unwrap().is_empty());
    }
}
