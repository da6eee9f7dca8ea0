use async_trait::async_trait;
use bson::doc;
use futures::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};
use nanoid::nanoid;

use common::errors::Error;
use common::model::{timestamp, CreateProjectRequest, Project};

use crate::database::mongodb::COLL_PROJECT;
use crate::database::project::ProjectRepo;

pub(crate) struct MongoProject {
    coll: Collection<Project>,
}

impl MongoProject {
    pub(crate) fn new(db: Database) -> Self {
        Self {
            coll: db.collection(COLL_PROJECT),
        }
    }
}

#[async_trait]
impl ProjectRepo for MongoProject {
    async fn create_project(
        &self,
        owner_id: &str,
        req: CreateProjectRequest,
    ) -> Result<Project, Error> {
        let project = Project {
            id: nanoid!(),
            owner_id: owner_id.to_string(),
            name: req.name,
            description: req.description,
            experience_level: req.experience_level,
            image: req.image,
            telegram: req.telegram,
            whatsapp: req.whatsapp,
            discord: req.discord,
            // the owner is a member from the start
            members: vec![owner_id.to_string()],
            member_count: 1,
            create_time: timestamp(),
        };
        self.coll.insert_one(&project, None).await?;
        Ok(project)
    }

    async fn get_project(&self, project_id: &str) -> Result<Option<Project>, Error> {
        Ok(self.coll.find_one(doc! {"_id": project_id}, None).await?)
    }

    async fn get_all(&self) -> Result<Vec<Project>, Error> {
        let options = FindOptions::builder()
            .sort(doc! {"create_time": -1})
            .build();
        Ok(self.coll.find(None, options).await?.try_collect().await?)
    }

    async fn get_by_owner(&self, owner_id: &str) -> Result<Vec<Project>, Error> {
        Ok(self
            .coll
            .find(doc! {"owner_id": owner_id}, None)
            .await?
            .try_collect()
            .await?)
    }

    async fn join(&self, project_id: &str, user_id: &str) -> Result<Project, Error> {
        let project = self
            .get_project(project_id)
            .await?
            .ok_or_else(|| Error::not_found_with_details("project not found".to_string()))?;

        if project.members.iter().any(|id| id == user_id) {
            return Err(Error::conflict(
                "you already joined this project".to_string(),
            ));
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.coll
            .find_one_and_update(
                doc! {"_id": project_id},
                doc! {
                    "$addToSet": {"members": user_id},
                    "$inc": {"member_count": 1},
                },
                options,
            )
            .await?
            .ok_or_else(|| Error::not_found_with_details("project not found".to_string()))
    }

    async fn delete_project(&self, project_id: &str) -> Result<bool, Error> {
        let result = self.coll.delete_one(doc! {"_id": project_id}, None).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use common::config::Config;
    use common::errors::ErrorKind;
    use common::model::ExperienceLevel;
    use utils::mongodb_tester::MongoDbTester;

    use super::*;

    struct TestProject {
        repo: MongoProject,
        _tester: MongoDbTester,
    }

    impl TestProject {
        async fn new() -> Self {
            let config = Config::load("../common/fixtures/devconnect.yml").unwrap();
            let mongo = &config.db.mongodb;
            let tester =
                MongoDbTester::new(&mongo.host, mongo.port, &mongo.user, &mongo.password).await;
            let db = tester.database().await;
            Self {
                repo: MongoProject::new(db),
                _tester: tester,
            }
        }
    }

    fn request(name: &str) -> CreateProjectRequest {
        CreateProjectRequest {
            name: name.to_string(),
            description: "a project".to_string(),
            experience_level: ExperienceLevel::Beginner,
            image: String::new(),
            telegram: String::new(),
            whatsapp: String::new(),
            discord: String::new(),
        }
    }

    #[tokio::test]
    #[ignore = "requires a running mongodb"]
    async fn joining_twice_conflicts() {
        let t = TestProject::new().await;
        let project = t.repo.create_project("u1", request("p")).await.unwrap();

        let joined = t.repo.join(&project.id, "u2").await.unwrap();
        assert_eq!(joined.member_count, 2);

        let err = t.repo.join(&project.id, "u2").await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Conflict);
    }
}
