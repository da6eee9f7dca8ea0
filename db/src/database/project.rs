use async_trait::async_trait;

use common::errors::Error;
use common::model::{CreateProjectRequest, Project};

#[async_trait]
pub trait ProjectRepo: Send + Sync {
    async fn create_project(
        &self,
        owner_id: &str,
        req: CreateProjectRequest,
    ) -> Result<Project, Error>;

    async fn get_project(&self, project_id: &str) -> Result<Option<Project>, Error>;

    async fn get_all(&self) -> Result<Vec<Project>, Error>;

    async fn get_by_owner(&self, owner_id: &str) -> Result<Vec<Project>, Error>;

    /// add the user to the member list; joining twice is a conflict
    async fn join(&self, project_id: &str, user_id: &str) -> Result<Project, Error>;

    async fn delete_project(&self, project_id: &str) -> Result<bool, Error>;
}
