use async_trait::async_trait;

use common::errors::Error;
use common::model::{CreateStoryRequest, Story};

#[async_trait]
pub trait StoryRepo: Send + Sync {
    async fn create_story(&self, user_id: &str, req: CreateStoryRequest) -> Result<Story, Error>;

    /// all live stories, newest first; expiry is handled by a ttl index
    async fn get_all(&self) -> Result<Vec<Story>, Error>;
}
