use async_trait::async_trait;

use common::errors::Error;
use common::model::{Comment, CreatePostRequest, Post, User};

#[async_trait]
pub trait PostRepo: Send + Sync {
    /// author name and avatar are copied onto the post at creation time
    async fn create_post(&self, author: &User, req: CreatePostRequest) -> Result<Post, Error>;

    async fn get_post(&self, post_id: &str) -> Result<Option<Post>, Error>;

    /// all posts, newest first
    async fn feed(&self) -> Result<Vec<Post>, Error>;

    async fn get_by_user(&self, user_id: &str) -> Result<Vec<Post>, Error>;

    /// add the user's like, or withdraw it if already present
    async fn toggle_like(&self, post_id: &str, user_id: &str) -> Result<Post, Error>;

    async fn add_comment(&self, post_id: &str, comment: Comment) -> Result<Post, Error>;
}
