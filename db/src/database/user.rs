use async_trait::async_trait;

use common::errors::Error;
use common::model::{User, UserUpdate};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// create a new account; email and username must both be unused
    async fn create_user(&self, user: User) -> Result<User, Error>;

    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>, Error>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, Error>;

    async fn get_users_by_ids(&self, user_ids: &[String]) -> Result<Vec<User>, Error>;

    /// everyone except the given user, the raw pool for suggestions
    async fn get_all_except(&self, user_id: &str) -> Result<Vec<User>, Error>;

    /// case-insensitive prefix-or-substring match on username and profile name
    async fn search_users(&self, term: &str) -> Result<Vec<User>, Error>;

    /// apply a partial update and recompute the profile-completed flag
    async fn update_profile(&self, user_id: &str, update: UserUpdate) -> Result<User, Error>;

    async fn set_premium(&self, user_id: &str) -> Result<User, Error>;
}
