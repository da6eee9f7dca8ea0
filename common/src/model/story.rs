use serde::{Deserialize, Serialize};

use crate::model::UserBrief;

/// ephemeral; a ttl index on the stored expire_at date removes stories
/// after 24 hours, so this model never sees expired records
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Story {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    pub create_time: i64,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct StoryWithUser {
    #[serde(flatten)]
    pub story: Story,
    pub user: UserBrief,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CreateStoryRequest {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}
