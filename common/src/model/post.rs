use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Comment {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub avatar: String,
    pub text: String,
    pub create_time: i64,
}

/// author name and avatar are denormalized at creation time so posts keep
/// them even if the profile changes later
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub create_time: i64,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct LikeCount {
    pub likes: usize,
}
