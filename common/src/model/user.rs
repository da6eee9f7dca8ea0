use serde::{Deserialize, Serialize};

/// full user record as stored; never serialize it straight into a response,
/// convert to [UserView] first so the password hash stays server side
#[derive(Clone, Serialize, Default, Deserialize, Debug)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub profile_name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub town: String,
    #[serde(default)]
    pub place_of_birth: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub is_profile_completed: bool,
    #[serde(default)]
    pub is_premium: bool,
    pub create_time: i64,
    pub update_time: i64,
}

/// user as exposed over the api
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub profile_name: String,
    pub avatar: String,
    pub town: String,
    pub place_of_birth: String,
    pub bio: String,
    pub gender: String,
    pub is_profile_completed: bool,
    pub is_premium: bool,
    pub create_time: i64,
    pub update_time: i64,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            profile_name: user.profile_name,
            avatar: user.avatar,
            town: user.town,
            place_of_birth: user.place_of_birth,
            bio: user.bio,
            gender: user.gender,
            is_profile_completed: user.is_profile_completed,
            is_premium: user.is_premium,
            create_time: user.create_time,
            update_time: user.update_time,
        }
    }
}

/// the short form other users see in lists, posts and messages
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct UserBrief {
    pub id: String,
    pub username: String,
    pub profile_name: String,
    pub avatar: String,
}

impl From<&User> for UserBrief {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            profile_name: user.profile_name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

impl From<User> for UserBrief {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            profile_name: user.profile_name,
            avatar: user.avatar,
        }
    }
}

/// partial profile update; None means leave the field untouched
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UserUpdate {
    pub profile_name: Option<String>,
    pub town: Option<String>,
    pub place_of_birth: Option<String>,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}
