use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::model::UserBrief;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Display for ExperienceLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExperienceLevel::Beginner => f.write_str("Beginner"),
            ExperienceLevel::Intermediate => f.write_str("Intermediate"),
            ExperienceLevel::Advanced => f.write_str("Advanced"),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub telegram: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub discord: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub member_count: usize,
    pub create_time: i64,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct ProjectWithOwner {
    #[serde(flatten)]
    pub project: Project,
    pub owner: UserBrief,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub telegram: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub discord: String,
}
