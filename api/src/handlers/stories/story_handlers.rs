use std::collections::HashMap;

use axum::extract::State;
use axum::Json;

use common::errors::Error;
use common::model::{CreateStoryRequest, Story, StoryWithUser, UserBrief};

use crate::api_utils::custom_extract::{ClaimsExtractor, JsonExtractor};
use crate::AppState;

pub async fn create_story(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    JsonExtractor(req): JsonExtractor<CreateStoryRequest>,
) -> Result<Json<Story>, Error> {
    if req.image_url.is_none() && req.text.is_none() {
        return Err(Error::bad_request("story is empty".to_string()));
    }
    let story = state.db.story.create_story(&claims.sub, req).await?;
    Ok(Json(story))
}

pub async fn get_stories(
    State(state): State<AppState>,
    ClaimsExtractor(_claims): ClaimsExtractor,
) -> Result<Json<Vec<StoryWithUser>>, Error> {
    let stories = state.db.story.get_all().await?;

    let mut ids: Vec<String> = stories.iter().map(|story| story.user_id.clone()).collect();
    ids.sort();
    ids.dedup();
    let users: HashMap<String, UserBrief> = state
        .db
        .user
        .get_users_by_ids(&ids)
        .await?
        .iter()
        .map(|user| (user.id.clone(), UserBrief::from(user)))
        .collect();

    Ok(Json(
        stories
            .into_iter()
            .filter_map(|story| {
                Some(StoryWithUser {
                    user: users.get(&story.user_id)?.clone(),
                    story,
                })
            })
            .collect(),
    ))
}
