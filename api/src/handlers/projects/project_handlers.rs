use std::collections::HashMap;

use axum::extract::State;
use axum::Json;

use common::errors::Error;
use common::model::{CreateProjectRequest, Project, ProjectWithOwner, UserBrief};

use crate::api_utils::custom_extract::{ClaimsExtractor, JsonExtractor, PathExtractor};
use crate::AppState;

pub async fn create_project(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    JsonExtractor(req): JsonExtractor<CreateProjectRequest>,
) -> Result<Json<Project>, Error> {
    if req.name.is_empty() || req.description.is_empty() {
        return Err(Error::bad_request(
            "name and description are required".to_string(),
        ));
    }
    let project = state.db.project.create_project(&claims.sub, req).await?;
    Ok(Json(project))
}

pub async fn list_projects(
    State(state): State<AppState>,
    ClaimsExtractor(_claims): ClaimsExtractor,
) -> Result<Json<Vec<ProjectWithOwner>>, Error> {
    let projects = state.db.project.get_all().await?;

    let mut ids: Vec<String> = projects.iter().map(|p| p.owner_id.clone()).collect();
    ids.sort();
    ids.dedup();
    let owners: HashMap<String, UserBrief> = state
        .db
        .user
        .get_users_by_ids(&ids)
        .await?
        .iter()
        .map(|user| (user.id.clone(), UserBrief::from(user)))
        .collect();

    Ok(Json(
        projects
            .into_iter()
            .filter_map(|project| {
                Some(ProjectWithOwner {
                    owner: owners.get(&project.owner_id)?.clone(),
                    project,
                })
            })
            .collect(),
    ))
}

pub async fn get_project(
    State(state): State<AppState>,
    ClaimsExtractor(_claims): ClaimsExtractor,
    PathExtractor(project_id): PathExtractor<String>,
) -> Result<Json<ProjectWithOwner>, Error> {
    let project = state
        .db
        .project
        .get_project(&project_id)
        .await?
        .ok_or_else(|| Error::not_found_with_details("project not found".to_string()))?;

    let owner = state
        .db
        .user
        .get_user_by_id(&project.owner_id)
        .await?
        .map(UserBrief::from)
        .ok_or_else(|| Error::not_found_with_details("project owner not found".to_string()))?;

    Ok(Json(ProjectWithOwner { project, owner }))
}

pub async fn join_project(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    PathExtractor(project_id): PathExtractor<String>,
) -> Result<Json<Project>, Error> {
    let project = state.db.project.join(&project_id, &claims.sub).await?;
    Ok(Json(project))
}

/// only the owner can take a project down
pub async fn delete_project(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    PathExtractor(project_id): PathExtractor<String>,
) -> Result<(), Error> {
    let project = state
        .db
        .project
        .get_project(&project_id)
        .await?
        .ok_or_else(|| Error::not_found_with_details("project not found".to_string()))?;

    if project.owner_id != claims.sub {
        return Err(Error::forbidden(
            "only the owner can delete a project".to_string(),
        ));
    }

    state.db.project.delete_project(&project_id).await?;
    Ok(())
}

pub async fn my_projects(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
) -> Result<Json<Vec<Project>>, Error> {
    Ok(Json(state.db.project.get_by_owner(&claims.sub).await?))
}
