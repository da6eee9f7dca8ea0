use axum::extract::State;
use axum::Json;

use common::errors::Error;
use common::model::{timestamp, Comment, CommentRequest, CreatePostRequest, LikeCount, Post};

use crate::api_utils::custom_extract::{ClaimsExtractor, JsonExtractor, PathExtractor};
use crate::AppState;

pub async fn create_post(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    JsonExtractor(req): JsonExtractor<CreatePostRequest>,
) -> Result<Json<Post>, Error> {
    if req.text.is_empty() && req.images.is_empty() {
        return Err(Error::bad_request("post is empty".to_string()));
    }

    let author = state
        .db
        .user
        .get_user_by_id(&claims.sub)
        .await?
        .ok_or_else(|| Error::not_found_with_details("user not found".to_string()))?;

    let post = state.db.post.create_post(&author, req).await?;
    Ok(Json(post))
}

pub async fn feed(
    State(state): State<AppState>,
    ClaimsExtractor(_claims): ClaimsExtractor,
) -> Result<Json<Vec<Post>>, Error> {
    Ok(Json(state.db.post.feed().await?))
}

pub async fn user_posts(
    State(state): State<AppState>,
    ClaimsExtractor(_claims): ClaimsExtractor,
    PathExtractor(user_id): PathExtractor<String>,
) -> Result<Json<Vec<Post>>, Error> {
    Ok(Json(state.db.post.get_by_user(&user_id).await?))
}

pub async fn like_post(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    PathExtractor(post_id): PathExtractor<String>,
) -> Result<Json<LikeCount>, Error> {
    let post = state.db.post.toggle_like(&post_id, &claims.sub).await?;
    Ok(Json(LikeCount {
        likes: post.likes.len(),
    }))
}

pub async fn comment_post(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    PathExtractor(post_id): PathExtractor<String>,
    JsonExtractor(req): JsonExtractor<CommentRequest>,
) -> Result<Json<Vec<Comment>>, Error> {
    if req.text.is_empty() {
        return Err(Error::bad_request("comment is empty".to_string()));
    }

    let user = state
        .db
        .user
        .get_user_by_id(&claims.sub)
        .await?
        .ok_or_else(|| Error::not_found_with_details("user not found".to_string()))?;

    let comment = Comment {
        user_id: user.id,
        username: user.username,
        avatar: user.avatar,
        text: req.text,
        create_time: timestamp(),
    };
    let post = state.db.post.add_comment(&post_id, comment).await?;
    Ok(Json(post.comments))
}
