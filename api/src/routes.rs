use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;

use crate::handlers::files::{get_avatar_by_name, get_file_by_name, upload, upload_avatar};
use crate::handlers::friends::{
    accept_request, cancel_request, create_friendship, decline_request, friends_and_requests,
    friends_list, incoming_requests, incoming_requests_detailed, remove_friend,
    respond_to_request, send_request, suggestions, unfriend,
};
use crate::handlers::messages::{conversations, get_messages, send_message, shared_media};
use crate::handlers::posts::{comment_post, create_post, feed, like_post, user_posts};
use crate::handlers::projects::{
    create_project, delete_project, get_project, join_project, list_projects, my_projects,
};
use crate::handlers::stories::{create_story, get_stories};
use crate::handlers::users::{
    all_users, get_profile, initialize_payment, login, me, register, search_users,
    update_profile, verify_payment,
};
use crate::AppState;

pub(crate) fn app_routes(state: AppState) -> Router {
    Router::new().nest(
        "/api",
        Router::new()
            .nest("/users", user_routes())
            .nest("/friends", friend_routes())
            .nest("/messages", msg_routes())
            .nest("/posts", post_routes())
            .nest("/stories", story_routes())
            .nest("/projects", project_routes())
            .nest("/files", file_routes())
            .with_state(state),
    )
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/profile", patch(update_profile))
        .route("/profile/:id", get(get_profile))
        .route("/search", get(search_users))
        .route("/all", get(all_users))
        .route("/payment/initialize", post(initialize_payment))
        .route("/payment/verify/:reference", get(verify_payment))
        // the legacy relationship surface lives under /users
        .route("/friend-request/:id", post(send_request))
        .route("/friend-request/:id/accept", post(accept_request))
        .route("/friend-request/:id/decline", post(decline_request))
        .route("/friend-request/:id/cancel", post(cancel_request))
        .route("/friend/:id", delete(unfriend))
        .route("/friends", get(friends_list))
        .route("/friend-requests", get(incoming_requests))
        .route("/friend-requests-detailed", get(incoming_requests_detailed))
        .route("/suggestions", get(suggestions))
}

fn friend_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_friendship))
        .route("/", get(friends_and_requests))
        .route("/list", get(friends_list))
        .route("/:id/respond", put(respond_to_request))
        .route("/:id", delete(remove_friend))
}

fn msg_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(send_message))
        .route("/conversations", get(conversations))
        .route("/:user_id", get(get_messages))
        .route("/:user_id/media", get(shared_media))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_post))
        .route("/feed", get(feed))
        .route("/user/:id", get(user_posts))
        .route("/:id/like", put(like_post))
        .route("/:id/comment", post(comment_post))
}

fn story_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_story))
        .route("/", get(get_stories))
}

fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_project))
        .route("/", get(list_projects))
        .route("/mine", get(my_projects))
        .route("/:id", get(get_project))
        .route("/:id", delete(delete_project))
        .route("/:id/join", post(join_project))
}

const MAX_FILE_UPLOAD_SIZE: usize = 1024 * 1024 * 50;

fn file_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(MAX_FILE_UPLOAD_SIZE)),
        )
        .route(
            "/avatar/upload",
            post(upload_avatar).layer(DefaultBodyLimit::max(MAX_FILE_UPLOAD_SIZE)),
        )
        .route("/get/:filename", get(get_file_by_name))
        .route("/avatar/get/:filename", get(get_avatar_by_name))
}
