use axum::extract::{Query, State};
use axum::Json;
use nanoid::nanoid;
use serde_json::Value;
use tracing::warn;

use common::errors::Error;
use common::model::{timestamp, RelationFlags, User, UserBrief, UserUpdate, UserView};
use utils::claims::create_token;

use crate::api_utils::custom_extract::{ClaimsExtractor, JsonExtractor, PathExtractor};
use crate::handlers::users::{AuthResponse, LoginRequest, RegisterRequest, SearchQuery};
use crate::AppState;

/// premium costs a flat amount, charged in the provider's smallest unit
const PREMIUM_AMOUNT: u64 = 500_000;

pub async fn register(
    State(state): State<AppState>,
    JsonExtractor(req): JsonExtractor<RegisterRequest>,
) -> Result<Json<AuthResponse>, Error> {
    if req.username.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(Error::bad_request(
            "username, email and password are required".to_string(),
        ));
    }

    let now = timestamp();
    let user = User {
        id: nanoid!(),
        username: req.username,
        email: req.email,
        password: utils::hash_password(&req.password)?,
        create_time: now,
        update_time: now,
        ..Default::default()
    };

    let user = state.db.user.create_user(user).await?;
    let token = create_token(&user.id, &state.jwt_secret)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

pub async fn login(
    State(state): State<AppState>,
    JsonExtractor(req): JsonExtractor<LoginRequest>,
) -> Result<Json<AuthResponse>, Error> {
    let user = state
        .db
        .user
        .get_user_by_email(&req.email)
        .await?
        .ok_or_else(Error::account_or_pwd)?;

    if !utils::verify_password(&req.password, &user.password)? {
        return Err(Error::account_or_pwd());
    }

    let token = create_token(&user.id, &state.jwt_secret)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
) -> Result<Json<UserView>, Error> {
    let user = state
        .db
        .user
        .get_user_by_id(&claims.sub)
        .await?
        .ok_or_else(|| Error::not_found_with_details("user not found".to_string()))?;
    Ok(Json(user.into()))
}

/// profile_name may be omitted, but a present value must not be blank;
/// storing "" would silently un-complete the profile
fn blank_profile_name(update: &UserUpdate) -> bool {
    update
        .profile_name
        .as_deref()
        .is_some_and(|name| name.trim().is_empty())
}

pub async fn update_profile(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    JsonExtractor(update): JsonExtractor<UserUpdate>,
) -> Result<Json<UserView>, Error> {
    if blank_profile_name(&update) {
        return Err(Error::bad_request("profile_name cannot be empty".to_string()));
    }

    let user = state.db.user.update_profile(&claims.sub, update).await?;
    Ok(Json(user.into()))
}

/// another user's profile, along with how the caller relates to them
pub async fn get_profile(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    PathExtractor(user_id): PathExtractor<String>,
) -> Result<Json<Value>, Error> {
    let user = state
        .db
        .user
        .get_user_by_id(&user_id)
        .await?
        .ok_or_else(|| Error::not_found_with_details("user not found".to_string()))?;

    let record = state.db.friend.get_pair(&claims.sub, &user_id).await?;
    let relation = RelationFlags::derive(&claims.sub, record.as_ref());

    Ok(Json(serde_json::json!({
        "user": UserView::from(user),
        "relation": relation,
    })))
}

pub async fn search_users(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<UserBrief>>, Error> {
    if query.q.is_empty() {
        return Ok(Json(vec![]));
    }

    let users = state.db.user.search_users(&query.q).await?;
    Ok(Json(
        users
            .iter()
            .filter(|user| user.id != claims.sub)
            .map(UserBrief::from)
            .collect(),
    ))
}

pub async fn all_users(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
) -> Result<Json<Vec<UserBrief>>, Error> {
    let users = state.db.user.get_all_except(&claims.sub).await?;
    Ok(Json(users.iter().map(UserBrief::from).collect()))
}

pub async fn initialize_payment(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
) -> Result<Json<Value>, Error> {
    let user = state
        .db
        .user
        .get_user_by_id(&claims.sub)
        .await?
        .ok_or_else(|| Error::not_found_with_details("user not found".to_string()))?;

    if user.is_premium {
        return Err(Error::conflict("you are already premium".to_string()));
    }

    let client = reqwest::Client::new();
    let response: Value = client
        .post(format!("{}/transaction/initialize", state.payment.api_url))
        .bearer_auth(&state.payment.secret_key)
        .json(&serde_json::json!({
            "email": user.email,
            "amount": PREMIUM_AMOUNT,
        }))
        .send()
        .await?
        .json()
        .await?;

    Ok(Json(response))
}

pub async fn verify_payment(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    PathExtractor(reference): PathExtractor<String>,
) -> Result<Json<UserView>, Error> {
    let client = reqwest::Client::new();
    let response: Value = client
        .get(format!(
            "{}/transaction/verify/{}",
            state.payment.api_url, reference
        ))
        .bearer_auth(&state.payment.secret_key)
        .send()
        .await?
        .json()
        .await?;

    let status = response
        .pointer("/data/status")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if status != "success" {
        warn!("payment {} not successful: {}", reference, status);
        return Err(Error::unprocessable("payment was not successful".to_string()));
    }

    let user = state.db.user.set_premium(&claims.sub).await?;
    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_profile_name_rejects_whitespace_but_allows_absent() {
        let mut update = UserUpdate::default();
        assert!(!blank_profile_name(&update));

        update.profile_name = Some("  ".to_string());
        assert!(blank_profile_name(&update));

        update.profile_name = Some("Alice".to_string());
        assert!(!blank_profile_name(&update));
    }
}
