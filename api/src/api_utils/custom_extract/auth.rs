use axum::extract::{FromRef, FromRequestParts, MatchedPath};
use axum::http::request::Parts;
use axum::{async_trait, RequestPartsExt};

use common::errors::Error;
use utils::claims::{verify_token, Claims};

use crate::AppState;

const AUTHORIZATION_HEADER: &str = "Authorization";
const BEARER: &str = "Bearer";

/// pulls the caller's identity out of the bearer token; every protected
/// handler takes one of these
pub struct ClaimsExtractor(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for ClaimsExtractor
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let path = parts
            .extract::<MatchedPath>()
            .await
            .map(|path| path.as_str().to_owned())
            .ok()
            .unwrap_or_default();
        let app_state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION_HEADER)
            .ok_or_else(|| Error::unauthorized_with_details(path.clone()))?;

        let header = header.to_str().unwrap_or("");
        if !header.starts_with(BEARER) {
            return Err(Error::unauthorized_with_details(path));
        }

        let token = header
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| Error::unauthorized_with_details(path))?;

        let claims = verify_token(token, &app_state.jwt_secret)?;
        Ok(Self(claims))
    }
}
