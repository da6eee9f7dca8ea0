mod auth;
mod json_extractor;
mod path_extractor;

pub(crate) use auth::ClaimsExtractor;
pub(crate) use json_extractor::JsonExtractor;
pub(crate) use path_extractor::PathExtractor;
