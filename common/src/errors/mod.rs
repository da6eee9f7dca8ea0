use aws_sdk_s3::error::SdkError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use mongodb::bson::document::ValueAccessError;
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use tracing::error;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownError,
    DbError,
    ConfigReadError,
    ConfigParseError,
    NotFound,
    Conflict,
    Unprocessable,
    Forbidden,
    BroadCastError,
    InternalServer,
    BodyParsing,
    PathParsing,
    UnAuthorized,
    ParseError,
    MongoDbValueAccessError,
    MongoDbBsonSerError,
    MongoDbOperateError,
    RedisError,
    IOError,
    ReqwestError,
    BadRequest,
    AccountOrPassword,
    OSSError,
}

#[derive(Debug, Serialize)]
pub struct Error {
    kind: ErrorKind,
    #[serde(rename = "message")]
    details: Option<String>,
    #[serde(skip)]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    #[inline]
    pub fn new(
        kind: ErrorKind,
        details: impl Into<String>,
        source: impl StdError + 'static + Send + Sync,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            details: Some(details.into()),
        }
    }

    #[inline]
    pub fn with_kind(kind: ErrorKind) -> Self {
        Self {
            kind,
            source: None,
            details: None,
        }
    }

    #[inline]
    pub fn with_details(kind: ErrorKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            source: None,
            details: Some(details.into()),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    #[inline]
    pub fn internal(error: impl StdError + 'static + Send + Sync) -> Self {
        Self {
            kind: ErrorKind::InternalServer,
            details: Some(error.to_string()),
            source: Some(Box::new(error)),
        }
    }

    #[inline]
    pub fn internal_with_details(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::InternalServer, details)
    }

    #[inline]
    pub fn broadcast(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::BroadCastError, details)
    }

    #[inline]
    pub fn config_read(error: impl StdError + 'static + Send + Sync) -> Self {
        Self::new(ErrorKind::ConfigReadError, error.to_string(), error)
    }

    #[inline]
    pub fn unauthorized(
        error: impl StdError + 'static + Send + Sync,
        details: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::UnAuthorized, details, error)
    }

    #[inline]
    pub fn unauthorized_with_details(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::UnAuthorized, details)
    }

    #[inline]
    pub fn bad_request(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::BadRequest, details)
    }

    #[inline]
    pub fn conflict(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::Conflict, details)
    }

    /// request is well formed but semantically impossible, e.g. self-targeting
    #[inline]
    pub fn unprocessable(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::Unprocessable, details)
    }

    #[inline]
    pub fn forbidden(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::Forbidden, details)
    }

    #[inline]
    pub fn not_found() -> Self {
        Self::with_kind(ErrorKind::NotFound)
    }

    #[inline]
    pub fn not_found_with_details(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::NotFound, details)
    }

    #[inline]
    pub fn account_or_pwd() -> Self {
        Self::with_kind(ErrorKind::AccountOrPassword)
    }

    #[inline]
    pub fn body_parsing(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::BodyParsing, details)
    }

    #[inline]
    pub fn path_parsing(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::PathParsing, details)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{:?}: {}", self.kind, details),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status_code = match self.kind {
            ErrorKind::UnknownError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::BodyParsing => StatusCode::BAD_REQUEST,
            ErrorKind::PathParsing => StatusCode::BAD_REQUEST,
            ErrorKind::UnAuthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::DbError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::ParseError | ErrorKind::ConfigReadError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::ConfigParseError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::MongoDbValueAccessError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::MongoDbOperateError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::MongoDbBsonSerError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::RedisError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::ReqwestError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::IOError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::BroadCastError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::AccountOrPassword => StatusCode::UNAUTHORIZED,
            ErrorKind::OSSError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        error!("http request api error: {:?}", self);
        (status_code, Json(self)).into_response()
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::new(ErrorKind::IOError, value.to_string(), value)
    }
}

impl From<redis::RedisError> for Error {
    fn from(value: redis::RedisError) -> Self {
        Self::new(ErrorKind::RedisError, value.to_string(), value)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(value: serde_yaml::Error) -> Self {
        Self::new(ErrorKind::ConfigParseError, value.to_string(), value)
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self::new(ErrorKind::ReqwestError, value.to_string(), value)
    }
}

impl From<ValueAccessError> for Error {
    fn from(value: ValueAccessError) -> Self {
        Self::new(ErrorKind::MongoDbValueAccessError, value.to_string(), value)
    }
}

impl From<mongodb::bson::ser::Error> for Error {
    fn from(value: mongodb::bson::ser::Error) -> Self {
        Self::new(ErrorKind::MongoDbBsonSerError, value.to_string(), value)
    }
}

impl From<mongodb::bson::de::Error> for Error {
    fn from(value: mongodb::bson::de::Error) -> Self {
        Self::new(ErrorKind::MongoDbBsonSerError, value.to_string(), value)
    }
}

impl From<mongodb::error::Error> for Error {
    fn from(value: mongodb::error::Error) -> Self {
        Self::new(ErrorKind::MongoDbOperateError, value.to_string(), value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::new(ErrorKind::ParseError, value.to_string(), value)
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(value: bcrypt::BcryptError) -> Self {
        Self::new(ErrorKind::InternalServer, value.to_string(), value)
    }
}

/// SdkError is not Send and Sync, so we just extract the details
impl<E> From<SdkError<E>> for Error
where
    E: StdError + 'static,
{
    fn from(sdk_error: SdkError<E>) -> Self {
        Self::with_details(ErrorKind::OSSError, sdk_error.to_string())
    }
}
