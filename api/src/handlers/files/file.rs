use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use nanoid::nanoid;

use common::errors::Error;

use crate::api_utils::custom_extract::{ClaimsExtractor, PathExtractor};
use crate::AppState;

pub async fn upload(
    State(state): State<AppState>,
    ClaimsExtractor(_claims): ClaimsExtractor,
    mut multipart: Multipart,
) -> Result<String, Error> {
    let mut filename = String::new();
    if let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| Error::internal_with_details(err.to_string()))?
    {
        filename = field.file_name().unwrap_or_default().to_string();
        // random prefix so two uploads with the same name never collide
        filename = format!("{}-{}", nanoid!(), filename);

        let data = field
            .bytes()
            .await
            .map_err(|err| Error::internal_with_details(err.to_string()))?;
        state.oss.upload_file(&filename, data.into()).await?;
    }

    Ok(filename)
}

pub async fn get_file_by_name(
    State(state): State<AppState>,
    PathExtractor(filename): PathExtractor<String>,
) -> Result<(HeaderMap, Vec<u8>), Error> {
    let bytes = state.oss.download_file(&filename).await?;
    let mut headers = HeaderMap::new();
    headers.insert(
        "Cache-Control",
        "private, max-age=31536000"
            .parse()
            .map_err(|_| Error::internal_with_details("invalid header value".to_string()))?,
    );
    Ok((headers, bytes.into()))
}

pub async fn upload_avatar(
    State(state): State<AppState>,
    ClaimsExtractor(_claims): ClaimsExtractor,
    mut multipart: Multipart,
) -> Result<String, Error> {
    let mut filename = String::new();
    if let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| Error::internal_with_details(err.to_string()))?
    {
        filename = field.file_name().unwrap_or_default().to_string();
        filename = format!("{}-{}", nanoid!(), filename);

        let data = field
            .bytes()
            .await
            .map_err(|err| Error::internal_with_details(err.to_string()))?;
        state.oss.upload_avatar(&filename, data.into()).await?;
    }

    Ok(filename)
}

pub async fn get_avatar_by_name(
    State(state): State<AppState>,
    PathExtractor(filename): PathExtractor<String>,
) -> Result<(HeaderMap, Vec<u8>), Error> {
    let bytes = state.oss.download_avatar(&filename).await?;
    let mut headers = HeaderMap::new();
    headers.insert(
        "Cache-Control",
        "private, max-age=31536000"
            .parse()
            .map_err(|_| Error::internal_with_details("invalid header value".to_string()))?,
    );
    Ok((headers, bytes.into()))
}
