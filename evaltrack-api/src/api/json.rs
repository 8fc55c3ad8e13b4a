//! JSON body extractor that reports rejections in the API error envelope

use axum::extract::FromRequest;

use crate::error::ApiError;

/// Like `axum::Json`, but a bad body becomes a 400 `{message, detail}`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
