//! JSON body extractor whose rejections are [`ApiError`]s.

use axum::{
  Json,
  extract::{FromRequest, OptionalFromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Like [`Json`], but a missing content type or a malformed body comes back
/// as a `400` with the usual `{"error": ...}` body.
///
/// As `Option<ApiBody<T>>` a request without a `Content-Type` header yields
/// `None`.
#[derive(Debug)]
pub struct ApiBody<T>(pub T);

impl<S, T> FromRequest<S> for ApiBody<T>
where
  S: Send + Sync,
  T: DeserializeOwned,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
    Ok(Self(value))
  }
}

impl<S, T> OptionalFromRequest<S> for ApiBody<T>
where
  S: Send + Sync,
  T: DeserializeOwned,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
    let body = <Json<T> as OptionalFromRequest<S>>::from_request(req, state).await?;
    Ok(body.map(|Json(value)| Self(value)))
  }
}
