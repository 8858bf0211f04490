//! Extractors whose rejections use the JSON error envelope.
//!
//! Axum's stock `Json` and `Path` reject with plain-text bodies and, for
//! JSON, a mix of 400/415/422 statuses. These wrappers turn every rejection
//! into an [`AppError::BadRequest`].

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `Json<T>` that rejects malformed bodies with a 400 JSON error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Path<T>` that rejects unparseable segments (e.g. a non-UUID id) with a
/// 400 JSON error.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
