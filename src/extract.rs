//! Request extractors that reject malformed input with the application's JSON errors.

use axum::extract::{FromRequest, FromRequestParts};

use crate::Error;

/// A JSON request body. Parse failures are reported as [Error::InvalidRequest].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct AppJson<T>(pub T);

/// A path parameter. Parse failures are reported as [Error::InvalidRequest].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct AppPath<T>(pub T);

/// A query string that may repeat keys, e.g. `?kategori_id=1&kategori_id=2`.
///
/// Parse failures are reported as [Error::InvalidRequest].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum_extra::extract::Query), rejection(Error))]
pub struct AppQuery<T>(pub T);
