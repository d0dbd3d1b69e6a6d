//! Shared-secret check for the ingestion endpoint

use axum::http::{header::AUTHORIZATION, HeaderMap};
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

/// Header carrying the ingestion token
pub const INGEST_TOKEN_HEADER: &str = "x-ingest-token";

/// Check the request's token against the configured one
///
/// A missing server token is a configuration error (500), distinct from a
/// caller sending the wrong token (401). The token may come in
/// `X-Ingest-Token` or as `Authorization: Bearer <token>`.
pub fn authorize(configured: Option<&str>, headers: &HeaderMap) -> Result<()> {
    let expected = configured
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::config("Ingestion token not configured"))?;

    let provided = headers
        .get(INGEST_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
        });

    match provided {
        Some(token) if bool::from(token.as_bytes().ct_eq(expected.as_bytes())) => Ok(()),
        _ => Err(Error::Unauthorized("Invalid ingestion token".to_string())),
    }
}
