//! Signed session cookies.
//!
//! The cookie value is `session_id.signature`, where the signature is an HMAC-SHA256 of
//! the session id under the server secret.

use hmac::{Hmac, Mac};
use http::header::{COOKIE, HeaderMap};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::session::errors::SessionError;
use crate::utils::base64url_encode;

type HmacSha256 = Hmac<Sha256>;

fn signature(secret: &[u8], session_id: &str) -> Result<String, SessionError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SessionError::Crypto(e.to_string()))?;
    mac.update(session_id.as_bytes());
    Ok(base64url_encode(&mac.finalize().into_bytes()))
}

pub(super) fn sign_session_id(secret: &[u8], session_id: &str) -> Result<String, SessionError> {
    Ok(format!("{session_id}.{}", signature(secret, session_id)?))
}

/// Return the session id if the signature checks out.
pub(super) fn verify_session_cookie<'a>(secret: &[u8], value: &'a str) -> Option<&'a str> {
    let (session_id, received) = value.rsplit_once('.')?;
    let expected = signature(secret, session_id).ok()?;
    bool::from(expected.as_bytes().ct_eq(received.as_bytes())).then_some(session_id)
}

pub(super) fn get_cookie_from_headers<'a>(
    headers: &'a HeaderMap,
    cookie_name: &str,
) -> Result<Option<&'a str>, SessionError> {
    let Some(cookie_header) = headers.get(COOKIE) else {
        tracing::debug!("No cookie header found");
        return Ok(None);
    };

    let cookie_str = cookie_header.to_str().map_err(|e| {
        tracing::error!("Invalid cookie header: {}", e);
        SessionError::HeaderError("Invalid cookie header".to_string())
    })?;

    let value = cookie_str.split(';').map(|s| s.trim()).find_map(|s| {
        let mut parts = s.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k == cookie_name => Some(v),
            _ => None,
        }
    });

    Ok(value)
}
