use std::time::Duration;

use crate::oauth2::errors::OAuth2Error;

pub(super) fn get_client(timeout: Duration) -> Result<reqwest::Client, OAuth2Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(32)
        .build()
        .map_err(|e| OAuth2Error::Client(e.to_string()))
}

/// Append the handoff parameters to the frontend return target.
///
/// A target already ending in `?` or `&` is used as is, one with a query gets `&`,
/// anything else gets `?`.
pub(crate) fn append_handoff_params(return_target: &str, handoff_code: &str) -> String {
    let separator = if return_target.ends_with('?') || return_target.ends_with('&') {
        ""
    } else if return_target.contains('?') {
        "&"
    } else {
        "?"
    };
    format!("{return_target}{separator}provider=google&success=true&code={handoff_code}")
}
