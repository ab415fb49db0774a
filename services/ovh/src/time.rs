//! Time source backed by the API's `/auth/time` endpoint.

use crate::constants::AUTH_TIME_PATH;
use crate::Endpoint;
use bytes::Bytes;
use http::Method;
use log::debug;
use ovhsign_core::{Context, Error, Result};

/// Fetch the current server time from `<base>/<version>/auth/time`.
///
/// The body is returned exactly as received so that the signed string and the
/// `X-Ovh-Timestamp` header carry the same bytes the server produced. There is
/// no fallback to the local clock: a skewed local time would be rejected by
/// the server anyway.
pub async fn fetch_server_time(ctx: &Context, endpoint: &Endpoint) -> Result<String> {
    let url = endpoint.url(AUTH_TIME_PATH);
    let req = http::Request::builder()
        .method(Method::GET)
        .uri(&url)
        .body(Bytes::new())
        .map_err(|e| {
            Error::request_invalid("failed to build server time request")
                .with_source(e)
                .with_context(format!("url: {url}"))
        })?;

    let resp = ctx.http_send_as_string(req).await.map_err(|e| {
        Error::transport("failed to fetch server time")
            .with_source(e)
            .with_context(format!("url: {url}"))
    })?;

    if !resp.status().is_success() {
        return Err(
            Error::protocol(format!("server time request failed with {}", resp.status()))
                .with_context(format!("url: {url}"))
                .with_context(format!("body: {}", resp.body())),
        );
    }

    let timestamp = resp.into_body();
    if !is_timestamp(&timestamp) {
        return Err(Error::protocol("server time is not a unix timestamp")
            .with_context(format!("url: {url}"))
            .with_context(format!("body: {timestamp:?}")));
    }

    debug!("server time: {timestamp}");
    Ok(timestamp)
}

fn is_timestamp(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
