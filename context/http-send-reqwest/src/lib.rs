//! Reqwest-based HTTP transport for ovhsign.
//!
//! `ReqwestHttpSend` implements the `HttpSend` trait from `ovhsign_core` on top
//! of a `reqwest::Client`. Timeouts, proxies and connection pooling are all
//! configured on the client you pass in.
//!
//! reqwest normalizes urls (dot segments, host case, percent-encoding of
//! characters such as `{`). A request whose url would be rewritten is refused
//! with `RequestInvalid`, since its signature covers the original text.
//!
//! ```no_run
//! use ovhsign_core::Context;
//! use ovhsign_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), reqwest::Error> {
//! let client = reqwest::Client::builder()
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use ovhsign_core::{Error, HttpSend, Result};
use reqwest::{Client, Request};

/// Reqwest-based implementation of the `HttpSend` trait.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let uri = req.uri().to_string();
        let req = Request::try_from(req).map_err(|e| {
            Error::request_invalid("failed to convert request")
                .with_source(e)
                .with_context(format!("url: {uri}"))
        })?;
        if req.url().as_str() != uri {
            return Err(
                Error::request_invalid("url would be rewritten before sending")
                    .with_context(format!("url: {uri}"))
                    .with_context(format!("sent as: {}", req.url())),
            );
        }

        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| {
                Error::transport("failed to send request")
                    .with_source(e)
                    .with_context(format!("url: {uri}"))
            })?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| {
                Error::transport("failed to read response body")
                    .with_source(e)
                    .with_context(format!("url: {uri}"))
            })?;
        Ok(http::Response::from_parts(parts, bs))
    }
}
