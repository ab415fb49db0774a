//! OVH API client
//!
//! Every request to the OVH API is authenticated with four headers:
//!
//! - `X-Ovh-Application`: the application key
//! - `X-Ovh-Consumer`: the consumer key
//! - `X-Ovh-Timestamp`: the server time, fetched from `/auth/time`
//! - `X-Ovh-Signature`: `$1$` followed by the SHA1 hex digest of
//!   `secret+consumer+METHOD+url+body+timestamp`
//!
//! [`Client`] builds the url, serializes the body, signs and sends the
//! request, then decodes the JSON answer. Consumer keys are obtained with
//! [`Client::provision_consumer_key`].
//!
//! ## Example
//!
//! ```no_run
//! use ovhsign_core::{Context, OsEnv};
//! use ovhsign_file_read_tokio::TokioFileRead;
//! use ovhsign_http_send_reqwest::ReqwestHttpSend;
//! use ovhsign_ovh::{Client, Config, DefaultCredentialProvider};
//!
//! # async fn example() -> ovhsign_core::Result<()> {
//! let ctx = Context::new()
//!     .with_file_read(TokioFileRead)
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//!
//! let endpoint = Config::default()
//!     .from_env(&ctx)
//!     .from_config_file(&ctx)
//!     .await?
//!     .endpoint()?;
//! let client = Client::new(ctx, endpoint, DefaultCredentialProvider::new());
//!
//! let me = client.get("/me").await?;
//! println!("{}", me.body);
//! # Ok(())
//! # }
//! ```

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod endpoint;
pub use endpoint::Endpoint;

mod time;
pub use time::fetch_server_time;

mod sign_request;
pub use sign_request::{
    signature, string_to_sign, RequestSigner, SignedPayload, SigningPayload,
};

mod provision;
pub use provision::{
    default_access_rules, AccessMethod, AccessRule, ConsumerKeyGrant, CredentialPayload,
    CredentialRequest,
};

mod provide_credential;
pub use provide_credential::*;

mod client;
pub use client::{normalize_path, ApiRequest, ApiResponse, Client, DebugEvent, DebugHook};
