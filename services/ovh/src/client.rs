//! Request builder and client for the OVH API.

use std::fmt::{self, Debug};
use std::sync::Arc;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use log::debug;
use ovhsign_core::{Context, Error, ProvideCredential, Result, Signer};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::constants::*;
use crate::provide_credential::StaticCredentialProvider;
use crate::{ConsumerKeyGrant, Credential, CredentialRequest, Endpoint, RequestSigner};

/// Strip exactly one leading `/` from `path`.
///
/// Nothing else is touched: internal slashes are kept and nothing is
/// percent-encoded, because the url is signed as is.
pub fn normalize_path(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// One logical API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Bytes,
    debug: bool,
}

impl ApiRequest {
    /// Create a request with an empty `{}` body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Bytes::from_static(EMPTY_JSON_BODY),
            debug: false,
        }
    }

    /// Serialize `body` as the JSON payload of this request.
    pub fn with_body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let bs = serde_json::to_vec(body).map_err(|e| {
            Error::request_invalid("failed to serialize request body").with_source(e)
        })?;
        self.body = Bytes::from(bs);
        Ok(self)
    }

    /// Report this call to the client's debug hook.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path as given by the caller.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Serialized JSON body, exactly as it will be signed and sent.
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// Decoded answer of the API.
///
/// Error statuses are not turned into errors: OVH describes failures with a
/// JSON body such as `{"message": "..."}` which is returned here as is.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Decoded JSON body.
    pub body: Value,
}

impl ApiResponse {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserialize the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(&self.body).map_err(|e| {
            Error::parse("response body does not match the expected type")
                .with_source(e)
                .with_context(format!("status: {}", self.status))
        })
    }

    /// Consume the response and return its body.
    pub fn into_body(self) -> Value {
        self.body
    }
}

/// What the debug hook is told about.
#[derive(Debug)]
pub enum DebugEvent<'a> {
    /// A request has been signed and is about to be sent.
    Signed {
        /// HTTP method.
        method: &'a Method,
        /// Fully qualified url.
        url: &'a str,
        /// Server timestamp the signature covers.
        timestamp: &'a str,
        /// The `$1$...` signature.
        signature: &'a str,
    },
    /// A response has been received, before decoding.
    Response {
        /// Fully qualified url.
        url: &'a str,
        /// HTTP status.
        status: StatusCode,
        /// Raw body.
        body: &'a [u8],
    },
}

/// Callback receiving [`DebugEvent`]s for requests sent with `debug` enabled.
pub type DebugHook = Arc<dyn Fn(&DebugEvent<'_>) + Send + Sync>;

/// Client for the OVH API.
///
/// The client is cheap to clone and safe to share between tasks: its
/// credential is read-only once loaded and every call fetches its own
/// timestamp and signature.
///
/// ```no_run
/// use http::Method;
/// use ovhsign_core::Context;
/// use ovhsign_http_send_reqwest::ReqwestHttpSend;
/// use ovhsign_ovh::{Client, Credential, Endpoint};
///
/// # async fn example() -> ovhsign_core::Result<()> {
/// let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
/// let client = Client::from_credential(
///     ctx,
///     Endpoint::default(),
///     Credential::new("APP", "SECRET").with_consumer_key("CONS"),
/// );
///
/// let me = client.call(Method::GET, "/me", &serde_json::json!({})).await?;
/// println!("{}: {}", me.status, me.body);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    signer: Signer<Credential>,
    endpoint: Endpoint,
    debug_hook: Option<DebugHook>,
}

impl Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("signer", &self.signer)
            .field("endpoint", &self.endpoint)
            .field("debug_hook", &self.debug_hook.is_some())
            .finish()
    }
}

impl Client {
    /// Create a client loading its credential from `loader`.
    pub fn new(
        ctx: Context,
        endpoint: Endpoint,
        loader: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        let signer = Signer::new(ctx, loader, RequestSigner::new(endpoint.clone()));
        Self {
            signer,
            endpoint,
            debug_hook: None,
        }
    }

    /// Create a client for a fixed credential.
    pub fn from_credential(ctx: Context, endpoint: Endpoint, credential: Credential) -> Self {
        Self::new(ctx, endpoint, StaticCredentialProvider::from(credential))
    }

    /// Install a hook called for every request sent with `debug` enabled.
    pub fn with_debug_hook(mut self, hook: impl Fn(&DebugEvent<'_>) + Send + Sync + 'static) -> Self {
        self.debug_hook = Some(Arc::new(hook));
        self
    }

    /// Return a new client using `consumer_key`, keeping everything else.
    ///
    /// Typically called with the key returned by
    /// [`provision_consumer_key`](Self::provision_consumer_key) once it has
    /// been validated.
    pub async fn with_consumer_key(&self, consumer_key: impl Into<String>) -> Result<Self> {
        let credential = self.credential().await?.with_consumer_key(consumer_key);

        let mut client = Self::from_credential(
            self.signer.context().clone(),
            self.endpoint.clone(),
            credential,
        );
        client.debug_hook = self.debug_hook.clone();
        Ok(client)
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Load the credential of this client.
    pub async fn credential(&self) -> Result<Credential> {
        self.signer
            .credential()
            .await?
            .ok_or_else(|| Error::credential_invalid("no OVH credential found"))
    }

    /// Request a new consumer key for the application.
    ///
    /// This call is not signed: only the application key is sent. The
    /// returned key must be approved by visiting
    /// [`ConsumerKeyGrant::validation_url`] before it can sign anything.
    pub async fn provision_consumer_key(&self, req: CredentialRequest) -> Result<ConsumerKeyGrant> {
        let credential = self.credential().await?;
        let url = self.endpoint.url(AUTH_CREDENTIAL_PATH);

        let body = serde_json::to_vec(&req.payload()).map_err(|e| {
            Error::request_invalid("failed to serialize credential request").with_source(e)
        })?;
        let http_req = http::Request::builder()
            .method(Method::POST)
            .uri(&url)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(X_OVH_APPLICATION, credential.application_key.as_str())
            .body(Bytes::from(body))?;

        let resp = self.signer.context().http_send(http_req).await?;
        let status = resp.status();
        debug!("credential request answered with {status}");
        self.notify(
            req.debug(),
            &DebugEvent::Response {
                url: &url,
                status,
                body: resp.body(),
            },
        );

        serde_json::from_slice(resp.body()).map_err(|e| {
            Error::parse("failed to decode credential response")
                .with_source(e)
                .with_context(format!("status: {status}"))
                .with_context(format!("body: {}", String::from_utf8_lossy(resp.body())))
        })
    }

    /// Send a signed request and decode its JSON answer.
    ///
    /// `body` is serialized once; the same bytes are signed and sent. Use an
    /// empty map (serialized as `{}`) when there is nothing to send.
    pub async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse> {
        self.send(ApiRequest::new(method, path).with_body(body)?)
            .await
    }

    /// `GET path` with an empty body.
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::new(Method::GET, path)).await
    }

    /// `POST path` with `body`.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.call(Method::POST, path, body).await
    }

    /// `PUT path` with `body`.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.call(Method::PUT, path, body).await
    }

    /// `DELETE path` with an empty body.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::new(Method::DELETE, path)).await
    }

    /// Send a prepared [`ApiRequest`].
    pub async fn send(&self, req: ApiRequest) -> Result<ApiResponse> {
        let url = self.endpoint.url(normalize_path(&req.path));

        let mut parts = http::Request::builder()
            .method(req.method.clone())
            .uri(&url)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .body(())?
            .into_parts()
            .0;

        self.signer.sign(&mut parts, &req.body).await?;

        if req.debug {
            self.notify(
                true,
                &DebugEvent::Signed {
                    method: &req.method,
                    url: &url,
                    timestamp: header_str(&parts, X_OVH_TIMESTAMP),
                    signature: header_str(&parts, X_OVH_SIGNATURE),
                },
            );
        }

        debug!("sending {} {url}", req.method);
        let resp = self
            .signer
            .context()
            .http_send(http::Request::from_parts(parts, req.body))
            .await?;

        let (parts, body) = resp.into_parts();
        debug!("{} {url} answered with {}", req.method, parts.status);
        self.notify(
            req.debug,
            &DebugEvent::Response {
                url: &url,
                status: parts.status,
                body: &body,
            },
        );

        let value = serde_json::from_slice(&body).map_err(|e| {
            Error::parse("failed to decode API response")
                .with_source(e)
                .with_context(format!("url: {url}"))
                .with_context(format!("status: {}", parts.status))
        })?;

        Ok(ApiResponse {
            status: parts.status,
            body: value,
        })
    }

    fn notify(&self, enabled: bool, event: &DebugEvent<'_>) {
        if let (true, Some(hook)) = (enabled, &self.debug_hook) {
            hook(event);
        }
    }
}

fn header_str<'a>(parts: &'a http::request::Parts, name: &str) -> &'a str {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
