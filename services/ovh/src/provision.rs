//! Types of the consumer key provisioning flow.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// HTTP method an access rule grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl Display for AccessMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AccessMethod::Get => "GET",
            AccessMethod::Post => "POST",
            AccessMethod::Put => "PUT",
            AccessMethod::Delete => "DELETE",
        })
    }
}

/// One `(method, path pattern)` pair a consumer key is allowed to use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessRule {
    /// Allowed method.
    pub method: AccessMethod,
    /// Path pattern, `*` matches anything, e.g. `/domain/*`.
    pub path: String,
}

impl AccessRule {
    /// Create a rule.
    pub fn new(method: AccessMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// Allow `GET` on `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(AccessMethod::Get, path)
    }

    /// Allow `POST` on `path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(AccessMethod::Post, path)
    }

    /// Allow `PUT` on `path`.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(AccessMethod::Put, path)
    }

    /// Allow `DELETE` on `path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(AccessMethod::Delete, path)
    }
}

/// Rules requested when the caller does not pick any: GET, POST and PUT on `/*`.
///
/// `DELETE` must be asked for explicitly.
pub fn default_access_rules() -> Vec<AccessRule> {
    vec![
        AccessRule::get("/*"),
        AccessRule::post("/*"),
        AccessRule::put("/*"),
    ]
}

/// Parameters of a consumer key request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialRequest {
    access_rules: Option<Vec<AccessRule>>,
    redirection: Option<String>,
    debug: bool,
}

impl CredentialRequest {
    /// Request the default access rules without redirection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request exactly these rules. They are not merged with the defaults.
    pub fn with_access_rules(mut self, rules: impl IntoIterator<Item = AccessRule>) -> Self {
        self.access_rules = Some(rules.into_iter().collect());
        self
    }

    /// Url the browser is sent to once the key has been validated.
    pub fn with_redirection(mut self, url: impl Into<String>) -> Self {
        self.redirection = Some(url.into());
        self
    }

    /// Report the exchange to the client's debug hook.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Whether the debug hook should see this exchange.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// The JSON payload posted to `/auth/credential`.
    pub fn payload(&self) -> CredentialPayload {
        CredentialPayload {
            access_rules: self
                .access_rules
                .clone()
                .unwrap_or_else(default_access_rules),
            redirection: self.redirection.clone(),
        }
    }
}

/// Body of `POST /auth/credential`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPayload {
    /// Rules granted to the new consumer key.
    pub access_rules: Vec<AccessRule>,
    /// Redirection url, serialized as `null` when absent.
    pub redirection: Option<String>,
}

/// Answer of a successful consumer key request.
///
/// The key is inert until a human opens `validation_url` and approves it;
/// nothing in the API tells the client when that happens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerKeyGrant {
    /// The new consumer key. Persisting it is up to the caller.
    pub consumer_key: String,
    /// Url to open in a browser to approve the key.
    pub validation_url: String,
    /// Credential state reported by the server, e.g. `pendingValidation`.
    #[serde(default)]
    pub state: Option<String>,
}
