use crate::constants::{DEFAULT_API_VERSION, DEFAULT_ENDPOINT_NAME, ENDPOINTS};
use ovhsign_core::{Error, Result};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Endpoint is the versioned base url every request is built on.
///
/// All urls are `<base>/<version>/<path>`. The default endpoint is
/// `https://eu.api.ovh.com` with version `1.0`; tests point it at a mock
/// server with [`Endpoint::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
    version: String,
}

impl Endpoint {
    /// Create an endpoint from a base url and an API version.
    ///
    /// Trailing slashes of `base` are dropped.
    pub fn new(base: impl Into<String>, version: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            version: version.into(),
        }
    }

    /// Look up a named endpoint such as `ovh-eu` or `kimsufi-ca`.
    pub fn from_name(name: &str) -> Result<Self> {
        ENDPOINTS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, base)| Self::new(*base, DEFAULT_API_VERSION))
            .ok_or_else(|| {
                Error::config_invalid(format!("unknown OVH endpoint: {name}")).with_context(
                    format!(
                        "known endpoints: {}",
                        ENDPOINTS
                            .iter()
                            .map(|(n, _)| *n)
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                )
            })
    }

    /// Base url without version, e.g. `https://eu.api.ovh.com`.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// API version segment, e.g. `1.0`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Build the fully qualified url for an already normalized path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base, self.version, path)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::from_name(DEFAULT_ENDPOINT_NAME).expect("default endpoint must be known")
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.version)
    }
}
