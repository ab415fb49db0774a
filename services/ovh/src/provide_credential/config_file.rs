use crate::config::{default_endpoint, load_config_file};
use crate::constants::DEFAULT_ENDPOINT_NAME;
use crate::{Config, Credential};
use async_trait::async_trait;
use log::debug;
use ovhsign_core::{Context, ProvideCredential, Result};

/// ConfigFileCredentialProvider loads the credential from an `ovh.conf` file.
///
/// The file uses the INI layout shared by the official OVH SDKs:
///
/// ```ini
/// [default]
/// endpoint=ovh-eu
///
/// [ovh-eu]
/// application_key=my_app_key
/// application_secret=my_application_secret
/// consumer_key=my_consumer_key
/// ```
///
/// The endpoint section is picked from, in order: the provider setting,
/// `OVH_ENDPOINT`, `endpoint` in `[default]`, then `ovh-eu`. The file path
/// comes from the provider setting, `OVH_CONFIG_FILE`, then `~/.ovh.conf`.
#[derive(Debug, Default, Clone)]
pub struct ConfigFileCredentialProvider {
    config_file: Option<String>,
    endpoint: Option<String>,
}

impl ConfigFileCredentialProvider {
    /// Create a new ConfigFileCredentialProvider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this file instead of the default one.
    pub fn with_config_file(mut self, path: impl Into<String>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Read the credential from this endpoint section.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

#[async_trait]
impl ProvideCredential for ConfigFileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let env_config = Config::default().from_env(ctx);

        let Some((path, ini)) = load_config_file(ctx, self.config_file.as_deref()).await? else {
            return Ok(None);
        };

        let endpoint = self
            .endpoint
            .clone()
            .or(env_config.endpoint)
            .or_else(|| default_endpoint(&ini))
            .unwrap_or_else(|| DEFAULT_ENDPOINT_NAME.to_string());

        let Some(section) = ini.section(Some(endpoint.as_str())) else {
            debug!("section [{endpoint}] not found in {path}");
            return Ok(None);
        };

        match (
            section.get("application_key"),
            section.get("application_secret"),
        ) {
            (Some(ak), Some(as_)) if !ak.is_empty() && !as_.is_empty() => {
                debug!("loading credential from {path} section [{endpoint}]");
                Ok(Some(Credential {
                    application_key: ak.to_string(),
                    application_secret: as_.to_string(),
                    consumer_key: section.get("consumer_key").map(|v| v.to_string()),
                }))
            }
            _ => {
                debug!("incomplete section [{endpoint}] in {path}, skipping");
                Ok(None)
            }
        }
    }
}
