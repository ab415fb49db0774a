use crate::Credential;
use async_trait::async_trait;
use ovhsign_core::{Context, ProvideCredential, Result};

/// StaticCredentialProvider provides the credential given at initialization time.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Create a provider for an application that has no consumer key yet.
    pub fn new(application_key: &str, application_secret: &str) -> Self {
        Self {
            credential: Credential::new(application_key, application_secret),
        }
    }

    /// Set the consumer key.
    pub fn with_consumer_key(mut self, consumer_key: &str) -> Self {
        self.credential = self.credential.with_consumer_key(consumer_key);
        self
    }
}

impl From<Credential> for StaticCredentialProvider {
    fn from(credential: Credential) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}
