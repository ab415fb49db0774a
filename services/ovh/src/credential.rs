use ovhsign_core::utils::Redact;
use ovhsign_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential of an OVH application, optionally with a consumer key.
///
/// The application key and secret are issued when the application is
/// registered. The consumer key is obtained later through
/// [`Client::provision_consumer_key`](crate::Client::provision_consumer_key)
/// and only works once a human has approved it.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Application key, sent as `X-Ovh-Application`.
    pub application_key: String,
    /// Application secret, only ever used inside the signature.
    pub application_secret: String,
    /// Consumer key, sent as `X-Ovh-Consumer`.
    pub consumer_key: Option<String>,
}

impl Credential {
    /// Create a credential without consumer key.
    pub fn new(application_key: impl Into<String>, application_secret: impl Into<String>) -> Self {
        Self {
            application_key: application_key.into(),
            application_secret: application_secret.into(),
            consumer_key: None,
        }
    }

    /// Set the consumer key.
    pub fn with_consumer_key(mut self, consumer_key: impl Into<String>) -> Self {
        self.consumer_key = Some(consumer_key.into());
        self
    }

    /// The consumer key, if one is set and non-empty.
    pub fn consumer_key(&self) -> Option<&str> {
        self.consumer_key.as_deref().filter(|v| !v.is_empty())
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("application_key", &self.application_key)
            .field("application_secret", &Redact::from(&self.application_secret))
            .field("consumer_key", &Redact::from(&self.consumer_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.application_key.is_empty() && !self.application_secret.is_empty()
    }
}
