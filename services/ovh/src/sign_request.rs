//! OVH request signer.

use std::fmt::Write;

use async_trait::async_trait;
use http::header::HeaderName;
use http::HeaderValue;
use log::debug;
use ovhsign_core::hash::hex_sha1;
use ovhsign_core::utils::Redact;
use ovhsign_core::{Context, Error, Result, SignRequest};

use crate::constants::*;
use crate::time::fetch_server_time;
use crate::{Credential, Endpoint};

/// RequestSigner that implements the OVH API authentication.
///
/// Every call fetches a fresh timestamp from the server before signing; a
/// signature is only valid for the exact method, url, body and timestamp it
/// was computed from.
///
/// - [First steps with the OVHcloud APIs](https://help.ovhcloud.com/csm/en-gb-api-getting-started-ovhcloud-api)
#[derive(Debug, Clone, Default)]
pub struct RequestSigner {
    endpoint: Endpoint,
}

impl RequestSigner {
    /// Create a signer fetching the server time from `endpoint`.
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut http::request::Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let cred = credential.ok_or_else(|| Error::credential_invalid("missing credential"))?;
        let consumer_key = cred.consumer_key().ok_or_else(|| {
            Error::credential_invalid("consumer key is required to sign requests")
                .with_context("hint: provision one with Client::provision_consumer_key")
        })?;
        let body = std::str::from_utf8(body).map_err(|e| {
            Error::request_invalid("request body must be valid utf-8").with_source(e)
        })?;

        let payload = SigningPayload {
            method: req.method.as_str().to_uppercase(),
            url: req.uri.to_string(),
            body,
            timestamp: fetch_server_time(ctx, &self.endpoint).await?,
        };

        debug!(
            "string to sign: {}",
            payload.string_to_sign(
                &Redact::from(&cred.application_secret).to_string(),
                &Redact::from(consumer_key).to_string(),
            )?
        );
        let SignedPayload {
            timestamp,
            signature,
        } = payload.sign(&cred.application_secret, consumer_key)?;

        req.headers.insert(
            HeaderName::from_static(X_OVH_APPLICATION),
            HeaderValue::from_str(&cred.application_key)?,
        );
        req.headers.insert(
            HeaderName::from_static(X_OVH_TIMESTAMP),
            HeaderValue::from_str(&timestamp)?,
        );
        req.headers.insert(HeaderName::from_static(X_OVH_SIGNATURE), {
            let mut value = HeaderValue::from_str(&signature)?;
            value.set_sensitive(true);
            value
        });
        req.headers.insert(HeaderName::from_static(X_OVH_CONSUMER), {
            let mut value = HeaderValue::from_str(consumer_key)?;
            value.set_sensitive(true);
            value
        });

        Ok(())
    }
}

/// Everything a signature covers besides the credential.
///
/// A payload is consumed by [`SigningPayload::sign`]: the timestamp inside
/// it is only meant to sign one request.
#[derive(Debug)]
pub struct SigningPayload<'a> {
    /// Uppercase HTTP method.
    pub method: String,
    /// Fully qualified url, query string included.
    pub url: String,
    /// Serialized body, `{}` when there is nothing to send.
    pub body: &'a str,
    /// Server timestamp, as returned by `/auth/time`.
    pub timestamp: String,
}

/// Header values produced by signing a [`SigningPayload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    /// Value of `X-Ovh-Timestamp`.
    pub timestamp: String,
    /// Value of `X-Ovh-Signature`.
    pub signature: String,
}

impl SigningPayload<'_> {
    fn string_to_sign(&self, application_secret: &str, consumer_key: &str) -> Result<String> {
        string_to_sign(
            application_secret,
            consumer_key,
            &self.method,
            &self.url,
            self.body,
            &self.timestamp,
        )
    }

    /// Sign this payload with the application secret and the consumer key.
    pub fn sign(self, application_secret: &str, consumer_key: &str) -> Result<SignedPayload> {
        let signature = signature(
            application_secret,
            consumer_key,
            &self.method,
            &self.url,
            self.body,
            &self.timestamp,
        )?;

        Ok(SignedPayload {
            timestamp: self.timestamp,
            signature,
        })
    }
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// ApplicationSecret + "+" +
/// ConsumerKey + "+" +
/// METHOD + "+" +
/// FullUrl + "+" +
/// Body + "+" +
/// Timestamp
/// ```
///
/// `FullUrl` includes the query string and `Body` is the serialized payload,
/// both byte for byte as they are sent.
pub fn string_to_sign(
    application_secret: &str,
    consumer_key: &str,
    method: &str,
    url: &str,
    body: &str,
    timestamp: &str,
) -> Result<String> {
    let mut s = String::with_capacity(
        application_secret.len() + consumer_key.len() + url.len() + body.len() + 32,
    );
    for (idx, field) in [application_secret, consumer_key, method, url, body, timestamp]
        .into_iter()
        .enumerate()
    {
        if idx != 0 {
            s.write_str(SIGNATURE_DELIMITER)?;
        }
        s.write_str(field)?;
    }

    Ok(s)
}

/// Compute the `$1$<sha1 hex>` signature of a request.
pub fn signature(
    application_secret: &str,
    consumer_key: &str,
    method: &str,
    url: &str,
    body: &str,
    timestamp: &str,
) -> Result<String> {
    let s = string_to_sign(application_secret, consumer_key, method, url, body, timestamp)?;
    Ok(format!("{SIGNATURE_PREFIX}{}", hex_sha1(s.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_string_to_sign() -> Result<()> {
        let s = string_to_sign(
            "SECRET",
            "CONS",
            "GET",
            "https://eu.api.ovh.com/1.0/me",
            "{}",
            "1700000000",
        )?;
        assert_eq!(s, "SECRET+CONS+GET+https://eu.api.ovh.com/1.0/me+{}+1700000000");
        Ok(())
    }

    #[test]
    fn test_string_to_sign_keeps_empty_fields() -> Result<()> {
        let s = string_to_sign("SECRET", "", "DELETE", "https://x/1.0/a", "", "1")?;
        assert_eq!(s, "SECRET++DELETE+https://x/1.0/a++1");
        Ok(())
    }

    #[test]
    fn test_signature_vectors() -> Result<()> {
        let cases = vec![
            (
                ("SECRET", "CONS", "GET", "https://eu.api.ovh.com/1.0/me", "{}", "1700000000"),
                "$1$2ebe79b91c2f41f1c9e18cc1d76b2a1f53e116cb",
            ),
            (
                (
                    "EgWIz07P0HYwtQDs",
                    "MtSwSrPpNjqfVSmJhLbPyr2i45lSwPU1",
                    "GET",
                    "https://eu.api.ovh.com/1.0/domain/zone/example.org/record?fieldType=A",
                    "{}",
                    "1366560945",
                ),
                "$1$b3616cc7de183a361a72b1b823b01da6b1815989",
            ),
            (
                (
                    "SECRET",
                    "CONS",
                    "POST",
                    "https://eu.api.ovh.com/1.0/domain/zone/example.org/record",
                    r#"{"fieldType":"A","subDomain":"blog","target":"203.0.113.7"}"#,
                    "1700000000",
                ),
                "$1$b639956e8a007499bb6b91061b320188ba36be6d",
            ),
            (
                (
                    "SECRET",
                    "CONS",
                    "DELETE",
                    "https://eu.api.ovh.com/1.0/domain/zone/example.org/record/42",
                    "",
                    "1700000000",
                ),
                "$1$c433df956c7c5b08f91e90adef2c34524737e908",
            ),
        ];

        for ((secret, ck, method, url, body, ts), expected) in cases {
            assert_eq!(signature(secret, ck, method, url, body, ts)?, expected);
        }
        Ok(())
    }

    #[test]
    fn test_signing_payload() -> Result<()> {
        let signed = SigningPayload {
            method: "GET".to_string(),
            url: "https://eu.api.ovh.com/1.0/me".to_string(),
            body: "{}",
            timestamp: "1700000000".to_string(),
        }
        .sign("SECRET", "CONS")?;

        assert_eq!(
            signed,
            SignedPayload {
                timestamp: "1700000000".to_string(),
                signature: "$1$2ebe79b91c2f41f1c9e18cc1d76b2a1f53e116cb".to_string(),
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_without_consumer_key_fails_before_network() {
        // The default context has no transport: reaching the network would
        // surface as a transport error instead.
        let ctx = Context::new();
        let mut parts = http::Request::get("https://eu.api.ovh.com/1.0/me")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let err = RequestSigner::default()
            .sign_request(
                &ctx,
                &mut parts,
                EMPTY_JSON_BODY,
                Some(&Credential::new("APP", "SECRET")),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ovhsign_core::ErrorKind::CredentialInvalid);
        assert!(parts.headers.is_empty());
    }

    #[tokio::test]
    async fn test_sign_without_credential_fails() {
        let mut parts = http::Request::get("https://eu.api.ovh.com/1.0/me")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let err = RequestSigner::default()
            .sign_request(&Context::new(), &mut parts, EMPTY_JSON_BODY, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ovhsign_core::ErrorKind::CredentialInvalid);
    }
}
