use anyhow::Result;
use http::{Method, StatusCode};
use ovhsign_core::ErrorKind;
use ovhsign_ovh::{AccessRule, Credential, CredentialRequest};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::{client, MockHttpSend};

const GRANT: &str = r#"{
  "validationUrl": "https://eu.api.ovh.com/auth/?credentialToken=iQ1joJE0OmSPlUAoSw1IvAPWDeaD87ZM64HEDvYq77IKIxr4bIu6fU8OtrPQEeRh",
  "consumerKey": "MtSwSrPpNjqfVSmJhLbPyr2i45lSwPU1",
  "state": "pendingValidation"
}"#;

#[tokio::test]
async fn test_provision_default_rules() -> Result<()> {
    let mock = MockHttpSend::api(StatusCode::OK, GRANT);
    let client = client(&mock, Credential::new("APP", "SECRET"));

    let grant = client
        .provision_consumer_key(CredentialRequest::new())
        .await?;
    assert_eq!(grant.consumer_key, "MtSwSrPpNjqfVSmJhLbPyr2i45lSwPU1");
    assert!(grant
        .validation_url
        .starts_with("https://eu.api.ovh.com/auth/?credentialToken="));
    assert_eq!(grant.state.as_deref(), Some("pendingValidation"));

    let requests = mock.requests();
    assert_eq!(requests.len(), 1, "provisioning must not fetch the server time");

    let req = &requests[0];
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.uri, "https://eu.api.ovh.com/1.0/auth/credential");
    assert_eq!(req.headers["x-ovh-application"], "APP");
    assert_eq!(req.headers["content-type"], "application/json");
    assert!(req.headers.get("x-ovh-signature").is_none());
    assert!(req.headers.get("x-ovh-consumer").is_none());

    let body: Value = serde_json::from_slice(&req.body)?;
    assert_eq!(
        body,
        json!({
            "accessRules": [
                {"method": "GET", "path": "/*"},
                {"method": "POST", "path": "/*"},
                {"method": "PUT", "path": "/*"}
            ],
            "redirection": null
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_provision_custom_rules() -> Result<()> {
    let mock = MockHttpSend::api(StatusCode::OK, GRANT);
    let client = client(&mock, Credential::new("APP", "SECRET"));

    client
        .provision_consumer_key(
            CredentialRequest::new()
                .with_access_rules([
                    AccessRule::get("/domain/*"),
                    AccessRule::delete("/domain/zone/example.org/record/*"),
                ])
                .with_redirection("https://example.org/done"),
        )
        .await?;

    let body: Value = serde_json::from_slice(&mock.requests()[0].body)?;
    assert_eq!(
        body,
        json!({
            "accessRules": [
                {"method": "GET", "path": "/domain/*"},
                {"method": "DELETE", "path": "/domain/zone/example.org/record/*"}
            ],
            "redirection": "https://example.org/done"
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_provision_then_sign() -> Result<()> {
    let mock = MockHttpSend::api(StatusCode::OK, GRANT);
    let client = client(&mock, Credential::new("APP", "SECRET"));

    let grant = client
        .provision_consumer_key(CredentialRequest::new())
        .await?;
    let client = client.with_consumer_key(grant.consumer_key).await?;
    assert_eq!(
        client.credential().await?.consumer_key(),
        Some("MtSwSrPpNjqfVSmJhLbPyr2i45lSwPU1")
    );
    Ok(())
}

#[tokio::test]
async fn test_provision_rejected() {
    let mock = MockHttpSend::api(
        StatusCode::FORBIDDEN,
        r#"{"message":"Invalid application key"}"#,
    );
    let client = client(&mock, Credential::new("BAD", "SECRET"));

    let err = client
        .provision_consumer_key(CredentialRequest::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.context().iter().any(|c| c.contains("403")));
    assert!(err
        .context()
        .iter()
        .any(|c| c.contains("Invalid application key")));
}
