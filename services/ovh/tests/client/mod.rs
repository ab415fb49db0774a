use std::sync::{Arc, Mutex};

use anyhow::Result;
use http::{Method, StatusCode};
use ovhsign_core::{Error, ErrorKind};
use ovhsign_ovh::{signature, ApiRequest, Credential, DebugEvent};
use pretty_assertions::assert_eq;
use serde::Serialize;

use crate::{client, MockHttpSend, SERVER_TIME};

fn credential() -> Credential {
    Credential::new("APP", "SECRET").with_consumer_key("CONS")
}

#[tokio::test]
async fn test_get_me_is_signed() -> Result<()> {
    let mock = MockHttpSend::api(StatusCode::OK, r#"{"nichandle":"xx1234-ovh"}"#);
    let client = client(&mock, credential());

    let resp = client.get("/me").await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["nichandle"], "xx1234-ovh");

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);

    let time = &requests[0];
    assert_eq!(time.method, Method::GET);
    assert_eq!(time.uri, "https://eu.api.ovh.com/1.0/auth/time");

    let me = &requests[1];
    assert_eq!(me.method, Method::GET);
    assert_eq!(me.uri, "https://eu.api.ovh.com/1.0/me");
    assert_eq!(me.body.as_ref(), b"{}");
    assert_eq!(me.headers["content-type"], "application/json");
    assert_eq!(me.headers["x-ovh-application"], "APP");
    assert_eq!(me.headers["x-ovh-consumer"], "CONS");
    assert_eq!(me.headers["x-ovh-timestamp"], SERVER_TIME);
    assert_eq!(
        me.headers["x-ovh-signature"],
        "$1$2ebe79b91c2f41f1c9e18cc1d76b2a1f53e116cb"
    );
    Ok(())
}

#[tokio::test]
async fn test_path_without_leading_slash() -> Result<()> {
    let mock = MockHttpSend::api(StatusCode::OK, "{}");
    let client = client(&mock, credential());

    client.get("me").await?;
    assert_eq!(mock.requests()[1].uri, "https://eu.api.ovh.com/1.0/me");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Record<'a> {
    field_type: &'a str,
    sub_domain: &'a str,
    target: &'a str,
}

#[tokio::test]
async fn test_signed_body_is_sent_body() -> Result<()> {
    let mock = MockHttpSend::api(StatusCode::OK, r#"{"id":42}"#);
    let client = client(&mock, credential());

    let resp = client
        .post(
            "/domain/zone/example.org/record",
            &Record {
                field_type: "A",
                sub_domain: "blog",
                target: "203.0.113.7",
            },
        )
        .await?;
    assert_eq!(resp.body["id"], 42);

    let requests = mock.requests();
    let sent = &requests[1];
    let body = std::str::from_utf8(&sent.body)?;
    assert_eq!(
        body,
        r#"{"fieldType":"A","subDomain":"blog","target":"203.0.113.7"}"#
    );
    assert_eq!(
        sent.headers["x-ovh-signature"],
        "$1$b639956e8a007499bb6b91061b320188ba36be6d"
    );

    // Whatever the body, the signature must cover exactly the bytes sent.
    let expected = signature("SECRET", "CONS", "POST", &sent.uri, body, SERVER_TIME)?;
    assert_eq!(sent.headers["x-ovh-signature"], expected.as_str());
    Ok(())
}

#[tokio::test]
async fn test_query_string_is_signed() -> Result<()> {
    let mock = MockHttpSend::api(StatusCode::OK, "[1,2,3]");
    let client = client(
        &mock,
        Credential::new("7kbG7Bk7S9Nt7ZSV", "EgWIz07P0HYwtQDs")
            .with_consumer_key("MtSwSrPpNjqfVSmJhLbPyr2i45lSwPU1"),
    );

    let resp = client
        .get("/domain/zone/example.org/record?fieldType=A")
        .await?;
    assert_eq!(resp.json::<Vec<u64>>()?, vec![1, 2, 3]);

    let requests = mock.requests();
    let sent = &requests[1];
    assert_eq!(
        sent.uri,
        "https://eu.api.ovh.com/1.0/domain/zone/example.org/record?fieldType=A"
    );
    let expected = signature(
        "EgWIz07P0HYwtQDs",
        "MtSwSrPpNjqfVSmJhLbPyr2i45lSwPU1",
        "GET",
        &sent.uri,
        "{}",
        SERVER_TIME,
    )?;
    assert_eq!(sent.headers["x-ovh-signature"], expected.as_str());
    Ok(())
}

#[tokio::test]
async fn test_error_status_is_returned() -> Result<()> {
    let mock = MockHttpSend::api(
        StatusCode::NOT_FOUND,
        r#"{"message":"The requested object (id = 42) does not exist"}"#,
    );
    let client = client(&mock, credential());

    let resp = client.delete("/domain/zone/example.org/record/42").await?;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(!resp.is_success());
    assert_eq!(
        resp.body["message"],
        "The requested object (id = 42) does not exist"
    );
    assert_eq!(mock.requests()[1].method, Method::DELETE);
    Ok(())
}

#[tokio::test]
async fn test_non_json_response_is_parse_error() {
    let mock = MockHttpSend::api(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>");
    let client = client(&mock, credential());

    let err = client.get("/me").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[tokio::test]
async fn test_empty_response_is_parse_error() {
    let mock = MockHttpSend::api(StatusCode::OK, "");
    let client = client(&mock, credential());

    let err = client.get("/me").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[tokio::test]
async fn test_time_failure_stops_the_call() {
    let mock = MockHttpSend::new(|_| {
        Ok((
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"message":"Service unavailable"}"#,
        ))
    });
    let client = client(&mock, credential());

    let err = client.get("/me").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].uri.ends_with("/auth/time"));
}

#[tokio::test]
async fn test_unreachable_time_stops_the_call() {
    let mock = MockHttpSend::new(|req| {
        if req.uri.ends_with("/auth/time") {
            Err(Error::transport("connection refused"))
        } else {
            Ok((StatusCode::OK, "{}"))
        }
    });
    let client = client(&mock, credential());

    let err = client
        .call(Method::GET, "/me", &serde_json::json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_network_error());

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].uri.ends_with("/auth/time"));
}

#[tokio::test]
async fn test_garbage_time_stops_the_call() {
    let mock = MockHttpSend::new(|_| Ok((StatusCode::OK, "now")));
    let client = client(&mock, credential());

    let err = client.get("/me").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_missing_consumer_key_sends_nothing() {
    let mock = MockHttpSend::api(StatusCode::OK, "{}");
    let client = client(&mock, Credential::new("APP", "SECRET"));

    let err = client.get("/me").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_with_consumer_key() -> Result<()> {
    let mock = MockHttpSend::api(StatusCode::OK, "{}");
    let client = client(&mock, Credential::new("APP", "SECRET"));

    let client = client.with_consumer_key("CONS").await?;
    assert_eq!(client.credential().await?.consumer_key(), Some("CONS"));

    client.get("/me").await?;
    assert_eq!(
        mock.requests()[1].headers["x-ovh-signature"],
        "$1$2ebe79b91c2f41f1c9e18cc1d76b2a1f53e116cb"
    );
    Ok(())
}

#[derive(Debug, PartialEq)]
enum Seen {
    Signed(String, String),
    Response(u16, String),
}

#[tokio::test]
async fn test_debug_hook() -> Result<()> {
    let mock = MockHttpSend::api(StatusCode::OK, r#"{"state":"ok"}"#);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let events = seen.clone();
    let client = client(&mock, credential()).with_debug_hook(move |event| {
        let entry = match event {
            DebugEvent::Signed {
                timestamp,
                signature,
                ..
            } => Seen::Signed(timestamp.to_string(), signature.to_string()),
            DebugEvent::Response { status, body, .. } => Seen::Response(
                status.as_u16(),
                String::from_utf8_lossy(body).to_string(),
            ),
        };
        events.lock().unwrap().push(entry);
    });

    client.get("/me").await?;
    assert!(seen.lock().unwrap().is_empty());

    client
        .send(ApiRequest::new(Method::GET, "/me").with_debug(true))
        .await?;
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            Seen::Signed(
                SERVER_TIME.to_string(),
                "$1$2ebe79b91c2f41f1c9e18cc1d76b2a1f53e116cb".to_string()
            ),
            Seen::Response(200, r#"{"state":"ok"}"#.to_string()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_concurrent_calls() -> Result<()> {
    let mock = MockHttpSend::api(StatusCode::OK, "{}");
    let client = client(&mock, credential());

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move { client.get("/me").await }));
    }
    for task in tasks {
        assert_eq!(task.await??.status, StatusCode::OK);
    }

    let signed = mock
        .requests()
        .into_iter()
        .filter(|r| r.uri.ends_with("/me"))
        .count();
    assert_eq!(signed, 8);
    Ok(())
}
