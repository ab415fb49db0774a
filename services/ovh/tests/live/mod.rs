use std::env;

use anyhow::Result;
use log::{debug, warn};
use ovhsign_core::{Context, OsEnv};
use ovhsign_file_read_tokio::TokioFileRead;
use ovhsign_http_send_reqwest::ReqwestHttpSend;
use ovhsign_ovh::{fetch_server_time, Client, Config, DefaultCredentialProvider};

async fn init_live_client() -> Option<Client> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("OVHSIGN_OVH_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let endpoint = Config::default()
        .from_env(&ctx)
        .from_config_file(&ctx)
        .await
        .expect("ovh.conf must be valid")
        .endpoint()
        .expect("endpoint must name a known OVH endpoint");

    Some(Client::new(ctx, endpoint, DefaultCredentialProvider::new()))
}

#[tokio::test]
async fn test_live_server_time() -> Result<()> {
    let Some(client) = init_live_client().await else {
        warn!("OVHSIGN_OVH_TEST is not set, skipped");
        return Ok(());
    };

    let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
    let timestamp = fetch_server_time(&ctx, client.endpoint()).await?;
    debug!("server time: {timestamp}");
    assert!(timestamp.parse::<u64>()? > 1_600_000_000);
    Ok(())
}

#[tokio::test]
async fn test_live_get_me() -> Result<()> {
    let Some(client) = init_live_client().await else {
        warn!("OVHSIGN_OVH_TEST is not set, skipped");
        return Ok(());
    };

    let resp = client.get("/me").await?;
    debug!("got response: {} {}", resp.status, resp.body);
    assert!(resp.is_success(), "GET /me failed: {}", resp.body);
    assert!(resp.body.get("nichandle").is_some());
    Ok(())
}
