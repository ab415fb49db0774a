//! Call `GET /me` with the credential found in the environment or `~/.ovh.conf`.

use anyhow::Result;
use http::Method;
use ovhsign_core::{Context, OsEnv};
use ovhsign_file_read_tokio::TokioFileRead;
use ovhsign_http_send_reqwest::ReqwestHttpSend;
use ovhsign_ovh::{ApiRequest, Client, Config, DebugEvent, DefaultCredentialProvider};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let endpoint = Config::default()
        .from_env(&ctx)
        .from_config_file(&ctx)
        .await?
        .endpoint()?;

    let client = Client::new(ctx, endpoint, DefaultCredentialProvider::new()).with_debug_hook(
        |event| match event {
            DebugEvent::Signed {
                method,
                url,
                timestamp,
                ..
            } => eprintln!("> {method} {url} @ {timestamp}"),
            DebugEvent::Response { status, body, .. } => {
                eprintln!("< {status} ({} bytes)", body.len())
            }
        },
    );

    let resp = client
        .send(ApiRequest::new(Method::GET, "/me").with_debug(true))
        .await?;
    if !resp.is_success() {
        eprintln!("request failed: {}", resp.body["message"]);
        return Ok(());
    }

    println!("{:#}", resp.body);
    Ok(())
}
