use anyhow::Result;
use bytes::Bytes;
use ovhsign_core::Context;
use ovhsign_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Timeouts and pooling live on the reqwest client, not in ovhsign.
    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .user_agent("ovhsign-example/0.1")
        .build()?;

    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));

    let req = http::Request::get("https://eu.api.ovh.com/1.0/auth/time").body(Bytes::new())?;

    match ctx.http_send_as_string(req).await {
        Ok(resp) => {
            println!("status: {}", resp.status());
            println!("server time: {}", resp.body());
        }
        Err(e) => eprintln!("request failed: {e}"),
    }

    Ok(())
}
