//! Request a consumer key for an application, then wait for it to be validated.
//!
//! ```shell
//! OVH_APPLICATION_KEY=... OVH_APPLICATION_SECRET=... \
//!     cargo run --example provision_consumer_key
//! ```

use anyhow::Result;
use log::info;
use ovhsign_core::{Context, OsEnv};
use ovhsign_file_read_tokio::TokioFileRead;
use ovhsign_http_send_reqwest::ReqwestHttpSend;
use ovhsign_ovh::{AccessRule, Client, Config, CredentialRequest, DefaultCredentialProvider};

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
    info!("using endpoint {endpoint}");

    let client = Client::new(ctx, endpoint, DefaultCredentialProvider::new());

    let grant = client
        .provision_consumer_key(
            CredentialRequest::new()
                .with_access_rules([AccessRule::get("/me"), AccessRule::get("/domain/*")])
                .with_debug(true),
        )
        .await?;

    println!("consumer key:   {}", grant.consumer_key);
    println!("validate it at: {}", grant.validation_url);
    println!("press enter once validated");
    std::io::stdin().read_line(&mut String::new())?;

    let client = client.with_consumer_key(grant.consumer_key).await?;
    let me = client.get("/me").await?;
    println!("{} {}", me.status, me.body);

    Ok(())
}
