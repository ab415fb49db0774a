use anyhow::Result;
use ovhsign_core::{Context, OsEnv};
use ovhsign_file_read_tokio::TokioFileRead;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    let ctx = Context::new().with_file_read(TokioFileRead).with_env(OsEnv);

    let path = env::args().nth(1).unwrap_or_else(|| "~/.ovh.conf".to_string());
    let Some(path) = ctx.expand_home_dir(&path) else {
        eprintln!("cannot expand {path}: home directory unknown");
        return Ok(());
    };

    match ctx.file_read_as_string(&path).await {
        Ok(content) => {
            println!("read {} bytes from {path}", content.len());
            // Only print section headers, the rest holds secrets.
            for line in content.lines().filter(|l| l.trim_start().starts_with('[')) {
                println!("{line}");
            }
        }
        Err(e) => eprintln!("failed to read {path}: {e}"),
    }

    Ok(())
}
