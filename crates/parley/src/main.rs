use std::sync::Arc;

use color_eyre::eyre::{Context, Result};
use parley_tools::{Config, ToolService};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .from_env_lossy()
                .add_directive("parley=info".parse()?)
                .add_directive("parley_tools=info".parse()?)
                .add_directive("parley_bridge=info".parse()?)
                .add_directive("parley_db=info".parse()?),
        )
        .init();

    let config = Config::from_env().wrap_err("Failed to resolve configuration")?;
    info!(
        store = %config.store_path.display(),
        bridge = %config.bridge_url,
        "Parley tool server starting"
    );

    let service = Arc::new(ToolService::new(&config).wrap_err("Failed to create tool service")?);

    let (out_tx, mut out_rx) = mpsc::channel::<String>(100);
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = out_rx.recv().await {
            if stdout.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if stdout.flush().await.is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.wrap_err("Failed to read from stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let service = service.clone();
        let out_tx = out_tx.clone();
        tokio::spawn(async move {
            let response = service.handle_line(&line).await;
            if out_tx.send(response.to_line()).await.is_err() {
                tracing::error!("Response writer closed");
            }
        });
    }

    // The writer exits once every in-flight call has answered.
    drop(out_tx);
    writer.await.wrap_err("Response writer panicked")?;
    service.close().await;

    info!("stdin closed, shutting down");
    Ok(())
}
