//! Jenkins webhook relay service.

use anyhow::{Context, Result};
use jenkins_webhook_relay::{Config, LISTEN_ADDR, Relay, start_server};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    run().await.inspect_err(|err| error!(error = ?err, "fatal"))
}

async fn run() -> Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        jenkins_url = %config.jenkins_url,
        jenkins_user = %config.jenkins_user,
        "Configuration loaded"
    );

    let jenkins = config
        .jenkins_client()
        .context("failed to init jenkins client")?;
    jenkins
        .system()
        .ping()
        .await
        .context("failed to init jenkins")?;
    info!("Connected to Jenkins");

    let notifier = config
        .webhook_notifier()
        .context("failed to init webhook notifier")?;

    start_server(Relay::new(jenkins, notifier), LISTEN_ADDR)
        .await
        .context("HTTP server failed")?;
    Ok(())
}

fn init_tracing() -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,jenkins_webhook_relay=debug,tower_http=info"))
        .context("invalid RUST_LOG filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
    Ok(())
}
