use tokio::process::Command;
use tracing::{error, info};

use crate::config::ReportConfig;

/// Hands the finished collection off to the downstream word-cloud report
/// generator, invoked once per run with the collection name and the run's
/// date range. Failures are logged and never fatal.
pub async fn generate(config: &ReportConfig, collection: &str, since: &str, until: &str) {
    info!("running report generator for {}", collection);

    let status = Command::new(&config.command)
        .args(&config.args)
        .arg(collection)
        .arg(since)
        .arg(until)
        .status()
        .await;

    match status {
        Ok(status) if status.success() => {}
        Ok(status) => error!("report generator exited with {}", status),
        Err(err) => error!("failed to run report generator: {}", err),
    }
}
