//! 导出、清除与转发

use std::path::PathBuf;

use colored::Colorize;
use tracing::warn;

use super::config_gen::confirm;
use crate::analytics::RelayClient;
use crate::interfaces::cli::{CliContext, CliError};

pub async fn export_data(
    ctx: &CliContext,
    path: Option<String>,
    stdout: bool,
) -> Result<(), CliError> {
    let reader = ctx.reader();

    if stdout {
        println!("{}", reader.export_json()?);
        return Ok(());
    }

    let target = path.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let written = reader.export_to_file(&target, chrono::Utc::now())?;
    println!(
        "{} Exported analytics data to {}",
        "✓".green().bold(),
        written.display().to_string().blue()
    );
    Ok(())
}

pub async fn clear_data(ctx: &CliContext, yes: bool) -> Result<(), CliError> {
    if !yes {
        print!(
            "{}",
            "Delete all captured analytics data? [y/N] ".yellow()
        );
        if !confirm()? {
            println!("{}", "Aborted.".red());
            return Ok(());
        }
    }

    ctx.reader().clear();
    println!("{} Analytics data cleared", "✓".green().bold());
    Ok(())
}

pub async fn send_snapshot(ctx: &CliContext, endpoint: Option<String>) -> Result<(), CliError> {
    let analytics = &ctx.config.analytics;
    let endpoint = endpoint.unwrap_or_else(|| analytics.relay_endpoint.clone());
    let timeout = analytics
        .relay_timeout_secs
        .map(std::time::Duration::from_secs);
    let client = RelayClient::new(endpoint, timeout);

    let snapshot = ctx.reader().export();
    let sender = client.clone();
    let result = tokio::task::spawn_blocking(move || sender.send_blocking(&snapshot))
        .await
        .map_err(|e| CliError::CommandError(format!("Send task failed: {}", e)))?;

    match result {
        Ok(ack) => {
            println!(
                "{} {} ({})",
                "✓".green().bold(),
                ack.message,
                client.endpoint().blue()
            );
            Ok(())
        }
        Err(e) => {
            warn!("Analytics send error: {}", e);
            Err(CliError::CommandError(
                "Failed to send analytics data".to_string(),
            ))
        }
    }
}
