use tokio::signal;
use tracing::{info, warn};

/// 等待 Ctrl+C
///
/// 接收端点不持有任何待写入的数据，收到信号后直接返回。
pub async fn listen_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, stopping server...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }
}
