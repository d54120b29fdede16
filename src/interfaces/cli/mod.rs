//! CLI interface module
//!
//! The terminal admin dashboard and data management commands.

pub mod commands;

use std::fmt;
use std::sync::Arc;

use crate::analytics::{AnalyticsReader, RelayClient, Tracker};
use crate::auth::{AccessGate, LocalAdminGate};
use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::storage::{KeyValueStore, StorageFactory};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
    AccessDenied(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
            CliError::AccessDenied(msg) => format!("Access denied: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
            CliError::AccessDenied(msg) => {
                format!("{} {}", "Access denied:".yellow().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::InvitelyticsError> for CliError {
    fn from(err: crate::errors::InvitelyticsError) -> Self {
        use crate::errors::InvitelyticsError;
        match err {
            InvitelyticsError::Unauthorized(msg) => CliError::AccessDenied(msg),
            InvitelyticsError::Serialization(msg) | InvitelyticsError::Validation(msg) => {
                CliError::ParseError(msg)
            }
            InvitelyticsError::Relay(msg) | InvitelyticsError::Configuration(msg) => {
                CliError::CommandError(msg)
            }
            other => CliError::StorageError(other.to_string()),
        }
    }
}

/// 命令执行所需的存储、读取器和访问控制
pub struct CliContext {
    pub config: Arc<StaticConfig>,
    pub store: Arc<dyn KeyValueStore>,
    pub gate: Arc<dyn AccessGate>,
}

impl CliContext {
    pub fn new(config: Arc<StaticConfig>) -> Result<Self, CliError> {
        let store = StorageFactory::create(&config.storage)
            .map_err(|e| CliError::StorageError(e.to_string()))?;
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Arc<StaticConfig>, store: Arc<dyn KeyValueStore>) -> Self {
        let gate = Arc::new(LocalAdminGate::new(
            Arc::clone(&store),
            config.admin.clone(),
        ));
        Self {
            config,
            store,
            gate,
        }
    }

    pub fn reader(&self) -> AnalyticsReader {
        AnalyticsReader::new(Arc::clone(&self.store))
    }

    /// 新的"标签页"：每次调用得到独立的会话存储
    pub fn tracker(&self) -> Tracker {
        Tracker::new(Arc::clone(&self.store), StorageFactory::tab_store())
            .with_relay(RelayClient::from_config(&self.config.analytics))
    }

    /// 未登录或登录过期时拒绝访问
    pub fn require_admin(&self) -> Result<(), CliError> {
        if self.gate.is_authorized() {
            Ok(())
        } else {
            Err(CliError::AccessDenied(
                "admin login required, run `invitelytics login` first".to_string(),
            ))
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, config: Arc<StaticConfig>) -> Result<(), CliError> {
    // Generate doesn't need storage, handle it separately
    if let Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    } = cmd
    {
        return commands::config_generate(output_path, force).await;
    }
    if let Commands::HashPassword { password, stdin } = cmd {
        return commands::hash_password_command(password, stdin).await;
    }

    let ctx = CliContext::new(config)?;
    if cmd.requires_admin() {
        ctx.require_admin()?;
    }

    match cmd {
        Commands::Login {
            email,
            password,
            stdin,
        } => commands::login(&ctx, email, password, stdin).await,
        Commands::Logout => commands::logout(&ctx).await,
        Commands::Whoami => commands::whoami(&ctx).await,
        Commands::Dashboard { json, watch } => commands::dashboard(&ctx, json, watch).await,
        Commands::Export { path, stdout } => commands::export_data(&ctx, path, stdout).await,
        Commands::Clear { yes } => commands::clear_data(&ctx, yes).await,
        Commands::Send { endpoint } => commands::send_snapshot(&ctx, endpoint).await,
        Commands::Replay { file } => commands::replay_file(&ctx, file).await,
        Commands::Serve => Err(CliError::CommandError(
            "serve is not a CLI command".to_string(),
        )),
        Commands::Config { .. } | Commands::HashPassword { .. } => Ok(()),
    }
}
