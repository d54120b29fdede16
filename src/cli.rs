//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for invitelytics using clap's derive macros.

use clap::{Parser, Subcommand};

/// Invitelytics - visitor analytics for event invitation sites
#[derive(Parser)]
#[command(name = "invitelytics")]
#[command(version)]
#[command(about = "Visitor analytics capture, export and admin dashboard", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the analytics relay endpoint (default)
    Serve,

    /// Log in to the admin dashboard
    Login {
        /// Admin email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,

        /// Password (if not provided, will prompt interactively)
        #[arg(long)]
        password: Option<String>,

        /// Read password from stdin (for scripting)
        #[arg(long)]
        stdin: bool,
    },

    /// Log out of the admin dashboard
    Logout,

    /// Show the logged-in admin and remaining session time
    Whoami,

    /// Show captured visitor data
    Dashboard {
        /// Print the raw export JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Refresh every N seconds until interrupted
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },

    /// Export captured data to a JSON file
    Export {
        /// Output file or directory (default: analytics-data-<timestamp>.json)
        path: Option<String>,

        /// Write to stdout instead of a file
        #[arg(long, conflicts_with = "path")]
        stdout: bool,
    },

    /// Delete all captured data
    Clear {
        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Send the current snapshot to the relay endpoint
    Send {
        /// Override analytics.relay_endpoint
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Feed a JSON-lines file of page events through the capture pipeline
    Replay {
        /// Input file, one page event per line
        file: String,
    },

    /// Hash an admin password for the config file
    HashPassword {
        /// Password (if not provided, will prompt interactively)
        #[arg(long)]
        password: Option<String>,

        /// Read password from stdin (for scripting)
        #[arg(long)]
        stdin: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    /// 需要管理员登录的命令
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Commands::Dashboard { .. }
                | Commands::Export { .. }
                | Commands::Clear { .. }
                | Commands::Send { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_flags() {
        let cli = Cli::try_parse_from(["invitelytics", "-c", "site.toml", "export", "--stdout"])
            .unwrap();
        assert_eq!(cli.config.as_deref(), Some("site.toml"));
        match cli.command {
            Some(Commands::Export { path, stdout }) => {
                assert!(stdout);
                assert!(path.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_export_path_conflicts_with_stdout() {
        assert!(Cli::try_parse_from(["invitelytics", "export", "out.json", "--stdout"]).is_err());
    }

    #[test]
    fn test_gated_commands() {
        let cli = Cli::try_parse_from(["invitelytics", "dashboard", "--watch", "5"]).unwrap();
        assert!(cli.command.unwrap().requires_admin());

        let cli = Cli::try_parse_from(["invitelytics", "replay", "events.jsonl"]).unwrap();
        assert!(!cli.command.unwrap().requires_admin());
    }

    #[test]
    fn test_parse_hash_password() {
        let cli = Cli::try_parse_from(["invitelytics", "hash-password", "--stdin"]).unwrap();
        match cli.command {
            Some(Commands::HashPassword { password, stdin }) => {
                assert!(stdin);
                assert!(password.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
