use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing::error;

use invitelytics::cli::{Cli, Commands};
use invitelytics::config::init_config;
use invitelytics::interfaces::cli::run_cli_command;
use invitelytics::runtime::modes::run_server;
use invitelytics::system::init_logging;

#[actix_web::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = init_config(cli.config.as_deref());

    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {:#}", "Failed to initialize logging:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = run_server().await {
                error!("Server error: {:#}", e);
                return ExitCode::FAILURE;
            }
        }
        cmd => {
            if let Err(e) = run_cli_command(cmd, config).await {
                eprintln!("{}", e.format_colored());
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
