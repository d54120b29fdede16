//! 管理员登录 / 登出

use std::io::{self, BufRead, IsTerminal, Write};

use colored::Colorize;

use crate::interfaces::cli::{CliContext, CliError};
use crate::utils::format_duration;

fn read_line(prompt: &str) -> Result<String, CliError> {
    print!("{}", prompt);
    io::stdout()
        .flush()
        .map_err(|e| CliError::CommandError(e.to_string()))?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| CliError::CommandError(format!("Failed to read from stdin: {}", e)))?;
    Ok(line.trim().to_string())
}

/// 从不同来源获取密码
fn get_password(password: Option<String>, stdin: bool) -> Result<String, CliError> {
    if stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| CliError::CommandError(format!("Failed to read from stdin: {}", e)))?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }

    if let Some(pwd) = password {
        return Ok(pwd);
    }

    if !io::stdin().is_terminal() {
        return Err(CliError::CommandError(
            "No password provided. Use --password or --stdin flag, or run interactively."
                .to_string(),
        ));
    }

    print!("Password: ");
    io::stdout()
        .flush()
        .map_err(|e| CliError::CommandError(e.to_string()))?;
    rpassword::read_password()
        .map_err(|e| CliError::CommandError(format!("Failed to read password: {}", e)))
}

pub async fn login(
    ctx: &CliContext,
    email: Option<String>,
    password: Option<String>,
    stdin: bool,
) -> Result<(), CliError> {
    if ctx.gate.is_authorized()
        && let Some(user) = ctx.gate.current_user()
    {
        println!("{} Already logged in as {}", "ℹ".bold().blue(), user.cyan());
        return Ok(());
    }

    let email = match email {
        Some(email) => email,
        None if stdin => ctx.config.admin.email.clone(),
        None => read_line("Email: ")?,
    };
    let password = get_password(password, stdin)?;

    let session = ctx.gate.login(&email, &password)?;
    println!(
        "{} Logged in as {} (session valid for {}h)",
        "✓".green().bold(),
        session.email.cyan(),
        ctx.config.admin.session_hours
    );
    Ok(())
}

pub async fn logout(ctx: &CliContext) -> Result<(), CliError> {
    ctx.gate.logout();
    println!("{} Logged out", "✓".green().bold());
    Ok(())
}

pub async fn whoami(ctx: &CliContext) -> Result<(), CliError> {
    if !ctx.gate.is_authorized() {
        println!("{} Not logged in", "ℹ".bold().blue());
        return Ok(());
    }

    let user = ctx.gate.current_user().unwrap_or_default();
    let remaining = ctx
        .gate
        .session_time_remaining()
        .map(|d| d.num_seconds().max(0) as u64)
        .unwrap_or(0);
    println!("{}", "Admin Session".bold().green());
    println!("  {}:      {}", "Email".cyan(), user);
    println!("  {}:  {}", "Expires in".cyan(), format_duration(remaining));
    Ok(())
}
