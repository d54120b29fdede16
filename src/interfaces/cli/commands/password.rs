//! 生成管理员密码哈希

use std::io::{self, BufRead, IsTerminal, Write};

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::utils::password::hash_password;

/// 交互式输入密码（带确认）
fn prompt_password_with_confirm() -> Result<String, CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::CommandError(
            "No password provided. Use --password or --stdin flag, or run interactively."
                .to_string(),
        ));
    }

    let read = |prompt: &str| -> Result<String, CliError> {
        print!("{}", prompt);
        io::stdout()
            .flush()
            .map_err(|e| CliError::CommandError(e.to_string()))?;
        rpassword::read_password()
            .map_err(|e| CliError::CommandError(format!("Failed to read password: {}", e)))
    };

    let password = read("Enter new password: ")?;
    let confirm = read("Confirm password: ")?;
    if password != confirm {
        return Err(CliError::CommandError("Passwords do not match".to_string()));
    }
    Ok(password)
}

/// 生成可写入 `admin.password` 的 Argon2 哈希
pub fn admin_password_hash(password: &str) -> Result<String, CliError> {
    if password.is_empty() {
        return Err(CliError::CommandError(
            "Password cannot be empty".to_string(),
        ));
    }
    Ok(hash_password(password)?)
}

pub async fn hash_password_command(password: Option<String>, stdin: bool) -> Result<(), CliError> {
    let password = if stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| CliError::CommandError(format!("Failed to read from stdin: {}", e)))?;
        line.trim_end_matches(['\r', '\n']).to_string()
    } else if let Some(pwd) = password {
        pwd
    } else {
        prompt_password_with_confirm()?
    };

    let hash = admin_password_hash(&password)?;
    if io::stdout().is_terminal() {
        println!("{} Put this in [admin] password:", "✓".green().bold());
    }
    println!("{}", hash);
    Ok(())
}
