//! hash-password 命令：生成 ADMIN_PASSWORD_HASH

use colored::Colorize;
use std::io::{self, BufRead, IsTerminal, Write};

use crate::interfaces::cli::CliError;
use crate::utils::password::hash_password as argon2_hash;

/// 从不同来源获取密码
fn get_password(password: Option<String>, stdin: bool) -> Result<String, CliError> {
    if stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| CliError::InputError(format!("Failed to read from stdin: {}", e)))?;
        Ok(line.trim().to_string())
    } else if let Some(pwd) = password {
        Ok(pwd)
    } else {
        prompt_password_with_confirm()
    }
}

/// 交互式输入密码（带确认）
fn prompt_password_with_confirm() -> Result<String, CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::InputError(
            "No password provided. Use --password or --stdin flag, or run interactively."
                .to_string(),
        ));
    }

    let read = |prompt: &str| -> Result<String, CliError> {
        print!("{}", prompt);
        io::stdout()
            .flush()
            .map_err(|e| CliError::InputError(e.to_string()))?;
        rpassword::read_password()
            .map_err(|e| CliError::InputError(format!("Failed to read password: {}", e)))
    };

    let password = read("Enter admin password: ")?;
    let confirm = read("Confirm password: ")?;

    if password != confirm {
        return Err(CliError::InputError("Passwords do not match".to_string()));
    }
    Ok(password)
}

pub fn hash_password(password: Option<String>, stdin: bool) -> Result<(), CliError> {
    let password = get_password(password, stdin)?;
    if password.is_empty() {
        return Err(CliError::InputError("Password cannot be empty".to_string()));
    }

    let hash = argon2_hash(&password)
        .map_err(|e| CliError::CommandError(format!("Failed to hash password: {}", e)))?;

    eprintln!("{}", "Set this value as ADMIN_PASSWORD_HASH:".green());
    println!("{}", hash);
    Ok(())
}
