use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::utils::generate_secure_token;

/// 最少 32 字节，保证 HS256 密钥强度
const MIN_SECRET_BYTES: usize = 32;

pub fn gen_secret(bytes: usize) -> Result<(), CliError> {
    if bytes < MIN_SECRET_BYTES {
        return Err(CliError::InputError(format!(
            "Secret must be at least {} bytes",
            MIN_SECRET_BYTES
        )));
    }

    eprintln!("{}", "Set this value as JWT_SECRET:".green());
    println!("{}", generate_secure_token(bytes));
    Ok(())
}
