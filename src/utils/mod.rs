pub mod password;

use base64::Engine;
use std::iter;

/// 生成随机字母数字串（订单号、事件 ID 后缀等）
pub fn generate_random_code(length: usize) -> String {
    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// 生成 URL-safe 的随机 token（用于 JWT secret），base64 无填充
pub fn generate_secure_token(bytes: usize) -> String {
    let raw: Vec<u8> = iter::repeat_with(rand::random::<u8>).take(bytes).collect();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(raw)
}

/// Identifier rule shared by content blocks and templates
pub fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_code() {
        let code = generate_random_code(12);
        assert_eq!(code.len(), 12);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_secure_token_is_random() {
        let a = generate_secure_token(32);
        let b = generate_secure_token(32);
        assert_eq!(a.len(), 43);
        assert_ne!(a, b);
        assert_eq!(generate_secure_token(48).len(), 64);
    }

    #[test]
    fn test_is_valid_identifier() {
        assert!(is_valid_identifier("hero-title"));
        assert!(is_valid_identifier("about_1"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("../etc/passwd"));
        assert!(!is_valid_identifier("has space"));
        assert!(!is_valid_identifier(&"a".repeat(129)));
    }
}
