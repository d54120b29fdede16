//! 管理员密码校验
//!
//! 配置中的密码可以是明文，也可以是 Argon2 哈希（`$argon2` 开头）。

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use subtle::ConstantTimeEq;

use crate::errors::{InvitelyticsError, Result};

/// 对密码进行 Argon2id 哈希，用于生成配置文件中的密码
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| InvitelyticsError::configuration(format!("Password hash error: {}", e)))
}

/// 检测字符串是否是 Argon2 哈希格式
pub fn is_argon2_hash(s: &str) -> bool {
    s.starts_with("$argon2")
}

/// 校验输入的密码
///
/// 哈希格式损坏视为配置错误；明文按常量时间比较。
pub fn verify_password(input: &str, configured: &str) -> Result<bool> {
    if is_argon2_hash(configured) {
        let parsed = PasswordHash::new(configured).map_err(|e| {
            InvitelyticsError::configuration(format!("Invalid admin password hash: {}", e))
        })?;
        if parsed.salt.is_none() || parsed.hash.is_none() {
            return Err(InvitelyticsError::configuration(
                "Invalid admin password hash: missing salt or digest",
            ));
        }
        return Ok(Argon2::default()
            .verify_password(input.as_bytes(), &parsed)
            .is_ok());
    }

    Ok(input.as_bytes().ct_eq(configured.as_bytes()).into())
}
