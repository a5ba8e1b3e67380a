//! 认证适配器 - Token 签发与密码哈希的具体实现

mod jwt;
mod password;

pub use jwt::JwtTokenIssuer;
pub use password::Argon2PasswordHasher;
