//! 认证端口
//!
//! Token 签发/校验与密码哈希的抽象接口

use thiserror::Error;

/// Token 载荷
///
/// 登录时写入，守卫校验通过后注入请求上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// 用户 ID
    pub sub: i64,
    pub username: String,
    pub email: String,
}

/// Token 校验错误
///
/// 过期与无效必须区分：二者映射到不同的业务状态码
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Token 签发端口
pub trait TokenIssuerPort: Send + Sync {
    /// 签发 Token
    fn sign(&self, claims: &TokenClaims) -> Result<String, TokenError>;

    /// 校验 Token 并解出载荷
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}

/// 密码哈希错误
#[derive(Debug, Error)]
#[error("Password hash error: {0}")]
pub struct PasswordHashError(pub String);

/// 密码哈希端口
pub trait PasswordHasherPort: Send + Sync {
    /// 哈希明文密码
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// 校验明文密码与哈希是否匹配
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
