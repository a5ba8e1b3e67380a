//! 应用层错误定义
//!
//! 区分两类结果：
//! - 业务错误（预期内的领域失败，HTTP 层以 200 + success=false 返回）
//! - 传输/框架错误（请求处理本身失败，HTTP 层返回真实状态码）
//!
//! 具体的状态码映射在 infrastructure/http/error.rs 完成

use thiserror::Error;

use super::ports::RepositoryError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到（传输错误，HTTP 404）
    #[error("{resource}不存在")]
    NotFound {
        /// 资源中文名（文章、分类、标签……），直接用于响应消息
        resource: &'static str,
    },

    /// 请求参数错误（传输错误，HTTP 400）
    #[error("{0}")]
    BadRequest(String),

    /// 字段校验失败（传输错误，HTTP 400 + VALIDATION_ERROR）
    #[error("Validation failed")]
    Validation(Vec<String>),

    /// 用户名或邮箱已被占用（业务错误 USER_ALREADY_EXISTS）
    #[error("{0}")]
    UserAlreadyExists(String),

    /// 用户名或密码错误（业务错误 INVALID_CREDENTIALS）
    #[error("用户名或密码错误")]
    InvalidCredentials,

    /// 账号已被禁用（业务错误 ACCOUNT_DISABLED）
    #[error("账号已被禁用")]
    AccountDisabled,

    /// 名称重复（业务错误，通用 BAD_REQUEST 业务码）
    #[error("{0}")]
    DuplicateName(String),

    /// 仓储错误（传输错误，HTTP 500 + DATABASE_ERROR）
    #[error("Repository error: {0}")]
    Repository(String),

    /// 内部错误（传输错误，HTTP 500）
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    /// 创建参数错误
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err.to_string())
    }
}
