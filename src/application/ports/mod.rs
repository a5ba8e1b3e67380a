//! 应用层端口定义
//!
//! 六边形架构的出站端口：
//! - 各实体的 Repository 抽象（SQLite 实现位于 infrastructure/persistence）
//! - 认证端口（Token 签发/校验、密码哈希，实现位于 infrastructure/auth）

mod auth;
mod comments;
mod images;
mod links;
mod posts;
mod site_config;
mod taxonomy;
mod users;

pub use auth::*;
pub use comments::*;
pub use images::*;
pub use links::*;
pub use posts::*;
pub use site_config::*;
pub use taxonomy::*;
pub use users::*;

use thiserror::Error;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// 分页参数归一化：page 和 pageSize 最小为 1 / 0
///
/// 返回 (offset, limit)，page 小于 1 时按第 1 页处理
pub fn page_to_offset(page: i64, page_size: i64) -> (i64, i64) {
    let page = page.max(1);
    let page_size = page_size.max(0);
    ((page - 1) * page_size, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_to_offset() {
        assert_eq!(page_to_offset(1, 10), (0, 10));
        assert_eq!(page_to_offset(3, 10), (20, 10));
        assert_eq!(page_to_offset(0, 10), (0, 10));
        assert_eq!(page_to_offset(2, 0), (0, 0));
    }
}
