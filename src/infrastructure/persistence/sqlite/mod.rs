//! SQLite Persistence - SQLite 数据库持久化实现

mod category_repo;
mod comment_repo;
mod config_repo;
mod database;
mod image_repo;
mod link_repo;
mod post_repo;
mod tag_repo;
mod user_repo;

pub use category_repo::*;
pub use comment_repo::*;
pub use config_repo::*;
pub use database::*;
pub use image_repo::*;
pub use link_repo::*;
pub use post_repo::*;
pub use tag_repo::*;
pub use user_repo::*;

use chrono::{DateTime, Utc};

use crate::application::ports::RepositoryError;

/// sqlx 错误映射：唯一约束冲突单独归类（check-then-write 竞争的兜底）
pub(crate) fn map_db_err(e: sqlx::Error) -> RepositoryError {
    let message = e.to_string();
    if message.contains("UNIQUE constraint failed") {
        RepositoryError::Duplicate(message)
    } else {
        RepositoryError::DatabaseError(message)
    }
}

/// 解析 RFC3339 时间戳列
pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

/// 解析可空的 RFC3339 时间戳列
pub(crate) fn parse_datetime_opt(
    s: Option<&str>,
) -> Result<Option<DateTime<Utc>>, RepositoryError> {
    s.map(parse_datetime).transpose()
}

/// 构建 IN 子句占位符: "?, ?, ?"
pub(crate) fn in_placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_placeholders() {
        assert_eq!(in_placeholders(1), "?");
        assert_eq!(in_placeholders(3), "?, ?, ?");
    }

    #[test]
    fn test_parse_datetime_roundtrip() {
        let now = Utc::now();
        let parsed = parse_datetime(&now.to_rfc3339()).unwrap();
        assert_eq!(parsed, now);
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime("yesterday").is_err());
    }
}
