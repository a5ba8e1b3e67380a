//! SQLite User Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::{map_db_err, parse_datetime, DbPool};
use crate::application::ports::{
    page_to_offset, NewUser, ProfileLink, RepositoryError, UserRecord, UserRepositoryPort,
};

pub(crate) const USER_COLUMNS: &str = "id, username, email, password, nickname, avatar, \
     profile_background, bio, links, is_active, created_at, updated_at";

/// SQLite User Repository
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
pub(crate) struct UserRow {
    id: i64,
    username: String,
    email: String,
    password: String,
    nickname: Option<String>,
    avatar: Option<String>,
    profile_background: Option<String>,
    bio: Option<String>,
    links: Option<String>,
    is_active: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let links: Option<Vec<ProfileLink>> = row
            .links
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        Ok(UserRecord {
            id: row.id,
            username: row.username,
            email: row.email,
            password: row.password,
            nickname: row.nickname,
            avatar: row.avatar,
            profile_background: row.profile_background,
            bio: row.bio,
            links,
            is_active: row.is_active != 0,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

fn links_to_json(links: &Option<Vec<ProfileLink>>) -> Result<Option<String>, RepositoryError> {
    links
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<i64, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password, nickname, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.nickname)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_err)?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE username = ?",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_username_or_email(
        &self,
        username_or_email: &str,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE username = ? OR email = ?",
            USER_COLUMNS
        ))
        .bind(username_or_email)
        .bind(username_or_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<UserRecord>, i64), RepositoryError> {
        let (offset, limit) = page_to_offset(page, page_size);

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;

        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            USER_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        let list = rows
            .into_iter()
            .map(UserRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((list, total.0))
    }

    async fn update(&self, user: &UserRecord) -> Result<(), RepositoryError> {
        let links = links_to_json(&user.links)?;
        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, email = ?, password = ?, nickname = ?, avatar = ?,
                profile_background = ?, bio = ?, links = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.nickname)
        .bind(&user.avatar)
        .bind(&user.profile_background)
        .bind(&user.bio)
        .bind(links)
        .bind(user.is_active as i64)
        .bind(Utc::now().to_rfc3339())
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    async fn find_owner(&self) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE is_active = 1 ORDER BY updated_at DESC, id DESC LIMIT 1",
            USER_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(UserRecord::try_from).transpose()
    }
}
