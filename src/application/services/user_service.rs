//! 用户服务
//!
//! 注册、资料维护、密码修改、博主公开资料

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    NewUser, PasswordHasherPort, ProfileLink, UserRecord, UserRepositoryPort,
};

/// 注册命令
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub nickname: Option<String>,
}

/// 更新用户命令（管理端，字段可选）
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub nickname: Option<String>,
}

/// 更新资料命令（当前用户）
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub profile_background: Option<String>,
    pub bio: Option<String>,
    pub links: Option<Vec<ProfileLink>>,
}

/// 用户服务
pub struct UserService {
    users: Arc<dyn UserRepositoryPort>,
    passwords: Arc<dyn PasswordHasherPort>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepositoryPort>, passwords: Arc<dyn PasswordHasherPort>) -> Self {
        Self { users, passwords }
    }

    /// 创建用户（注册）
    pub async fn register(&self, command: RegisterUser) -> Result<UserRecord, ApplicationError> {
        // 检查用户名是否已存在
        if self
            .users
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(ApplicationError::UserAlreadyExists(
                "用户名已存在".to_string(),
            ));
        }

        // 检查邮箱是否已存在
        if self.users.find_by_email(&command.email).await?.is_some() {
            return Err(ApplicationError::UserAlreadyExists("邮箱已存在".to_string()));
        }

        let password = self
            .passwords
            .hash(&command.password)
            .map_err(|e| ApplicationError::internal(e.to_string()))?;

        let id = self
            .users
            .insert(&NewUser {
                username: command.username,
                email: command.email,
                password,
                nickname: command.nickname,
            })
            .await?;

        tracing::info!(user_id = id, "User registered");

        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::internal("User vanished after insert"))
    }

    /// 获取用户列表（分页）
    pub async fn find_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<UserRecord>, i64), ApplicationError> {
        Ok(self.users.find_page(page, page_size).await?)
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(&self, id: i64) -> Result<UserRecord, ApplicationError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::not_found("用户"))
    }

    /// 更新用户信息
    pub async fn update(&self, id: i64, command: UpdateUser) -> Result<UserRecord, ApplicationError> {
        let mut user = self.find_by_id(id).await?;

        if let Some(username) = command.username {
            user.username = username;
        }
        if let Some(email) = command.email {
            user.email = email;
        }
        if let Some(password) = command.password {
            user.password = self
                .passwords
                .hash(&password)
                .map_err(|e| ApplicationError::internal(e.to_string()))?;
        }
        if let Some(nickname) = command.nickname {
            user.nickname = Some(nickname);
        }

        self.users.update(&user).await?;
        self.find_by_id(id).await
    }

    /// 删除用户（物理删除）
    pub async fn remove(&self, id: i64) -> Result<(), ApplicationError> {
        // 先确认存在，保持 404 语义
        self.find_by_id(id).await?;
        self.users.delete(id).await?;
        Ok(())
    }

    /// 修改密码
    pub async fn change_password(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApplicationError> {
        let mut user = self.find_by_id(id).await?;

        // 验证当前密码
        let valid = self
            .passwords
            .verify(current_password, &user.password)
            .map_err(|e| ApplicationError::internal(e.to_string()))?;
        if !valid {
            return Err(ApplicationError::bad_request("当前密码不正确"));
        }

        user.password = self
            .passwords
            .hash(new_password)
            .map_err(|e| ApplicationError::internal(e.to_string()))?;
        self.users.update(&user).await?;
        Ok(())
    }

    /// 更新用户资料（不包含密码）
    pub async fn update_profile(
        &self,
        id: i64,
        command: UpdateProfile,
    ) -> Result<UserRecord, ApplicationError> {
        let mut user = self.find_by_id(id).await?;

        if let Some(nickname) = command.nickname {
            user.nickname = Some(nickname);
        }
        if let Some(avatar) = command.avatar {
            user.avatar = Some(avatar);
        }
        if let Some(background) = command.profile_background {
            user.profile_background = Some(background);
        }
        if let Some(bio) = command.bio {
            user.bio = Some(bio);
        }
        if let Some(links) = command.links {
            user.links = Some(links);
        }

        self.users.update(&user).await?;
        self.find_by_id(id).await
    }

    /// 获取博主公开资料（最近活跃的启用用户），不存在时返回 None
    pub async fn owner_profile(&self) -> Result<Option<UserRecord>, ApplicationError> {
        Ok(self.users.find_owner().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{test_ports, TestPorts};

    fn service(ports: &TestPorts) -> UserService {
        UserService::new(ports.users.clone(), ports.passwords.clone())
    }

    fn register_command(username: &str, email: &str) -> RegisterUser {
        RegisterUser {
            username: username.to_string(),
            email: email.to_string(),
            password: "Password123".to_string(),
            nickname: Some("Alice".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let ports = test_ports().await;
        let user = service(&ports)
            .register(register_command("alice", "alice@example.com"))
            .await
            .unwrap();
        assert_ne!(user.password, "Password123");
        assert!(ports
            .passwords
            .verify("Password123", &user.password)
            .unwrap());
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let ports = test_ports().await;
        let service = service(&ports);
        service
            .register(register_command("alice", "alice@example.com"))
            .await
            .unwrap();
        let err = service
            .register(register_command("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::UserAlreadyExists(ref m) if m == "用户名已存在"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let ports = test_ports().await;
        let service = service(&ports);
        service
            .register(register_command("alice", "alice@example.com"))
            .await
            .unwrap();
        let err = service
            .register(register_command("bob", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::UserAlreadyExists(ref m) if m == "邮箱已存在"));
    }

    #[tokio::test]
    async fn test_change_password_wrong_current() {
        let ports = test_ports().await;
        let service = service(&ports);
        let user = service
            .register(register_command("alice", "alice@example.com"))
            .await
            .unwrap();
        let err = service
            .change_password(user.id, "wrong", "NewPassword1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::BadRequest(ref m) if m == "当前密码不正确"));
    }

    #[tokio::test]
    async fn test_change_password_success() {
        let ports = test_ports().await;
        let service = service(&ports);
        let user = service
            .register(register_command("alice", "alice@example.com"))
            .await
            .unwrap();
        service
            .change_password(user.id, "Password123", "NewPassword1")
            .await
            .unwrap();
        let updated = service.find_by_id(user.id).await.unwrap();
        assert!(ports
            .passwords
            .verify("NewPassword1", &updated.password)
            .unwrap());
    }

    #[tokio::test]
    async fn test_update_profile_links() {
        let ports = test_ports().await;
        let service = service(&ports);
        let user = service
            .register(register_command("alice", "alice@example.com"))
            .await
            .unwrap();
        let links = vec![ProfileLink {
            order: 1,
            icon: "/uploads/github.png".to_string(),
            name: "GitHub".to_string(),
            url: "https://github.com/alice".to_string(),
        }];
        let updated = service
            .update_profile(
                user.id,
                UpdateProfile {
                    bio: Some("热爱生活".to_string()),
                    links: Some(links.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.bio.as_deref(), Some("热爱生活"));
        assert_eq!(updated.links.as_ref().unwrap(), &links);
    }

    #[tokio::test]
    async fn test_remove_missing_user_is_not_found() {
        let ports = test_ports().await;
        let err = service(&ports).remove(999).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_owner_profile_prefers_active_user() {
        let ports = test_ports().await;
        let service = service(&ports);
        let user = service
            .register(register_command("alice", "alice@example.com"))
            .await
            .unwrap();
        let owner = service.owner_profile().await.unwrap().unwrap();
        assert_eq!(owner.id, user.id);
    }
}
