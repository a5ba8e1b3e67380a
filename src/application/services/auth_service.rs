//! 认证服务
//!
//! 登录校验与 Token 签发。
//!
//! 注意：登录失败（用户不存在/密码错误/账号禁用）一律是业务错误，
//! HTTP 层以 200 + success=false 返回；只有守卫校验 Token 失败才走 401。

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    PasswordHasherPort, TokenClaims, TokenIssuerPort, UserRecord, UserRepositoryPort,
};

/// 登录命令
#[derive(Debug, Clone)]
pub struct Login {
    pub username_or_email: String,
    pub password: String,
}

/// 登录结果
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub access_token: String,
    pub user: UserRecord,
}

/// 认证服务
pub struct AuthService {
    users: Arc<dyn UserRepositoryPort>,
    tokens: Arc<dyn TokenIssuerPort>,
    passwords: Arc<dyn PasswordHasherPort>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepositoryPort>,
        tokens: Arc<dyn TokenIssuerPort>,
        passwords: Arc<dyn PasswordHasherPort>,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    /// 用户登录
    pub async fn login(&self, command: Login) -> Result<LoginResult, ApplicationError> {
        // 查找用户（用户名或邮箱）
        let user = self
            .users
            .find_by_username_or_email(&command.username_or_email)
            .await?
            .ok_or(ApplicationError::InvalidCredentials)?;

        // 验证密码
        let password_valid = self
            .passwords
            .verify(&command.password, &user.password)
            .map_err(|e| ApplicationError::internal(e.to_string()))?;
        if !password_valid {
            return Err(ApplicationError::InvalidCredentials);
        }

        // 检查用户是否被禁用
        if !user.is_active {
            return Err(ApplicationError::AccountDisabled);
        }

        // 签发 Token
        let claims = TokenClaims {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        };
        let access_token = self
            .tokens
            .sign(&claims)
            .map_err(|e| ApplicationError::internal(e.to_string()))?;

        tracing::info!(user_id = user.id, username = %user.username, "User logged in");

        Ok(LoginResult { access_token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::NewUser;
    use crate::application::services::test_support::{test_ports, TestPorts};

    async fn seed_user(ports: &TestPorts, active: bool) -> i64 {
        let hash = ports.passwords.hash("Password123").unwrap();
        let id = ports
            .users
            .insert(&NewUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: hash,
                nickname: None,
            })
            .await
            .unwrap();
        if !active {
            let mut user = ports.users.find_by_id(id).await.unwrap().unwrap();
            user.is_active = false;
            ports.users.update(&user).await.unwrap();
        }
        id
    }

    fn service(ports: &TestPorts) -> AuthService {
        AuthService::new(
            ports.users.clone(),
            ports.tokens.clone(),
            ports.passwords.clone(),
        )
    }

    #[tokio::test]
    async fn test_login_success_issues_verifiable_token() {
        let ports = test_ports().await;
        let id = seed_user(&ports, true).await;
        let result = service(&ports)
            .login(Login {
                username_or_email: "alice".to_string(),
                password: "Password123".to_string(),
            })
            .await
            .unwrap();

        let claims = ports.tokens.verify(&result.access_token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.username, "alice");
        assert_eq!(result.user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_login_with_email_identifier() {
        let ports = test_ports().await;
        seed_user(&ports, true).await;
        let result = service(&ports)
            .login(Login {
                username_or_email: "alice@example.com".to_string(),
                password: "Password123".to_string(),
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let ports = test_ports().await;
        seed_user(&ports, true).await;
        let err = service(&ports)
            .login(Login {
                username_or_email: "alice".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_invalid_credentials() {
        let ports = test_ports().await;
        let err = service(&ports)
            .login(Login {
                username_or_email: "nobody".to_string(),
                password: "Password123".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_disabled_account() {
        let ports = test_ports().await;
        seed_user(&ports, false).await;
        let err = service(&ports)
            .login(Login {
                username_or_email: "alice".to_string(),
                password: "Password123".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::AccountDisabled));
    }
}
