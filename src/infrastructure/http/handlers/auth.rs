//! Auth Handlers
//!
//! 登录。凭据错误/账号禁用是业务错误（HTTP 200 + success=false），
//! 与守卫的 401 语义刻意区分

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::application::ports::UserRecord;
use crate::application::services::Login;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::ValidatedJson;
use crate::infrastructure::http::state::AppState;

/// 登录请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(
        required(message = "用户名或邮箱不能为空"),
        length(min = 1, message = "用户名或邮箱不能为空")
    )]
    pub username_or_email: Option<String>,

    #[validate(
        required(message = "密码不能为空"),
        length(min = 1, message = "密码不能为空")
    )]
    pub password: Option<String>,
}

/// 登录响应中携带的用户概要
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
}

impl From<&UserRecord> for UserSummary {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// 登录响应
///
/// access_token 字段名是客户端既有契约，保持下划线风格
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserSummary,
}

/// 用户登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let result = state
        .auth_service
        .login(Login {
            username_or_email: request.username_or_email.unwrap_or_default(),
            password: request.password.unwrap_or_default(),
        })
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        LoginResponse {
            access_token: result.access_token,
            user: UserSummary::from(&result.user),
        },
        "登录成功",
    )))
}
