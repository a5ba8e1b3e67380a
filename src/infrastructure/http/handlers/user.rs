//! User Handlers
//!
//! 注册、用户管理、当前用户资料、博主公开资料

use axum::{extract::State, http::StatusCode, Json};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

use super::PageQuery;
use crate::application::ports::{ProfileLink, UserRecord};
use crate::application::services::{RegisterUser, UpdateProfile, UpdateUser};
use crate::infrastructure::http::dto::{ApiResponse, PaginationData};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiPath, ApiQuery, CurrentUser, ValidatedJson};
use crate::infrastructure::http::state::AppState;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Invalid username regex"));

// ============================================================================
// DTOs
// ============================================================================

/// 注册请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        required(message = "用户名不能为空"),
        length(min = 3, max = 50, message = "用户名长度为3-50个字符"),
        regex(path = *USERNAME_RE, message = "用户名只能包含字母、数字和下划线")
    )]
    pub username: Option<String>,

    #[validate(
        required(message = "邮箱不能为空"),
        email(message = "邮箱格式不正确")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "密码不能为空"),
        length(min = 6, max = 20, message = "密码长度为6-20个字符")
    )]
    pub password: Option<String>,

    #[validate(length(max = 50, message = "昵称最多50个字符"))]
    pub nickname: Option<String>,
}

/// 更新用户请求（管理端）
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 3, max = 50, message = "用户名长度为3-50个字符"),
        regex(path = *USERNAME_RE, message = "用户名只能包含字母、数字和下划线")
    )]
    pub username: Option<String>,

    #[validate(email(message = "邮箱格式不正确"))]
    pub email: Option<String>,

    #[validate(length(min = 6, max = 20, message = "密码长度为6-20个字符"))]
    pub password: Option<String>,

    #[validate(length(max = 50, message = "昵称最多50个字符"))]
    pub nickname: Option<String>,
}

/// 修改密码请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(
        required(message = "当前密码不能为空"),
        length(min = 1, message = "当前密码不能为空")
    )]
    pub current_password: Option<String>,

    #[validate(
        required(message = "新密码不能为空"),
        length(min = 6, max = 20, message = "新密码长度为6-20个字符")
    )]
    pub new_password: Option<String>,
}

/// 个人主页外链
#[derive(Debug, Deserialize, Validate)]
pub struct ProfileLinkRequest {
    pub order: i64,

    #[validate(length(max = 500, message = "图标URL最多500个字符"))]
    pub icon: String,

    #[validate(length(max = 50, message = "链接名称最多50个字符"))]
    pub name: String,

    #[validate(length(max = 500, message = "链接URL最多500个字符"))]
    pub url: String,
}

/// 更新资料请求（当前用户）
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 50, message = "昵称最多50个字符"))]
    pub nickname: Option<String>,

    #[validate(length(max = 255, message = "头像URL最多255个字符"))]
    pub avatar: Option<String>,

    #[validate(length(max = 500, message = "背景图URL最多500个字符"))]
    pub profile_background: Option<String>,

    #[validate(length(max = 200, message = "个性签名最多200个字符"))]
    pub bio: Option<String>,

    #[validate(nested)]
    pub links: Option<Vec<ProfileLinkRequest>>,
}

/// 博主公开资料
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfileResponse {
    pub id: i64,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub profile_background: Option<String>,
    pub links: Option<Vec<ProfileLink>>,
}

impl From<UserRecord> for OwnerProfileResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            nickname: user.nickname,
            avatar: user.avatar,
            profile_background: user.profile_background,
            links: user.links,
        }
    }
}

/// 操作结果消息
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// 用户注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserRecord>>), ApiError> {
    let user = state
        .user_service
        .register(RegisterUser {
            username: request.username.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            password: request.password.unwrap_or_default(),
            nickname: request.nickname,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::created(user))))
}

/// 获取用户列表（分页）
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<ApiResponse<PaginationData<UserRecord>>>, ApiError> {
    let (list, total) = state
        .user_service
        .find_page(query.page, query.page_size)
        .await?;

    Ok(Json(ApiResponse::paginated(
        list,
        total,
        query.page,
        query.page_size,
    )))
}

/// 修改密码（当前用户）
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .user_service
        .change_password(
            current_user.id,
            &request.current_password.unwrap_or_default(),
            &request.new_password.unwrap_or_default(),
        )
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "密码修改成功".to_string(),
    })))
}

/// 更新当前用户资料
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserRecord>>, ApiError> {
    let links = request.links.map(|links| {
        links
            .into_iter()
            .map(|link| ProfileLink {
                order: link.order,
                icon: link.icon,
                name: link.name,
                url: link.url,
            })
            .collect()
    });

    let user = state
        .user_service
        .update_profile(
            current_user.id,
            UpdateProfile {
                nickname: request.nickname,
                avatar: request.avatar,
                profile_background: request.profile_background,
                bio: request.bio,
                links,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(user)))
}

/// 获取当前用户资料
pub async fn my_profile(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<UserRecord>>, ApiError> {
    let user = state.user_service.find_by_id(current_user.id).await?;
    Ok(Json(ApiResponse::success_with_message(user, "获取成功")))
}

/// 获取博主公开资料（不存在时 data 为 null）
pub async fn owner_profile(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Option<OwnerProfileResponse>>>, ApiError> {
    let owner = state.user_service.owner_profile().await?;
    Ok(Json(ApiResponse::success_with_message(
        owner.map(OwnerProfileResponse::from),
        "获取成功",
    )))
}

/// 获取用户详情
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<UserRecord>>, ApiError> {
    let user = state.user_service.find_by_id(id).await?;
    Ok(Json(ApiResponse::success_with_message(user, "获取成功")))
}

/// 更新用户信息
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserRecord>>, ApiError> {
    let user = state
        .user_service
        .update(
            id,
            UpdateUser {
                username: request.username,
                email: request.email,
                password: request.password,
                nickname: request.nickname,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(user)))
}

/// 删除用户
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    state.user_service.remove(id).await?;
    Ok(Json(ApiResponse::success(Value::Null)))
}
