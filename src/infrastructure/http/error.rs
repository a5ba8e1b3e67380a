//! HTTP 错误边界
//!
//! 两类错误在此收敛为统一响应：
//! - Business: 业务失败。HTTP 恒为 200，code 取业务状态码
//! - Transport: 传输/框架失败。HTTP 取真实状态码，code 由固定映射表导出
//!
//! 所有响应路径都经过本模块，不允许未包装的错误体泄漏给客户端

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use super::dto::{code, ApiResponse};
use crate::application::error::ApplicationError;

/// HTTP 状态码 -> 业务状态码（固定映射，纯函数）
pub fn business_code_for(status: StatusCode) -> i32 {
    match status {
        StatusCode::BAD_REQUEST => code::BAD_REQUEST,
        StatusCode::UNAUTHORIZED => code::UNAUTHORIZED,
        StatusCode::FORBIDDEN => code::FORBIDDEN,
        StatusCode::NOT_FOUND => code::NOT_FOUND,
        StatusCode::INTERNAL_SERVER_ERROR => code::INTERNAL_ERROR,
        _ => code::INTERNAL_ERROR,
    }
}

/// API 错误（边界层标签联合）
#[derive(Debug)]
pub enum ApiError {
    /// 业务失败：HTTP 200 + success=false
    Business {
        code: i32,
        message: String,
        data: Option<Value>,
    },

    /// 传输/框架失败：真实 HTTP 状态码；code 可覆盖映射表
    Transport {
        status: StatusCode,
        code: Option<i32>,
        message: String,
    },
}

impl ApiError {
    /// 业务失败
    pub fn business(code: i32, message: impl Into<String>) -> Self {
        Self::Business {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// 请求参数错误（HTTP 400）
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Transport {
            status: StatusCode::BAD_REQUEST,
            code: None,
            message: message.into(),
        }
    }

    /// 认证失败（HTTP 401，code 区分 UNAUTHORIZED / TOKEN_EXPIRED / INVALID_TOKEN）
    pub fn unauthorized(code: i32, message: impl Into<String>) -> Self {
        Self::Transport {
            status: StatusCode::UNAUTHORIZED,
            code: Some(code),
            message: message.into(),
        }
    }

    /// 资源不存在（HTTP 404）
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::Transport {
            status: StatusCode::NOT_FOUND,
            code: None,
            message: message.into(),
        }
    }

    /// 字段校验失败：多条消息合并为一条，强制 VALIDATION_ERROR（HTTP 400）
    pub fn validation(mut messages: Vec<String>) -> Self {
        // 排序保证同一输入产生同一消息
        messages.sort();
        Self::Transport {
            status: StatusCode::BAD_REQUEST,
            code: Some(code::VALIDATION_ERROR),
            message: messages.join(", "),
        }
    }

    /// 内部错误（HTTP 500）
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Transport {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: None,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Business {
                code,
                message,
                data,
            } => {
                tracing::warn!(code, error = %message, "Business fault");
                let response = match data {
                    Some(data) => ApiResponse::fail_with_data(code, message, data),
                    None => ApiResponse::fail(code, message),
                };
                // 业务失败的 HTTP 传输是成功的
                (StatusCode::OK, Json(response)).into_response()
            }
            ApiError::Transport {
                status,
                code: code_override,
                message,
            } => {
                let business_code = code_override.unwrap_or_else(|| business_code_for(status));
                if status.is_server_error() {
                    tracing::error!(code = business_code, status = %status.as_u16(), error = %message, "Transport fault");
                } else {
                    tracing::warn!(code = business_code, status = %status.as_u16(), error = %message, "Transport fault");
                }
                let response: ApiResponse<Value> = ApiResponse::fail(business_code, message);
                (status, Json(response)).into_response()
            }
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { .. } => ApiError::not_found(e.to_string()),
            ApplicationError::BadRequest(message) => ApiError::bad_request(message),
            ApplicationError::Validation(messages) => ApiError::validation(messages),
            ApplicationError::UserAlreadyExists(message) => {
                ApiError::business(code::USER_ALREADY_EXISTS, message)
            }
            ApplicationError::InvalidCredentials => {
                ApiError::business(code::INVALID_CREDENTIALS, e.to_string())
            }
            ApplicationError::AccountDisabled => {
                ApiError::business(code::ACCOUNT_DISABLED, e.to_string())
            }
            ApplicationError::DuplicateName(message) => {
                ApiError::business(code::BAD_REQUEST, message)
            }
            ApplicationError::Repository(detail) => {
                tracing::error!(error = %detail, "Repository failure");
                ApiError::Transport {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: Some(code::DATABASE_ERROR),
                    message: "服务器内部错误".to_string(),
                }
            }
            ApplicationError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal failure");
                ApiError::internal("服务器内部错误")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn response_json(error: ApiError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_business_fault_is_http_200() {
        let (status, json) = response_json(ApiError::business(
            code::INVALID_CREDENTIALS,
            "用户名或密码错误",
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["code"], 4102);
        assert_eq!(json["success"], false);
        assert!(json["data"].is_null());
    }

    #[tokio::test]
    async fn test_transport_fault_keeps_status() {
        let (status, json) = response_json(ApiError::not_found("文章不存在")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], 4004);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_unauthorized_code_override() {
        let (status, json) =
            response_json(ApiError::unauthorized(code::TOKEN_EXPIRED, "Token 已过期")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], 4104);
    }

    #[tokio::test]
    async fn test_validation_joins_and_forces_code() {
        let (status, json) = response_json(ApiError::validation(vec![
            "邮箱格式不正确".to_string(),
            "密码至少6个字符".to_string(),
        ]))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], 4005);
        let message = json["message"].as_str().unwrap();
        assert!(message.contains("邮箱格式不正确"));
        assert!(message.contains(", "));
    }

    #[test]
    fn test_business_code_table() {
        assert_eq!(business_code_for(StatusCode::BAD_REQUEST), 4000);
        assert_eq!(business_code_for(StatusCode::UNAUTHORIZED), 4001);
        assert_eq!(business_code_for(StatusCode::FORBIDDEN), 4003);
        assert_eq!(business_code_for(StatusCode::NOT_FOUND), 4004);
        assert_eq!(business_code_for(StatusCode::INTERNAL_SERVER_ERROR), 5000);
        // 未列举的状态码回退到 INTERNAL_ERROR
        assert_eq!(business_code_for(StatusCode::BAD_GATEWAY), 5000);
        // 同一输入恒产生同一输出
        assert_eq!(
            business_code_for(StatusCode::NOT_FOUND),
            business_code_for(StatusCode::NOT_FOUND)
        );
    }

    #[tokio::test]
    async fn test_application_error_mapping() {
        let (status, json) =
            response_json(ApplicationError::AccountDisabled.into()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["code"], 4103);

        let (status, json) = response_json(
            ApplicationError::Repository("db is on fire".to_string()).into(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], 5001);
        // 内部细节不得泄漏
        assert_eq!(json["message"], "服务器内部错误");
    }
}
