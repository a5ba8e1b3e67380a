//! HTTP Middleware
//!
//! - 认证守卫：Bearer Token 校验，通过后注入 CurrentUser
//! - HTTP 状态码错误日志

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use super::dto::code;
use super::error::ApiError;
use super::extract::CurrentUser;
use super::state::AppState;
use crate::application::ports::TokenError;

/// 从请求头提取 Bearer Token
///
/// 缺失或格式不符（非 `Authorization: Bearer <token>`）都视为未授权
fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized(code::UNAUTHORIZED, "未授权"))?;

    header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::unauthorized(code::UNAUTHORIZED, "未授权"))
}

/// 认证守卫
///
/// 仅挂载在受保护路由集合上；公开路由在路由表中显式声明，不经过本守卫。
/// 校验通过后把 CurrentUser 写入请求扩展，每个请求恰好一次。
pub async fn auth_guard(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers())?;

    let claims = state.tokens.verify(token).map_err(|e| match e {
        TokenError::Expired => ApiError::unauthorized(code::TOKEN_EXPIRED, "Token 已过期"),
        TokenError::Invalid(_) => ApiError::unauthorized(code::INVALID_TOKEN, "Token 无效"),
    })?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        username: claims.username,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// HTTP 状态码错误日志中间件
///
/// 拦截 HTTP 响应，当状态码为 4xx 或 5xx 时记录日志
/// 注意：业务错误（HTTP 200 + success=false）在 ApiError::into_response() 中记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::HeaderValue;

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_rejected() {
        let headers = HeaderMap::new();
        assert!(extract_bearer(&headers).is_err());
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(extract_bearer(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc"));
        assert!(extract_bearer(&headers).is_err());
    }
}
