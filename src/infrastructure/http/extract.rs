//! 请求提取器
//!
//! axum 默认的拒绝响应是纯文本，会绕过统一响应格式。
//! 这里包装 Json/Path/Query，把解析失败收敛为 ApiError；
//! ValidatedJson 额外执行 DTO 校验并把字段错误合并为一条消息。

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use super::dto::code;
use super::error::ApiError;

/// 经过反序列化与字段校验的 JSON 请求体
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| ApiError::validation(collect_messages(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

fn json_rejection_to_error(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(format!("请求体解析失败: {}", rejection.body_text()))
}

/// 展平校验错误：优先取规则上声明的消息，嵌套结构递归收集
fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect_into(errors, &mut messages);
    messages
}

fn collect_into(errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} 参数不合法", field));
                    out.push(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_into(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_into(nested, out);
                }
            }
        }
    }
}

/// 路径参数提取器（解析失败 -> 400 统一响应）
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::bad_request(format!("路径参数错误: {}", rejection.body_text()))
            })?;

        Ok(ApiPath(value))
    }
}

/// 查询参数提取器（解析失败 -> 400 统一响应）
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::bad_request(format!("查询参数错误: {}", rejection.body_text()))
            })?;

        Ok(ApiQuery(value))
    }
}

/// 当前登录用户（认证守卫校验通过后注入请求扩展）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized(code::UNAUTHORIZED, "未授权"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, serde::Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "用户名至少3个字符"))]
        username: String,
        #[validate(email(message = "邮箱格式不正确"))]
        email: String,
    }

    #[test]
    fn test_collect_messages_uses_declared_messages() {
        let sample = Sample {
            username: "ab".to_string(),
            email: "not-an-email".to_string(),
        };
        let errors = sample.validate().unwrap_err();
        let mut messages = collect_messages(&errors);
        messages.sort();

        assert_eq!(
            messages,
            vec!["用户名至少3个字符".to_string(), "邮箱格式不正确".to_string()]
        );
    }

    #[test]
    fn test_valid_sample_passes() {
        let sample = Sample {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        };
        assert!(sample.validate().is_ok());
    }
}
