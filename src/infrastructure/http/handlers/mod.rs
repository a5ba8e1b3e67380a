//! HTTP Handlers
//!
//! 每个模块一个文件：请求 DTO（validator 校验）+ 处理函数

mod auth;
mod category;
mod comment;
mod image;
mod link;
mod ping;
mod post;
mod site_config;
mod tag;
mod user;

pub use auth::*;
pub use category::*;
pub use comment::*;
pub use image::*;
pub use link::*;
pub use ping::*;
pub use post::*;
pub use site_config::*;
pub use tag::*;
pub use user::*;

use serde::Deserialize;

use super::error::ApiError;

/// 通用分页查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageQuery {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

/// 未匹配路由的兜底处理：404 也走统一响应格式
pub async fn fallback() -> ApiError {
    ApiError::not_found("资源不存在")
}
