//! HTTP Layer - RESTful API
//!
//! 统一响应信封、错误边界、认证守卫、路由表与各模块处理器

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use dto::{ApiResponse, PaginationData};
pub use error::ApiError;
pub use extract::CurrentUser;
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::{AppPorts, AppState};
