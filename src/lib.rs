//! Emolog - 个人博客系统后端
//!
//! 架构设计: 六边形架构（端口/适配器）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repository、Token 签发、密码哈希）
//! - Services: 各模块应用服务（用户、文章、分类、标签、评论、图片、友链、站点配置）
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API（统一响应信封 + 认证守卫）
//! - Auth: JWT / Argon2 适配器
//! - Persistence: SQLite 存储
//!
//! 配置 (config/): 环境变量 > 配置文件 > 默认值

pub mod application;
pub mod config;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
