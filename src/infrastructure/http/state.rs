//! Application State
//!
//! 汇聚所有应用服务与进程级配置，Arc 共享、只读

use std::sync::Arc;

use crate::application::ports::{
    CategoryRepositoryPort, CommentRepositoryPort, ConfigRepositoryPort, ImageRepositoryPort,
    LinkRepositoryPort, PasswordHasherPort, PostRepositoryPort, TagRepositoryPort,
    TokenIssuerPort, UserRepositoryPort,
};
use crate::application::services::{
    AuthService, CategoryService, CommentService, ImageService, LinkService, PostService,
    SiteConfigService, TagService, UserService,
};
use crate::config::AppConfig;

/// 注入 AppState 的全部端口
pub struct AppPorts {
    pub users: Arc<dyn UserRepositoryPort>,
    pub posts: Arc<dyn PostRepositoryPort>,
    pub categories: Arc<dyn CategoryRepositoryPort>,
    pub tags: Arc<dyn TagRepositoryPort>,
    pub comments: Arc<dyn CommentRepositoryPort>,
    pub images: Arc<dyn ImageRepositoryPort>,
    pub links: Arc<dyn LinkRepositoryPort>,
    pub configs: Arc<dyn ConfigRepositoryPort>,
    pub tokens: Arc<dyn TokenIssuerPort>,
    pub passwords: Arc<dyn PasswordHasherPort>,
}

/// 应用状态
pub struct AppState {
    /// 进程级配置（启动后只读）
    pub config: AppConfig,

    /// Token 端口（认证守卫直接使用）
    pub tokens: Arc<dyn TokenIssuerPort>,

    // ========== 应用服务 ==========
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub post_service: PostService,
    pub category_service: CategoryService,
    pub tag_service: TagService,
    pub comment_service: CommentService,
    pub image_service: ImageService,
    pub link_service: LinkService,
    pub site_config_service: SiteConfigService,
}

impl AppState {
    /// 创建应用状态
    pub fn new(config: AppConfig, ports: AppPorts) -> Self {
        Self {
            auth_service: AuthService::new(
                ports.users.clone(),
                ports.tokens.clone(),
                ports.passwords.clone(),
            ),
            user_service: UserService::new(ports.users.clone(), ports.passwords.clone()),
            post_service: PostService::new(ports.posts.clone(), ports.tags.clone()),
            category_service: CategoryService::new(ports.categories.clone()),
            tag_service: TagService::new(ports.tags.clone()),
            comment_service: CommentService::new(ports.comments.clone()),
            image_service: ImageService::new(ports.images.clone()),
            link_service: LinkService::new(ports.links.clone()),
            site_config_service: SiteConfigService::new(ports.configs.clone()),
            tokens: ports.tokens,
            config,
        }
    }
}
