//! 应用服务 - 用例编排
//!
//! 每个模块一个服务，持有所需端口（Arc<dyn Port>），
//! 承载唯一性检查、分页、统计等业务规则

mod auth_service;
mod category_service;
mod comment_service;
mod image_service;
mod link_service;
mod post_service;
mod site_config_service;
mod tag_service;
mod user_service;

pub use auth_service::{AuthService, Login, LoginResult};
pub use category_service::{CategoryService, CategoryStats, CreateCategory, UpdateCategory};
pub use comment_service::{CommentService, CommentStats, CreateComment, UpdateComment};
pub use image_service::{ImageService, ImageStats, UpdateImage};
pub use link_service::{CreateLink, LinkService, LinkStats, UpdateLink};
pub use post_service::{CreatePost, PostService, PostStats, UpdatePost};
pub use site_config_service::SiteConfigService;
pub use tag_service::{TagService, TagStats};
pub use user_service::{RegisterUser, UpdateProfile, UpdateUser, UserService};
