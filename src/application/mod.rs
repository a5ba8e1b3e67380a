//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、Token 签发、密码哈希）
//! - services: 各模块的应用服务
//! - error: 应用层错误定义

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;

pub use ports::{
    // 认证端口
    PasswordHashError,
    PasswordHasherPort,
    TokenClaims,
    TokenError,
    TokenIssuerPort,
    // Repository 端口与实体
    CategoryRecord,
    CategoryRepositoryPort,
    CategoryType,
    CommentListItem,
    CommentRecord,
    CommentRepositoryPort,
    ConfigRecord,
    ConfigRepositoryPort,
    ImageCategoryFilter,
    ImageRecord,
    ImageRepositoryPort,
    LinkRecord,
    LinkRepositoryPort,
    NewCategory,
    NewComment,
    NewImage,
    NewLink,
    NewPost,
    NewUser,
    PostDetail,
    PostListItem,
    PostRecord,
    PostRepositoryPort,
    ProfileLink,
    RepositoryError,
    TagRecord,
    TagRepositoryPort,
    UserRecord,
    UserRepositoryPort,
};

pub use services::{
    AuthService, CategoryService, CategoryStats, CommentService, CommentStats, CreateCategory,
    CreateComment, CreateLink, CreatePost, ImageService, ImageStats, LinkService, LinkStats, Login,
    LoginResult, PostService, PostStats, RegisterUser, SiteConfigService, TagService, TagStats,
    UpdateCategory, UpdateComment, UpdateImage, UpdateLink, UpdatePost, UpdateProfile, UpdateUser,
    UserService,
};
