//! HTTP Routes
//!
//! 路由表显式声明公开/受保护两个集合：受保护集合整体挂认证守卫，
//! 公开集合绕过守卫（即"路由级元数据"，不依赖运行时反射）
//!
//! API Endpoints（✦ = 公开）:
//! - ✦ GET    /api/ping                     健康检查
//! - ✦ POST   /api/auth/login               登录
//! - ✦ POST   /api/user/register            注册
//! -   GET    /api/user                     用户列表（分页）
//! -   POST   /api/user/change-password     修改密码
//! -   PATCH  /api/user/profile             更新当前用户资料
//! -   GET    /api/user/profile/me          当前用户资料
//! - ✦ GET    /api/user/profile/owner       博主公开资料
//! -   GET/PATCH/DELETE /api/user/:id       用户详情/更新/删除
//! -   POST   /api/post                     创建文章
//! - ✦ GET    /api/post/stats/all           文章统计
//! - ✦ GET    /api/post/author/:author_id   作者文章（分页）
//! - ✦ GET    /api/post                     文章列表（分页，可按 type 过滤）
//! - ✦ GET    /api/post/:id                 文章详情
//! -   PATCH/DELETE /api/post/:id           更新/软删除文章
//! - ✦ POST   /api/post/:id/views           浏览量 +1
//! -   POST   /api/post/:id/likes           点赞 +1
//! -   POST   /api/category                 创建分类
//! - ✦ GET    /api/category/stats/all       分类统计
//! - ✦ GET    /api/category/list            全部分类（不分页）
//! - ✦ GET    /api/category                 分类列表（分页）
//! - ✦ GET    /api/category/:id             分类详情
//! -   PATCH/DELETE /api/category/:id       更新/软删除分类
//! -   POST   /api/tag                      创建标签
//! - ✦ GET    /api/tag/stats/all            标签统计
//! - ✦ GET    /api/tag/list                 全部标签（不分页）
//! - ✦ GET    /api/tag                      标签列表（分页）
//! - ✦ GET    /api/tag/:id                  标签详情
//! -   PATCH/DELETE /api/tag/:id            更新/软删除标签
//! - ✦ POST   /api/comment                  发表评论
//! -   GET    /api/comment                  评论列表（分页，后台）
//! - ✦ GET    /api/comment/post/:post_id    文章评论（分页）
//! -   GET    /api/comment/stats/all        评论统计
//! -   GET/PATCH/DELETE /api/comment/:id    评论详情/更新/软删除
//! -   POST   /api/image/upload             上传图片（multipart）
//! -   GET    /api/image/stats/all          图片统计
//! -   GET    /api/image                    图片列表（分页，可按分类过滤）
//! -   GET/PATCH/DELETE /api/image/:id      图片详情/更新/软删除
//! -   POST   /api/image/batch-delete       批量软删除图片
//! -   POST   /api/link                     创建友情链接
//! - ✦ GET    /api/link/stats/all           友情链接统计
//! - ✦ GET    /api/link/list                全部友情链接（不分页）
//! - ✦ GET    /api/link                     友情链接列表（分页）
//! - ✦ GET    /api/link/:id                 友情链接详情
//! -   PATCH/DELETE /api/link/:id           更新/软删除友情链接
//! - ✦ GET    /api/config                   全部站点配置
//! - ✦ GET    /api/config/keys              指定键集合
//! - ✦ GET    /api/config/:key              单个配置
//! -   POST   /api/config                   批量设置配置
//! -   POST   /api/config/:key              设置单个配置
//! -   DELETE /api/config/:key              删除配置

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::middleware::auth_guard;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes(state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/auth", auth_public_routes())
        .nest("/user", user_public_routes())
        .nest("/post", post_public_routes())
        .nest("/category", category_public_routes())
        .nest("/tag", tag_public_routes())
        .nest("/comment", comment_public_routes())
        .nest("/link", link_public_routes())
        .nest("/config", config_public_routes());

    let protected = Router::new()
        .nest("/user", user_protected_routes())
        .nest("/post", post_protected_routes())
        .nest("/category", category_protected_routes())
        .nest("/tag", tag_protected_routes())
        .nest("/comment", comment_protected_routes())
        .nest("/image", image_routes())
        .nest("/link", link_protected_routes())
        .nest("/config", config_protected_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    Router::new()
        .nest("/api", public.merge(protected))
        .fallback(handlers::fallback)
        .with_state(state)
}

/// Auth 路由（公开）
fn auth_public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(handlers::login))
}

/// User 路由（公开部分）
fn user_public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/profile/owner", get(handlers::owner_profile))
}

/// User 路由（受保护部分）
fn user_protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_users))
        .route("/change-password", post(handlers::change_password))
        .route("/profile", patch(handlers::update_profile))
        .route("/profile/me", get(handlers::my_profile))
        .route(
            "/:id",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
}

/// Post 路由（公开部分）
fn post_public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_posts))
        .route("/stats/all", get(handlers::post_stats))
        .route("/author/:author_id", get(handlers::list_posts_by_author))
        .route("/:id", get(handlers::get_post))
        .route("/:id/views", post(handlers::increment_post_views))
}

/// Post 路由（受保护部分）
fn post_protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::create_post))
        .route(
            "/:id",
            patch(handlers::update_post).delete(handlers::delete_post),
        )
        .route("/:id/likes", post(handlers::increment_post_likes))
}

/// Category 路由（公开部分）
fn category_public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_categories))
        .route("/stats/all", get(handlers::category_stats))
        .route("/list", get(handlers::list_all_categories))
        .route("/:id", get(handlers::get_category))
}

/// Category 路由（受保护部分）
fn category_protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::create_category))
        .route(
            "/:id",
            patch(handlers::update_category).delete(handlers::delete_category),
        )
}

/// Tag 路由（公开部分）
fn tag_public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_tags))
        .route("/stats/all", get(handlers::tag_stats))
        .route("/list", get(handlers::list_all_tags))
        .route("/:id", get(handlers::get_tag))
}

/// Tag 路由（受保护部分）
fn tag_protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::create_tag))
        .route(
            "/:id",
            patch(handlers::update_tag).delete(handlers::delete_tag),
        )
}

/// Comment 路由（公开部分）
fn comment_public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::create_comment))
        .route("/post/:post_id", get(handlers::list_comments_by_post))
}

/// Comment 路由（受保护部分）
fn comment_protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_comments))
        .route("/stats/all", get(handlers::comment_stats))
        .route(
            "/:id",
            get(handlers::get_comment)
                .patch(handlers::update_comment)
                .delete(handlers::delete_comment),
        )
}

/// Image 路由（全部受保护）
fn image_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(handlers::upload_image))
        .route("/stats/all", get(handlers::image_stats))
        .route("/", get(handlers::list_images))
        .route("/batch-delete", post(handlers::batch_delete_images))
        .route(
            "/:id",
            get(handlers::get_image)
                .patch(handlers::update_image)
                .delete(handlers::delete_image),
        )
}

/// Link 路由（公开部分）
fn link_public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_links))
        .route("/stats/all", get(handlers::link_stats))
        .route("/list", get(handlers::list_all_links))
        .route("/:id", get(handlers::get_link))
}

/// Link 路由（受保护部分）
fn link_protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::create_link))
        .route(
            "/:id",
            patch(handlers::update_link).delete(handlers::delete_link),
        )
}

/// Config 路由（公开部分）
fn config_public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::get_all_configs))
        .route("/keys", get(handlers::get_configs_by_keys))
        .route("/:key", get(handlers::get_config))
}

/// Config 路由（受保护部分）
fn config_protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::set_configs))
        .route("/:key", post(handlers::set_config).delete(handlers::delete_config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::application::ports::TokenClaims;
    use crate::application::services::test_support::{test_ports, TestPorts};
    use crate::application::services::RegisterUser;
    use crate::config::AppConfig;
    use crate::infrastructure::http::state::AppPorts;

    fn build_state(ports: &TestPorts) -> Arc<AppState> {
        Arc::new(AppState::new(
            AppConfig::default(),
            AppPorts {
                users: ports.users.clone(),
                posts: ports.posts.clone(),
                categories: ports.categories.clone(),
                tags: ports.tags.clone(),
                comments: ports.comments.clone(),
                images: ports.images.clone(),
                links: ports.links.clone(),
                configs: ports.configs.clone(),
                tokens: ports.tokens.clone(),
                passwords: ports.passwords.clone(),
            },
        ))
    }

    async fn register_alice(state: &Arc<AppState>) -> i64 {
        state
            .user_service
            .register(RegisterUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "Password123".to_string(),
                nickname: None,
            })
            .await
            .unwrap()
            .id
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_ping_is_public() {
        let ports = test_ports().await;
        let router = create_routes(build_state(&ports));

        let (status, json) = send(
            router,
            Request::builder()
                .uri("/api/ping")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["code"], 2000);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_enveloped_404() {
        let ports = test_ports().await;
        let router = create_routes(build_state(&ports));

        let (status, json) = send(
            router,
            Request::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], 4004);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_protected_route_without_token() {
        let ports = test_ports().await;
        let router = create_routes(build_state(&ports));

        let (status, json) = send(
            router,
            Request::builder()
                .uri("/api/user")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], 4001);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_protected_route_with_garbage_token() {
        let ports = test_ports().await;
        let router = create_routes(build_state(&ports));

        let (status, json) = send(
            router,
            Request::builder()
                .uri("/api/user")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], 4105);
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let ports = test_ports().await;
        let state = build_state(&ports);
        let user_id = register_alice(&state).await;
        let token = ports
            .tokens
            .sign(&TokenClaims {
                sub: user_id,
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
            })
            .unwrap();

        let router = create_routes(state);
        let (status, json) = send(
            router,
            Request::builder()
                .uri("/api/user/profile/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["username"], "alice");
        // 密码不得出现在任何响应里
        assert!(json["data"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_business_fault() {
        let ports = test_ports().await;
        let state = build_state(&ports);
        register_alice(&state).await;

        let router = create_routes(state);
        let (status, json) = send(
            router,
            json_request(
                Method::POST,
                "/api/auth/login",
                json!({"usernameOrEmail": "alice", "password": "wrong"}),
            ),
        )
        .await;

        // 业务失败：HTTP 传输成功
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["code"], 4102);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_login_disabled_account_is_business_fault() {
        let ports = test_ports().await;
        let state = build_state(&ports);
        let user_id = register_alice(&state).await;

        let mut user = ports.users.find_by_id(user_id).await.unwrap().unwrap();
        user.is_active = false;
        ports.users.update(&user).await.unwrap();

        let router = create_routes(state);
        let (status, json) = send(
            router,
            json_request(
                Method::POST,
                "/api/auth/login",
                json!({"usernameOrEmail": "alice", "password": "Password123"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["code"], 4103);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_login_success_returns_token() {
        let ports = test_ports().await;
        let state = build_state(&ports);
        register_alice(&state).await;

        let router = create_routes(state);
        let (status, json) = send(
            router,
            json_request(
                Method::POST,
                "/api/auth/login",
                json!({"usernameOrEmail": "alice@example.com", "password": "Password123"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["code"], 2000);
        assert!(json["data"]["access_token"].as_str().unwrap().len() > 0);
        assert_eq!(json["data"]["user"]["username"], "alice");
    }

    #[tokio::test]
    async fn test_register_validation_failure() {
        let ports = test_ports().await;
        let router = create_routes(build_state(&ports));

        let (status, json) = send(
            router,
            json_request(
                Method::POST,
                "/api/user/register",
                json!({"username": "ab", "email": "not-an-email", "password": "123"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], 4005);
        assert_eq!(json["success"], false);
        let message = json["message"].as_str().unwrap();
        assert!(message.contains("邮箱格式不正确"));
        assert!(message.contains(", "));
    }

    #[tokio::test]
    async fn test_malformed_json_body() {
        let ports = test_ports().await;
        let router = create_routes(build_state(&ports));

        let (status, json) = send(
            router,
            Request::builder()
                .method(Method::POST)
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], 4000);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_paginated_tag_list_total_pages() {
        let ports = test_ports().await;
        for i in 0..25 {
            ports.tags.insert(&format!("tag{}", i)).await.unwrap();
        }

        let router = create_routes(build_state(&ports));
        let (status, json) = send(
            router,
            Request::builder()
                .uri("/api/tag?page=2&pageSize=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 25);
        assert_eq!(json["data"]["page"], 2);
        assert_eq!(json["data"]["pageSize"], 10);
        assert_eq!(json["data"]["totalPages"], 3);
        assert_eq!(json["data"]["list"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_duplicate_register_is_business_fault() {
        let ports = test_ports().await;
        let state = build_state(&ports);
        register_alice(&state).await;

        let router = create_routes(state);
        let (status, json) = send(
            router,
            json_request(
                Method::POST,
                "/api/user/register",
                json!({"username": "alice", "email": "new@example.com", "password": "Password123"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["code"], 4101);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_missing_post_is_transport_404() {
        let ports = test_ports().await;
        let router = create_routes(build_state(&ports));

        let (status, json) = send(
            router,
            Request::builder()
                .uri("/api/post/999")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], 4004);
        assert_eq!(json["message"], "文章不存在");
    }
}
