//! Emolog - 个人博客系统后端
//!
//! 组装顺序：配置 -> 日志 -> 数据库 -> 端口适配器 -> 应用状态 -> HTTP 服务器

use std::sync::Arc;

use emolog::config::{load_config, print_config};
use emolog::infrastructure::auth::{Argon2PasswordHasher, JwtTokenIssuer};
use emolog::infrastructure::http::{AppPorts, AppState, HttpServer, ServerConfig};
use emolog::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteCategoryRepository,
    SqliteCommentRepository, SqliteConfigRepository, SqliteImageRepository, SqliteLinkRepository,
    SqlitePostRepository, SqliteTagRepository, SqliteUserRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},emolog={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Emolog - 个人博客系统后端");
    print_config(&config);

    // 确保数据目录与上传目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::create_dir_all(config.storage.upload_dir.join("images")).await?;

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建端口适配器
    let ports = AppPorts {
        users: Arc::new(SqliteUserRepository::new(pool.clone())),
        posts: Arc::new(SqlitePostRepository::new(pool.clone())),
        categories: Arc::new(SqliteCategoryRepository::new(pool.clone())),
        tags: Arc::new(SqliteTagRepository::new(pool.clone())),
        comments: Arc::new(SqliteCommentRepository::new(pool.clone())),
        images: Arc::new(SqliteImageRepository::new(pool.clone())),
        links: Arc::new(SqliteLinkRepository::new(pool.clone())),
        configs: Arc::new(SqliteConfigRepository::new(pool.clone())),
        tokens: Arc::new(JwtTokenIssuer::from_config(&config.auth)),
        passwords: Arc::new(Argon2PasswordHasher::new()),
    };

    // 创建应用状态
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(config, ports);

    // 补齐缺失的默认站点配置
    state
        .site_config_service
        .seed_defaults()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to seed default configs: {}", e))?;

    // 启动服务器（带优雅关闭）
    let server = HttpServer::new(server_config, state);
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
