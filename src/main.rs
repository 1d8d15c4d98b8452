use sales_recon::{create_pool, router, AppConfig, AppState, PgCatalog, SalesAnalyzer};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式, RUST_LOG 控制级别 (默认 info)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);
    if config.auth.admin_token.is_none() {
        warn!("未配置 ADMIN_TOKEN, 后台接口将拒绝所有请求");
    }

    // 创建数据库连接池
    let pool = create_pool(&config.database)?;
    info!("Database pool created");

    let catalog = Arc::new(PgCatalog::new(pool, config.database.query_timeout()));
    let analyzer = SalesAnalyzer::new(catalog, config.sheet.clone());
    let app = router(AppState::new(analyzer, config.auth.admin_token.clone()));

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/sales/analyze            - 销售对账 (xlsx|xls|ods / csv / json 回放)");
    info!("  POST /api/menu-items/from-unknown  - 未知菜品加入菜单");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
