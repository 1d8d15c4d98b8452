pub mod auth;
pub mod handlers;

pub use auth::AdminSession;
pub use handlers::*;

use crate::service::SalesAnalyzer;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

/// 上传文件大小上限
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// 共享状态
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<SalesAnalyzer>,
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(analyzer: SalesAnalyzer, admin_token: Option<String>) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            admin_token: admin_token.filter(|t| !t.is_empty()).map(Arc::from),
        }
    }
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/sales/analyze", post(analyze_sales))
        .route("/api/menu-items/from-unknown", post(promote_unknown))
        .layer(ServiceBuilder::new().layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)))
        .with_state(state)
}
