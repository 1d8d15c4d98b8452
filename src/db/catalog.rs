use crate::db::queries;
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{MenuCatalogEntry, NewMenuItem, RecipeIndex};
use crate::service::CatalogProvider;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::PgPool;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

/// 基于 Postgres 的菜单数据提供方
pub struct PgCatalog {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgCatalog {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self { pool, query_timeout }
    }

    /// 带超时执行查询，失败统一转换为 CatalogUnavailable
    async fn with_timeout<T>(
        &self,
        what: &str,
        fut: impl Future<Output = Result<T, sqlx::Error>>,
    ) -> AnalysisResult<T> {
        let start = std::time::Instant::now();
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(Ok(value)) => {
                tracing::debug!("{} 完成, 耗时: {:?}", what, start.elapsed());
                Ok(value)
            }
            Ok(Err(e)) => {
                tracing::error!("✗ {} 失败, 耗时: {:?}, 错误: {:?}", what, start.elapsed(), e);
                Err(AnalysisError::CatalogUnavailable(format!("{}: {}", what, e)))
            }
            Err(_) => {
                tracing::error!("✗ {} 超时 (>{:?})!", what, self.query_timeout);
                Err(AnalysisError::CatalogUnavailable(format!(
                    "{} 超时 (>{:?})",
                    what, self.query_timeout
                )))
            }
        }
    }
}

#[async_trait]
impl CatalogProvider for PgCatalog {
    async fn list_menu_items(&self) -> AnalysisResult<Vec<MenuCatalogEntry>> {
        self.with_timeout("查询菜单", queries::list_menu_items(&self.pool))
            .await
    }

    async fn list_recipe_holder_ids(&self) -> AnalysisResult<RecipeIndex> {
        let ids = self
            .with_timeout("查询配方", queries::list_recipe_holder_ids(&self.pool))
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn create_menu_item(&self, item: NewMenuItem) -> AnalysisResult<MenuCatalogEntry> {
        let price = selling_price(item.selling_price)?;
        self.with_timeout(
            "新增菜单条目",
            queries::insert_menu_item(&self.pool, &item.name, &item.category, &price),
        )
        .await
    }
}

/// 售价保留两位小数
fn selling_price(value: f64) -> AnalysisResult<BigDecimal> {
    if !value.is_finite() || value < 0.0 {
        return Err(AnalysisError::Internal(format!("售价无效: {}", value)));
    }
    BigDecimal::from_str(&format!("{:.2}", value))
        .map_err(|e| AnalysisError::Internal(format!("售价转换失败: {}", e)))
}
