use crate::error::AnalysisResult;
use crate::models::{MenuCatalogEntry, NewMenuItem, SalesAnalysis, UnknownItem};
use crate::service::catalog::CatalogProvider;
use crate::service::matcher::classify;
use crate::source::{SalesUpload, SheetLayout};
use chrono::Utc;
use std::sync::Arc;

/// 响应中保留的调试行数
pub const DEBUG_TRACE_LIMIT: usize = 20;

/// 销售分析服务：解析销售数据 -> 拉取菜单快照 -> 对账
pub struct SalesAnalyzer {
    catalog: Arc<dyn CatalogProvider>,
    layout: SheetLayout,
}

impl SalesAnalyzer {
    pub fn new(catalog: Arc<dyn CatalogProvider>, layout: SheetLayout) -> Self {
        Self { catalog, layout }
    }

    /// 分析一次上传或回放
    ///
    /// 解析失败时不访问菜单库；菜单或配方任一查询失败都直接返回错误，不使用部分数据。
    pub async fn analyze(&self, upload: SalesUpload) -> AnalysisResult<SalesAnalysis> {
        let kind = upload.kind();
        let lines = upload.into_sales_lines(&self.layout).map_err(|e| {
            tracing::warn!("[Sales-Analysis] {} 解析失败: {}", kind, e);
            e
        })?;

        let menu_items = self.catalog.list_menu_items().await?;
        let recipe_index = self.catalog.list_recipe_holder_ids().await?;
        tracing::info!(
            "[Sales-Analysis] {}: {} 行销售, 菜单 {} 项, 已有配方 {} 项",
            kind,
            lines.len(),
            menu_items.len(),
            recipe_index.len()
        );

        let classification = classify(&lines, &menu_items, &recipe_index);
        let summary = classification.summary();
        let debug_info = classification.traces(DEBUG_TRACE_LIMIT);

        tracing::info!(
            "[Sales-Analysis] 完成 - 有配方: {}, 缺配方: {}, 未知: {} (去重后 缺配方 {} / 未知 {})",
            summary.has_recipe,
            summary.missing_recipe,
            summary.not_found,
            summary.missing_recipe_articles,
            summary.unknown_items
        );

        Ok(SalesAnalysis {
            classification,
            summary,
            debug_info,
            analyzed_at: Utc::now(),
        })
    }

    /// 将未知菜品加入菜单 (售价取估算单价)
    pub async fn promote_unknown(&self, item: UnknownItem) -> AnalysisResult<MenuCatalogEntry> {
        let entry = self
            .catalog
            .create_menu_item(NewMenuItem {
                name: item.article,
                category: item.category,
                selling_price: item.estimated_unit_price,
            })
            .await?;

        tracing::info!("[Sales-Analysis] 新建菜单条目 {} '{}'", entry.id, entry.name);
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::models::{MatchStatus, RawSale, RecipeIndex};
    use crate::service::catalog::StaticCatalog;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    fn entry(n: u128, name: &str) -> MenuCatalogEntry {
        MenuCatalogEntry {
            id: Uuid::from_u128(n),
            name: name.to_string(),
            category: "Menu".to_string(),
        }
    }

    fn raw(article: &str, quantity: f64, total: f64) -> RawSale {
        RawSale {
            article: article.to_string(),
            category: "Divers".to_string(),
            quantity,
            total_revenue: total,
        }
    }

    /// 菜单可用、配方查询失败
    struct FlakyCatalog {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogProvider for FlakyCatalog {
        async fn list_menu_items(&self) -> AnalysisResult<Vec<MenuCatalogEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![entry(1, "Frites")])
        }

        async fn list_recipe_holder_ids(&self) -> AnalysisResult<RecipeIndex> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AnalysisError::CatalogUnavailable("配方查询失败".to_string()))
        }

        async fn create_menu_item(&self, _item: NewMenuItem) -> AnalysisResult<MenuCatalogEntry> {
            Err(AnalysisError::CatalogUnavailable("新增菜单失败".to_string()))
        }
    }

    #[tokio::test]
    async fn replay_is_classified_against_catalog() {
        let catalog = StaticCatalog::new(
            vec![entry(1, "Burger Classic"), entry(2, "Frites")],
            vec![Uuid::from_u128(1)],
        );
        let analyzer = SalesAnalyzer::new(Arc::new(catalog), SheetLayout::default());

        let analysis = analyzer
            .analyze(SalesUpload::Replay(vec![
                raw("burger classic", 3.0, 30.0),
                raw("Frites", 7.0, 21.0),
                raw("Mystery", 4.0, 40.0),
                raw("Offert", 0.0, 0.0),
            ]))
            .await
            .unwrap();

        assert_eq!(analysis.summary.total_lines, 3);
        assert_eq!(analysis.summary.has_recipe, 1);
        assert_eq!(analysis.classification.missing_recipe_articles, vec!["Frites"]);
        assert_eq!(analysis.classification.unknown_items[0].estimated_unit_price, 10.0);
        assert_eq!(analysis.debug_info.len(), 3);
    }

    #[tokio::test]
    async fn catalog_failure_is_not_hidden() {
        let catalog = Arc::new(FlakyCatalog {
            calls: AtomicUsize::new(0),
        });
        let analyzer = SalesAnalyzer::new(catalog.clone(), SheetLayout::default());

        let err = analyzer
            .analyze(SalesUpload::Replay(vec![raw("Frites", 1.0, 3.0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::CatalogUnavailable(_)));
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn malformed_source_skips_catalog() {
        let catalog = Arc::new(FlakyCatalog {
            calls: AtomicUsize::new(0),
        });
        let analyzer = SalesAnalyzer::new(catalog.clone(), SheetLayout::default());

        let err = analyzer
            .analyze(SalesUpload::Workbook(b"not a workbook".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedSalesSource(_)));
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn promoted_item_is_matched_on_replay() {
        let analyzer = SalesAnalyzer::new(
            Arc::new(StaticCatalog::default()),
            SheetLayout::default(),
        );
        let sales = vec![raw("Mystery", 4.0, 40.0)];

        let first = analyzer.analyze(SalesUpload::Replay(sales.clone())).await.unwrap();
        let unknown = first.classification.unknown_items[0].clone();
        let created = analyzer.promote_unknown(unknown).await.unwrap();

        let second = analyzer.analyze(SalesUpload::Replay(sales)).await.unwrap();
        let line = &second.classification.classified[0];
        assert_eq!(line.matched_item_id, Some(created.id));
        assert_eq!(line.status, MatchStatus::MissingRecipe);
        assert!(second.classification.unknown_items.is_empty());
    }
}
