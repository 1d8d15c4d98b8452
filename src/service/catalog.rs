use crate::error::AnalysisResult;
use crate::models::{MenuCatalogEntry, NewMenuItem, RecipeIndex};
use async_trait::async_trait;
use std::sync::RwLock;
use uuid::Uuid;

/// 菜单数据提供方
///
/// 传输或存储失败统一返回 `AnalysisError::CatalogUnavailable`。
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// 所有在售菜单条目
    async fn list_menu_items(&self) -> AnalysisResult<Vec<MenuCatalogEntry>>;

    /// 至少定义了一个配料的菜单条目ID
    async fn list_recipe_holder_ids(&self) -> AnalysisResult<RecipeIndex>;

    /// 新建在售菜单条目
    async fn create_menu_item(&self, item: NewMenuItem) -> AnalysisResult<MenuCatalogEntry>;
}

/// 内存菜单快照
#[derive(Debug, Default)]
pub struct StaticCatalog {
    items: RwLock<Vec<MenuCatalogEntry>>,
    recipe_holders: Vec<Uuid>,
}

impl StaticCatalog {
    pub fn new(items: Vec<MenuCatalogEntry>, recipe_holders: Vec<Uuid>) -> Self {
        Self {
            items: RwLock::new(items),
            recipe_holders,
        }
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn list_menu_items(&self) -> AnalysisResult<Vec<MenuCatalogEntry>> {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        Ok(items.clone())
    }

    async fn list_recipe_holder_ids(&self) -> AnalysisResult<RecipeIndex> {
        Ok(self.recipe_holders.iter().copied().collect())
    }

    async fn create_menu_item(&self, item: NewMenuItem) -> AnalysisResult<MenuCatalogEntry> {
        let entry = MenuCatalogEntry {
            id: Uuid::new_v4(),
            name: item.name,
            category: item.category,
        };
        self.items
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry.clone());
        Ok(entry)
    }
}
