use crate::models::{
    ClassifiedLine, Classification, MatchStatus, MenuCatalogEntry, RecipeIndex, SalesLine,
    UnknownItem,
};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use uuid::Uuid;

/// 名称归一化：小写、去首尾空白、连续空白压缩为单个空格
///
/// 不去除重音和标点。
pub fn normalize_article(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 归一化名称 -> 菜单条目ID
///
/// 多个条目归一化后同名时，保留菜单遍历顺序中的第一个。
#[derive(Debug, Default)]
pub struct CatalogIndex {
    by_name: HashMap<String, Uuid>,
}

impl CatalogIndex {
    pub fn build(catalog: &[MenuCatalogEntry]) -> Self {
        let mut by_name = HashMap::with_capacity(catalog.len());
        for entry in catalog {
            let key = normalize_article(&entry.name);
            if let Some(kept) = by_name.get(&key) {
                tracing::debug!(
                    "菜单名称重复 '{}': 保留 {}, 忽略 {}",
                    entry.name, kept, entry.id
                );
                continue;
            }
            by_name.insert(key, entry.id);
        }
        Self { by_name }
    }

    pub fn lookup(&self, article: &str) -> Option<Uuid> {
        self.by_name.get(&normalize_article(article)).copied()
    }
}

/// 将销售行与菜单、配方索引逐行对账
///
/// 纯函数：无 I/O、无内部状态。缺失配方与未知菜品均按原始名称精确去重，
/// 保留首次出现的顺序与数据。
pub fn classify(
    lines: &[SalesLine],
    catalog: &[MenuCatalogEntry],
    recipe_index: &RecipeIndex,
) -> Classification {
    let index = CatalogIndex::build(catalog);

    let mut classified = Vec::with_capacity(lines.len());
    let mut missing_recipe: IndexSet<String> = IndexSet::new();
    let mut unknown: IndexMap<String, UnknownItem> = IndexMap::new();

    for line in lines {
        let matched_item_id = index.lookup(&line.article);
        let has_recipe = matched_item_id.is_some_and(|id| recipe_index.contains(&id));
        let status = MatchStatus::derive(matched_item_id.is_some(), has_recipe);

        match status {
            MatchStatus::MissingRecipe => {
                missing_recipe.insert(line.article.clone());
            }
            MatchStatus::NotFound => {
                unknown
                    .entry(line.article.clone())
                    .or_insert_with(|| UnknownItem {
                        article: line.article.clone(),
                        category: line.category.clone(),
                        estimated_unit_price: line.unit_price(),
                    });
            }
            MatchStatus::HasRecipe => {}
        }

        classified.push(ClassifiedLine {
            line: line.clone(),
            matched_item_id,
            has_recipe,
            status,
        });
    }

    Classification {
        classified,
        missing_recipe_articles: missing_recipe.into_iter().collect(),
        unknown_items: unknown.into_values().collect(),
    }
}
