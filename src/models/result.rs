use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SalesLine;

/// 销售行匹配状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    NotFound,
    MissingRecipe,
    HasRecipe,
}

impl MatchStatus {
    /// 由 (是否匹配到菜单, 是否有配方) 推导状态
    pub fn derive(matched: bool, has_recipe: bool) -> Self {
        match (matched, has_recipe) {
            (false, _) => MatchStatus::NotFound,
            (true, false) => MatchStatus::MissingRecipe,
            (true, true) => MatchStatus::HasRecipe,
        }
    }
}

/// 分类后的销售行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedLine {
    #[serde(flatten)]
    pub line: SalesLine,
    pub matched_item_id: Option<Uuid>,
    pub has_recipe: bool,
    pub status: MatchStatus,
}

/// 未知菜品 (按原始名称去重)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownItem {
    pub article: String,
    pub category: String,
    pub estimated_unit_price: f64,
}

/// 一次分类的完整结果
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Classification {
    pub classified: Vec<ClassifiedLine>,
    pub missing_recipe_articles: Vec<String>,
    pub unknown_items: Vec<UnknownItem>,
}

/// 单行匹配调试信息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchTrace {
    pub article: String,
    pub found: bool,
    pub matched_item_id: Option<Uuid>,
    pub has_recipe: bool,
    pub status: MatchStatus,
}

/// 分类统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationSummary {
    pub total_lines: usize,
    pub has_recipe: usize,
    pub missing_recipe: usize,
    pub not_found: usize,
    pub missing_recipe_articles: usize,
    pub unknown_items: usize,
}

/// 分析接口响应体
#[derive(Debug, Clone, Serialize)]
pub struct SalesAnalysis {
    #[serde(flatten)]
    pub classification: Classification,
    pub summary: ClassificationSummary,
    pub debug_info: Vec<MatchTrace>,
    pub analyzed_at: DateTime<Utc>,
}

impl Classification {
    /// 按状态统计
    pub fn summary(&self) -> ClassificationSummary {
        let mut summary = ClassificationSummary {
            total_lines: self.classified.len(),
            missing_recipe_articles: self.missing_recipe_articles.len(),
            unknown_items: self.unknown_items.len(),
            ..Default::default()
        };
        for cl in &self.classified {
            match cl.status {
                MatchStatus::HasRecipe => summary.has_recipe += 1,
                MatchStatus::MissingRecipe => summary.missing_recipe += 1,
                MatchStatus::NotFound => summary.not_found += 1,
            }
        }
        summary
    }

    /// 前 `limit` 行的匹配调试信息
    pub fn traces(&self, limit: usize) -> Vec<MatchTrace> {
        self.classified
            .iter()
            .take(limit)
            .map(|cl| MatchTrace {
                article: cl.line.article.clone(),
                found: cl.matched_item_id.is_some(),
                matched_item_id: cl.matched_item_id,
                has_recipe: cl.has_recipe,
                status: cl.status,
            })
            .collect()
    }

    /// 去掉分类结果，还原为原始销售行 (用于回放)
    pub fn into_sales_lines(self) -> Vec<SalesLine> {
        self.classified.into_iter().map(|cl| cl.line).collect()
    }
}
