use serde::{Deserialize, Serialize};

/// POS 导出的一行销售记录
///
/// `quantity` 只能通过 [`SalesLine::new`] 构造，保证恒为正数。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesLine {
    pub article: String,
    pub category: String,
    quantity: f64,
    pub total_revenue: f64,
}

impl SalesLine {
    /// 构造销售行；数量 <= 0 或非有限值时返回 None (该行在入口处被丢弃)
    pub fn new(
        article: impl Into<String>,
        category: impl Into<String>,
        quantity: f64,
        total_revenue: f64,
    ) -> Option<Self> {
        if !quantity.is_finite() || quantity <= 0.0 || !total_revenue.is_finite() {
            return None;
        }
        Some(Self {
            article: article.into(),
            category: category.into(),
            quantity,
            total_revenue,
        })
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// 估算单价 = 总收入 / 数量
    pub fn unit_price(&self) -> f64 {
        self.total_revenue / self.quantity
    }
}

/// 回放请求中的原始销售行
///
/// 客户端可直接回传上次的分类结果，多余字段 (status, matched_item_id 等) 会被忽略。
#[derive(Debug, Clone, Deserialize)]
pub struct RawSale {
    pub article: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default, alias = "total_ttc")]
    pub total_revenue: f64,
}

impl RawSale {
    /// 还原为销售行；数量不合法时返回 None
    pub fn into_sales_line(self) -> Option<SalesLine> {
        SalesLine::new(self.article, self.category, self.quantity, self.total_revenue)
    }
}
