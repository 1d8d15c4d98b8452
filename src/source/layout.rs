use crate::error::SourceError;
use crate::models::SalesLine;
use serde::{Deserialize, Serialize};

/// 表格单元格 (已去除原始类型差异)
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// CSV 字段：空串为空单元格，可解析的数值为数值，其余为文本
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            return Cell::Empty;
        }
        match field.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(field.to_string()),
        }
    }
}

pub type SheetRow = Vec<Cell>;

/// POS 导出文件的版式
///
/// 分类由标记行引入 (分类列文本以 `category_marker` 开头)，作用于其后所有数据行，
/// 直到下一个标记行。列号从 0 开始。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    pub header_rows: usize,
    pub category_column: usize,
    pub article_column: usize,
    pub quantity_column: usize,
    pub revenue_column: usize,
    pub category_marker: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            header_rows: 2,
            category_column: 0,
            article_column: 1,
            quantity_column: 2,
            revenue_column: 3,
            category_marker: "Total ".to_string(),
        }
    }
}

/// 单行扫描结果
#[derive(Debug, Clone, PartialEq)]
enum RowKind {
    CategoryHeader(Option<String>),
    Sale(SalesLine),
    Skip,
}

/// 扫描状态：(当前分类, 已收集的销售行, 非标记行计数)
#[derive(Debug, Default)]
struct ScanState {
    category: Option<String>,
    lines: Vec<SalesLine>,
    content_rows: usize,
    article_rows: usize,
}

impl ScanState {
    fn step(mut self, kind: RowKind, shape: RowShape) -> Self {
        self.content_rows += shape.has_content as usize;
        self.article_rows += shape.has_article as usize;
        match kind {
            RowKind::CategoryHeader(category) => self.category = category,
            RowKind::Sale(line) => self.lines.push(line),
            RowKind::Skip => {}
        }
        self
    }
}

/// 非标记行的形态，用于识别列错位 (如 CSV 分隔符识别错误)
#[derive(Debug, Clone, Copy, Default)]
struct RowShape {
    has_content: bool,
    has_article: bool,
}

impl SheetLayout {
    fn row_shape(&self, row: &[Cell], kind: &RowKind) -> RowShape {
        if matches!(kind, RowKind::CategoryHeader(_)) {
            return RowShape::default();
        }
        RowShape {
            has_content: row.iter().any(|c| !is_blank(c)),
            has_article: article_text(row.get(self.article_column)).is_some(),
        }
    }

    fn classify_row(
        &self,
        row: &[Cell],
        row_number: usize,
        category: Option<&str>,
    ) -> Result<RowKind, SourceError> {
        if let Some(Cell::Text(label)) = row.get(self.category_column) {
            if let Some(rest) = label.strip_prefix(self.category_marker.as_str()) {
                let name = rest.trim();
                let category = (!name.is_empty()).then(|| name.to_string());
                return Ok(RowKind::CategoryHeader(category));
            }
        }

        let Some(category) = category else {
            return Ok(RowKind::Skip);
        };
        let Some(article) = article_text(row.get(self.article_column)) else {
            return Ok(RowKind::Skip);
        };

        let quantity = number_at(row, self.quantity_column, row_number)?;
        let total_revenue = number_at(row, self.revenue_column, row_number)?;

        match SalesLine::new(article.clone(), category, quantity, total_revenue) {
            Some(line) => Ok(RowKind::Sale(line)),
            None => {
                tracing::debug!("第 {} 行 '{}' 数量 {} 无效, 已丢弃", row_number, article, quantity);
                Ok(RowKind::Skip)
            }
        }
    }
}

fn article_text(cell: Option<&Cell>) -> Option<String> {
    match cell? {
        Cell::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Cell::Number(n) if *n != 0.0 => Some(n.to_string()),
        _ => None,
    }
}

fn is_blank(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => true,
        Cell::Text(s) => s.trim().is_empty(),
        Cell::Number(_) => false,
    }
}

fn number_at(row: &[Cell], column: usize, row_number: usize) -> Result<f64, SourceError> {
    match row.get(column) {
        None | Some(Cell::Empty) => Ok(0.0),
        Some(Cell::Number(n)) => Ok(*n),
        Some(Cell::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            trimmed
                .replace(',', ".")
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| SourceError::InvalidNumber {
                    row: row_number,
                    column: column + 1,
                    value: s.clone(),
                })
        }
    }
}

/// 从表格行中提取销售行
///
/// 跳过前 `header_rows` 行；首个分类标记行之前的数据行、数量 <= 0 的行均被丢弃。
/// 表头之后存在非空数据行、但商品列全部为空时视为版式不符。
pub fn extract_sales_lines(
    rows: &[SheetRow],
    layout: &SheetLayout,
) -> Result<Vec<SalesLine>, SourceError> {
    let state = rows
        .iter()
        .enumerate()
        .skip(layout.header_rows)
        .try_fold(ScanState::default(), |state, (idx, row)| {
            let kind = layout.classify_row(row, idx + 1, state.category.as_deref())?;
            let shape = layout.row_shape(row, &kind);
            Ok::<_, SourceError>(state.step(kind, shape))
        })?;

    if state.content_rows > 0 && state.article_rows == 0 {
        return Err(SourceError::NoArticles {
            column: layout.article_column + 1,
        });
    }

    Ok(state.lines)
}
