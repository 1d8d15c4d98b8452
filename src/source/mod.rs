pub mod layout;
pub mod workbook;

pub use layout::{extract_sales_lines, Cell, SheetLayout, SheetRow};
pub use workbook::{read_csv, read_workbook};

use crate::error::SourceError;
use crate::models::{RawSale, SalesLine};

/// 销售数据来源：上传文件，或回放上次的分析结果
#[derive(Debug, Clone)]
pub enum SalesUpload {
    Workbook(Vec<u8>),
    Csv(Vec<u8>),
    Replay(Vec<RawSale>),
}

impl SalesUpload {
    pub fn kind(&self) -> &'static str {
        match self {
            SalesUpload::Workbook(_) => "workbook",
            SalesUpload::Csv(_) => "csv",
            SalesUpload::Replay(_) => "replay",
        }
    }

    /// 解析为销售行；数量 <= 0 的行在此处被丢弃
    pub fn into_sales_lines(self, layout: &SheetLayout) -> Result<Vec<SalesLine>, SourceError> {
        match self {
            SalesUpload::Workbook(bytes) => extract_sales_lines(&read_workbook(&bytes)?, layout),
            SalesUpload::Csv(bytes) => extract_sales_lines(&read_csv(&bytes)?, layout),
            SalesUpload::Replay(raw) => {
                let total = raw.len();
                let lines: Vec<SalesLine> =
                    raw.into_iter().filter_map(RawSale::into_sales_line).collect();
                if lines.len() < total {
                    tracing::debug!("回放数据丢弃 {} 行无效数量", total - lines.len());
                }
                Ok(lines)
            }
        }
    }
}
