use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// 销售文件解析错误
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("工作簿读取失败: {0}")]
    Workbook(String),

    #[error("CSV 解析失败: {0}")]
    Csv(String),

    #[error("销售文件无工作表")]
    NoWorksheet,

    #[error("未提供销售文件")]
    EmptyUpload,

    #[error("数值格式错误 (行 {row}, 列 {column}): {value}")]
    InvalidNumber {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("回放数据格式错误: {0}")]
    Replay(String),

    #[error("表头之后没有任何商品名称 (列 {column})，请检查文件分隔符或版式")]
    NoArticles { column: usize },
}

impl From<calamine::Error> for SourceError {
    fn from(err: calamine::Error) -> Self {
        SourceError::Workbook(err.to_string())
    }
}

impl From<csv::Error> for SourceError {
    fn from(err: csv::Error) -> Self {
        SourceError::Csv(err.to_string())
    }
}

/// 销售分析错误 (均在 classify 之前产生)
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("菜单数据不可用: {0}")]
    CatalogUnavailable(String),

    #[error("销售数据无法解析: {0}")]
    MalformedSalesSource(#[from] SourceError),

    #[error("未授权")]
    Unauthorized,

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = match &self {
            AnalysisError::MalformedSalesSource(_) => StatusCode::BAD_REQUEST,
            AnalysisError::Unauthorized => StatusCode::UNAUTHORIZED,
            AnalysisError::CatalogUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AnalysisError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            success: false,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result 类型别名
pub type AnalysisResult<T> = Result<T, AnalysisError>;
