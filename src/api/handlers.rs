use super::auth::AdminSession;
use super::AppState;
use crate::error::{AnalysisError, SourceError};
use crate::models::{MenuCatalogEntry, RawSale, SalesAnalysis, UnknownItem};
use crate::source::SalesUpload;
use axum::{
    body::Bytes,
    extract::{Json, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
};
use serde::Deserialize;

/// 回放请求体: 上次分析返回的销售行
#[derive(Debug, Deserialize)]
pub struct ReplayRequest {
    pub sales: Vec<RawSale>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 销售分析接口
///
/// `application/json` 为回放，`text/csv` 为 CSV 导出，其余按 Excel 工作簿处理。
pub async fn analyze_sales(
    _session: AdminSession,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SalesAnalysis>, AnalysisError> {
    let upload = upload_from_request(&headers, body)?;
    let analysis = state.analyzer.analyze(upload).await?;
    Ok(Json(analysis))
}

/// 将未知菜品加入菜单
pub async fn promote_unknown(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(item): Json<UnknownItem>,
) -> Result<(StatusCode, Json<MenuCatalogEntry>), AnalysisError> {
    let entry = state.analyzer.promote_unknown(item).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

fn upload_from_request(headers: &HeaderMap, body: Bytes) -> Result<SalesUpload, SourceError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") {
        let req: ReplayRequest =
            serde_json::from_slice(&body).map_err(|e| SourceError::Replay(e.to_string()))?;
        return Ok(SalesUpload::Replay(req.sales));
    }

    if body.is_empty() {
        return Err(SourceError::EmptyUpload);
    }

    if content_type.starts_with("text/csv") {
        Ok(SalesUpload::Csv(body.to_vec()))
    } else {
        Ok(SalesUpload::Workbook(body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn json_body_is_replay() {
        let body = Bytes::from_static(br#"{"sales": [{"article": "Frites", "quantity": 2, "total_ttc": 6}]}"#);
        let upload = upload_from_request(&headers("application/json; charset=utf-8"), body).unwrap();
        match upload {
            SalesUpload::Replay(rows) => assert_eq!(rows[0].total_revenue, 6.0),
            other => panic!("unexpected upload: {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = upload_from_request(&headers("application/json"), Bytes::from_static(b"{")).unwrap_err();
        assert!(matches!(err, SourceError::Replay(_)));
    }

    #[test]
    fn csv_and_workbook_dispatch() {
        let csv = upload_from_request(&headers("text/csv"), Bytes::from_static(b"a,b")).unwrap();
        assert_eq!(csv.kind(), "csv");

        let workbook = upload_from_request(&HeaderMap::new(), Bytes::from_static(b"PK")).unwrap();
        assert_eq!(workbook.kind(), "workbook");
    }

    #[test]
    fn empty_file_upload_is_rejected() {
        let err = upload_from_request(&HeaderMap::new(), Bytes::new()).unwrap_err();
        assert!(matches!(err, SourceError::EmptyUpload));
    }
}
