use super::AppState;
use crate::error::AnalysisError;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// 后台会话：每个后台请求显式携带 `Authorization: Bearer <token>`
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AnalysisError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_token.as_deref() else {
            tracing::warn!("未配置后台令牌, 拒绝请求 {}", parts.uri.path());
            return Err(AnalysisError::Unauthorized);
        };

        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim);

        match presented {
            Some(token) if tokens_equal(token.as_bytes(), expected.as_bytes()) => Ok(AdminSession),
            _ => {
                tracing::warn!("后台令牌无效, 拒绝请求 {}", parts.uri.path());
                Err(AnalysisError::Unauthorized)
            }
        }
    }
}

fn tokens_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
