//! 错误到 HTTP 响应的映射：`{"error": "..."}` + 状态码

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use crate::error::{AppError, AppResult};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!("❌ 请求失败 ({}): {}", status.as_u16(), self);
        } else {
            warn!("⚠️ 请求被拒绝 ({}): {}", status.as_u16(), self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// 在阻塞线程池上执行同步的数据库 / 解析操作
pub async fn blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::other(format!("后台任务执行失败: {}", e)))?
}
