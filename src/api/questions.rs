use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::response::blocking;
use crate::api::state::AppState;
use crate::error::{AppError, AppResult, IngestError};
use crate::models::{RawCandidate, UploadFormat};
use crate::services::normalize;
use crate::utils::truncate_text;
use crate::workflow::{IngestCtx, IngestFlow};

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub id: i64,
    pub question: String,
    pub difficulty: String,
}

#[derive(Debug, Deserialize)]
pub struct AddQuestionRequest {
    pub question: String,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddQuestionResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub count: usize,
}

// GET /get_question
pub async fn get_question(State(state): State<AppState>) -> AppResult<Json<QuestionResponse>> {
    let question = blocking(move || Ok(state.store.random_question()?))
        .await?
        .ok_or_else(|| AppError::not_found("No questions available"))?;

    Ok(Json(QuestionResponse {
        id: question.id,
        question: question.text,
        difficulty: question.difficulty,
    }))
}

// POST /admin/add_question
pub async fn add_question(
    State(state): State<AppState>,
    Json(body): Json<AddQuestionRequest>,
) -> AppResult<Json<AddQuestionResponse>> {
    let question = normalize(RawCandidate::new(body.question, body.difficulty))
        .ok_or_else(|| AppError::invalid_request("Question text must not be empty"))?;

    let preview = truncate_text(&question.text, 40);
    let id = blocking(move || Ok(state.store.add_question(&question)?)).await?;
    info!("➕ 新增题目 #{}: {}", id, preview);

    Ok(Json(AddQuestionResponse {
        message: "Question added successfully".to_string(),
        id,
    }))
}

// POST /admin/upload_questions
//
// multipart 字段：
// - `file`：必填
// - `format`：可选，缺省时取文件名后缀
pub async fn upload_questions(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut upload: Option<(String, Bytes)> = None;
    let mut declared_format: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Failed to read upload", e))?;
                upload = Some((filename, data));
            }
            "format" => {
                let token = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("Invalid format field", e))?;
                declared_format = Some(token);
            }
            _ => continue,
        }
    }

    // 浏览器在未选择文件时也会提交一个空的 file 字段
    let (filename, data) = match upload {
        Some((filename, data)) if !(filename.is_empty() && data.is_empty()) => (filename, data),
        _ => return Err(IngestError::MissingFile.into()),
    };

    let token = declared_format
        .filter(|t| !t.trim().is_empty())
        .or_else(|| UploadFormat::token_from_filename(&filename).map(str::to_string))
        .unwrap_or_default();

    // 先校验格式，再做任何文件 I/O
    IngestFlow::resolve_format(&token)?;

    if let Some(dir) = &state.upload_archive_dir {
        archive_upload(dir, &filename, &data).await;
    }

    let ctx = IngestCtx::new(state.next_upload_id(), filename);
    let store = state.store.clone();
    let flow = state.ingest.clone();

    let report = blocking(move || Ok(flow.ingest(&*store, &ctx, &data, &token)?)).await?;

    Ok(Json(UploadResponse {
        message: format!(
            "{} uploaded and {} questions added!",
            report.format, report.count
        ),
        count: report.count,
    }))
}

/// 超过大小上限时为 413，其余 multipart 错误为 400
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    let message = format!("{}: {}", context, e.body_text());
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(message)
    } else {
        AppError::invalid_request(message)
    }
}

/// 把原始上传保存到归档目录；失败只记录警告，不影响导入
async fn archive_upload(dir: &Path, filename: &str, data: &[u8]) {
    let path = archive_path(dir, filename);

    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        warn!("⚠️ 无法创建归档目录 {}: {}", dir.display(), e);
        return;
    }

    match tokio::fs::write(&path, data).await {
        Ok(()) => info!("🗄️ 上传已归档: {}", path.display()),
        Err(e) => warn!("⚠️ 上传归档失败 {}: {}", path.display(), e),
    }
}

fn archive_path(dir: &Path, filename: &str) -> PathBuf {
    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.');
    let name = if sanitized.is_empty() { "upload" } else { sanitized };

    dir.join(format!(
        "{}_{}",
        chrono::Local::now().format("%Y%m%d%H%M%S%3f"),
        name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_path_is_sanitized() {
        let path = archive_path(Path::new("uploads"), "../../etc/passwd");
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(!name.contains('/'));
        assert!(name.ends_with("_etc_passwd"));
        assert_eq!(path.parent().unwrap(), Path::new("uploads"));
    }

    #[test]
    fn test_archive_path_for_empty_name() {
        let path = archive_path(Path::new("uploads"), "");
        assert!(path.to_string_lossy().ends_with("_upload"));
    }
}
