//! CSV 题目提取 - 业务能力层
//!
//! 只负责"从带表头的 CSV 中读出 (题目, 难度)"，不关心入库。

use tracing::debug;

use crate::error::IngestError;
use crate::models::{RawCandidate, UploadFormat};

/// 题目列名（区分大小写，精确匹配）
pub const QUESTION_COLUMN: &str = "Question";
/// 难度列名（可选）
pub const DIFFICULTY_COLUMN: &str = "Difficulty";

/// CSV 提取器
///
/// 职责：
/// - 定位 `Question` / `Difficulty` 两列
/// - 跳过题目为空的行（不算错误）
/// - 结构损坏时整体失败
#[derive(Debug, Default, Clone, Copy)]
pub struct TabularExtractor;

impl TabularExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 提取所有候选题目，按行顺序返回
    ///
    /// # 错误
    /// - 文件为空（没有表头）
    /// - 表头里没有 `Question` 列
    /// - 某行字段数多于表头
    /// - CSV 解码失败（如非 UTF-8）
    pub fn extract(&self, bytes: &[u8]) -> Result<Vec<RawCandidate>, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| parse_error(format!("读取表头失败: {}", e)))?
            .clone();

        if headers.is_empty() {
            return Err(parse_error("文件为空，没有表头行"));
        }

        let question_idx = headers
            .iter()
            .position(|h| h == QUESTION_COLUMN)
            .ok_or_else(|| parse_error(format!("缺少 '{}' 列", QUESTION_COLUMN)))?;
        let difficulty_idx = headers.iter().position(|h| h == DIFFICULTY_COLUMN);

        if difficulty_idx.is_none() {
            debug!("CSV 没有 '{}' 列，全部使用默认难度", DIFFICULTY_COLUMN);
        }

        let mut candidates = Vec::new();
        let mut skipped = 0usize;

        for result in reader.records() {
            let record = result.map_err(|e| parse_error(e.to_string()))?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            if record.len() > headers.len() {
                return Err(parse_error(format!(
                    "第 {} 行字段数为 {}，表头只有 {} 列",
                    line,
                    record.len(),
                    headers.len()
                )));
            }

            let text = match record.get(question_idx) {
                Some(cell) if !cell.trim().is_empty() => cell,
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            let difficulty = difficulty_idx
                .and_then(|idx| record.get(idx))
                .map(str::to_string);

            candidates.push(RawCandidate::new(text, difficulty));
        }

        debug!(
            "CSV 提取完成: {} 条候选, 跳过 {} 行空题目",
            candidates.len(),
            skipped
        );

        Ok(candidates)
    }
}

fn parse_error(message: impl Into<String>) -> IngestError {
    IngestError::parse(UploadFormat::Tabular, message)
}
