//! 记录规范化 - 业务能力层
//!
//! 把提取器产出的原始 (text, difficulty) 变成可入库的题目，
//! 空白文本被过滤掉（不是错误）。

use crate::models::{NewQuestion, RawCandidate, DEFAULT_DIFFICULTY};

/// 规范化单条候选
///
/// - `text` 去除首尾空白后为空 → `None`
/// - `difficulty` 非空白时原样保留，否则为 `"medium"`
pub fn normalize(raw: RawCandidate) -> Option<NewQuestion> {
    let text = raw.text.trim();
    if text.is_empty() {
        return None;
    }

    let difficulty = match raw.difficulty {
        Some(d) if !d.trim().is_empty() => d,
        _ => DEFAULT_DIFFICULTY.to_string(),
    };

    Some(NewQuestion {
        text: text.to_string(),
        difficulty,
    })
}

/// 规范化一批候选，保持原有顺序
///
/// 返回 (保留的题目, 被过滤的条数)
pub fn normalize_all(raws: Vec<RawCandidate>) -> (Vec<NewQuestion>, usize) {
    let total = raws.len();
    let kept: Vec<NewQuestion> = raws.into_iter().filter_map(normalize).collect();
    let dropped = total - kept.len();
    (kept, dropped)
}
