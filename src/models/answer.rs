use serde::{Deserialize, Serialize};

/// 一次作答记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub username: String,
    pub question_id: i64,
    pub answer: String,
    pub feedback: String,
    pub confidence: f64,
}

/// 历史记录条目（题目文本 + 作答 + 反馈）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
    pub feedback: String,
}
