use serde::{Deserialize, Serialize};

/// 未指定或无法识别难度时使用的默认值
pub const DEFAULT_DIFFICULTY: &str = "medium";

/// 已持久化的题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub difficulty: String,
}

/// 通过规范化、等待写入的题目
///
/// `text` 已去除首尾空白且非空，`difficulty` 永不为空。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub text: String,
    pub difficulty: String,
}

/// 提取器产出的原始候选 (text, difficulty)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawCandidate {
    pub text: String,
    pub difficulty: Option<String>,
}

impl RawCandidate {
    pub fn new(text: impl Into<String>, difficulty: Option<String>) -> Self {
        Self {
            text: text.into(),
            difficulty,
        }
    }

    /// 文档类来源不带难度信息
    pub fn without_difficulty(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 截断题目内容以便显示（最多80个字符）
        let preview = if self.text.chars().count() > 80 {
            self.text.chars().take(80).collect::<String>() + "..."
        } else {
            self.text.clone()
        };
        write!(f, "#{} {} [难度: {}]", self.id, preview, self.difficulty)
    }
}
