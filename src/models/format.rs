use serde::{Deserialize, Serialize};

/// 上传文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UploadFormat {
    /// 带表头的 CSV
    Tabular,
    /// 分页文本文档（PDF）
    DocumentText,
}

impl UploadFormat {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            UploadFormat::Tabular => "CSV",
            UploadFormat::DocumentText => "PDF",
        }
    }

    /// 从调用方声明的格式标记解析（忽略 ASCII 大小写与首尾空白）
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "csv" | "tabular" => Some(UploadFormat::Tabular),
            "pdf" | "document" => Some(UploadFormat::DocumentText),
            _ => None,
        }
    }

    /// 从文件名后缀取出格式标记，供未显式声明格式的旧客户端使用
    ///
    /// 只返回标记本身，是否受支持仍由 [`UploadFormat::from_token`] 判断。
    pub fn token_from_filename(filename: &str) -> Option<&str> {
        let (stem, ext) = filename.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext)
    }
}

impl std::fmt::Display for UploadFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_accepts_known_aliases() {
        assert_eq!(UploadFormat::from_token("csv"), Some(UploadFormat::Tabular));
        assert_eq!(UploadFormat::from_token("Tabular"), Some(UploadFormat::Tabular));
        assert_eq!(UploadFormat::from_token(" PDF "), Some(UploadFormat::DocumentText));
        assert_eq!(
            UploadFormat::from_token("document"),
            Some(UploadFormat::DocumentText)
        );
    }

    #[test]
    fn test_from_token_rejects_others() {
        assert_eq!(UploadFormat::from_token("docx"), None);
        assert_eq!(UploadFormat::from_token(""), None);
        assert_eq!(UploadFormat::from_token("xlsx"), None);
    }

    #[test]
    fn test_token_from_filename() {
        assert_eq!(UploadFormat::token_from_filename("questions.csv"), Some("csv"));
        assert_eq!(UploadFormat::token_from_filename("a.b.PDF"), Some("PDF"));
        assert_eq!(UploadFormat::token_from_filename("README"), None);
        assert_eq!(UploadFormat::token_from_filename(".csv"), None);
        assert_eq!(UploadFormat::token_from_filename("trailing."), None);
    }
}
