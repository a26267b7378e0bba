//! 导入上下文
//!
//! 封装"我正在处理哪一次上传"这一信息，只用于日志

use std::fmt::Display;

/// 单次上传的上下文
#[derive(Debug, Clone)]
pub struct IngestCtx {
    /// 上传序号（进程内递增）
    pub upload_id: u64,

    /// 客户端提供的文件名，可能为空
    pub filename: String,
}

impl IngestCtx {
    pub fn new(upload_id: u64, filename: impl Into<String>) -> Self {
        Self {
            upload_id,
            filename: filename.into(),
        }
    }
}

impl Display for IngestCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.filename.is_empty() {
            write!(f, "[上传 #{}]", self.upload_id)
        } else {
            write!(f, "[上传 #{} {}]", self.upload_id, self.filename)
        }
    }
}
