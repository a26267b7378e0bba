//! 题库写入能力
//!
//! 导入流程只依赖这个 trait，测试里可以替换成会失败的实现。

use crate::error::StoreError;
use crate::models::NewQuestion;

/// 题目存储
pub trait QuestionStore: Send + Sync {
    /// 原子地写入一批题目，返回写入条数
    ///
    /// 要么全部写入，要么（出错时）一条也不写入。
    fn add_many(&self, records: &[NewQuestion]) -> Result<usize, StoreError>;
}

impl<S: QuestionStore + ?Sized> QuestionStore for std::sync::Arc<S> {
    fn add_many(&self, records: &[NewQuestion]) -> Result<usize, StoreError> {
        (**self).add_many(records)
    }
}
