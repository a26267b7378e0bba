//! 批量导入流程 - 流程层
//!
//! 核心职责：定义"一次上传"的完整处理流程
//!
//! 流程顺序：
//! 1. 校验声明的格式（不支持的格式在任何 I/O 之前拒绝）
//! 2. 按格式分派给 CSV / PDF 提取器
//! 3. 逐条规范化，组成一批
//! 4. 单事务写入题库
//!
//! 每次调用都是一次性的：失败后不保留任何中间状态，也不重试。

use tracing::{debug, error, info};

use crate::error::IngestError;
use crate::infrastructure::QuestionStore;
use crate::models::{RawCandidate, UploadFormat};
use crate::services::{normalize_all, DocumentExtractor, TabularExtractor};
use crate::workflow::ingest_ctx::IngestCtx;

/// 导入阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Idle,
    Dispatching,
    Extracting,
    Normalizing,
    Persisting,
    Committed,
    Aborted,
}

/// 一次成功导入的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub format: UploadFormat,
    /// 实际写入的题目数
    pub count: usize,
    /// 规范化时被过滤掉的候选数
    pub filtered: usize,
}

impl IngestReport {
    /// 文件里没有可用题目；这是成功结果，不是错误
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// 记录阶段流转
struct StageLog<'a> {
    ctx: &'a IngestCtx,
    current: IngestStage,
}

impl<'a> StageLog<'a> {
    fn new(ctx: &'a IngestCtx) -> Self {
        Self {
            ctx,
            current: IngestStage::Idle,
        }
    }

    fn enter(&mut self, next: IngestStage) {
        debug!("{} {:?} → {:?}", self.ctx, self.current, next);
        self.current = next;
    }
}

/// 批量导入流程
///
/// - 不持有存储，存储由调用方每次显式传入
/// - 只依赖业务能力（提取器、规范化）
#[derive(Debug, Default)]
pub struct IngestFlow {
    tabular: TabularExtractor,
    document: DocumentExtractor,
}

impl IngestFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 校验声明的格式标记
    ///
    /// 调用方可以在读取或保存文件之前先调用它，提前拒绝不支持的格式。
    pub fn resolve_format(declared_format: &str) -> Result<UploadFormat, IngestError> {
        UploadFormat::from_token(declared_format).ok_or_else(|| IngestError::UnsupportedFormat {
            token: declared_format.to_string(),
        })
    }

    /// 执行一次导入
    ///
    /// # 参数
    /// - `store`: 题库
    /// - `ctx`: 上传上下文（日志用）
    /// - `bytes`: 上传文件内容
    /// - `declared_format`: 调用方声明的格式标记
    ///
    /// # 返回
    /// 成功时返回写入条数；任何错误都意味着本次没有写入任何题目
    pub fn ingest(
        &self,
        store: &dyn QuestionStore,
        ctx: &IngestCtx,
        bytes: &[u8],
        declared_format: &str,
    ) -> Result<IngestReport, IngestError> {
        let mut stages = StageLog::new(ctx);

        match self.run(store, bytes, declared_format, &mut stages) {
            Ok(report) => {
                stages.enter(IngestStage::Committed);
                if report.is_empty() {
                    info!("{} ⚠️ 文件中没有可用的题目，未写入任何记录", ctx);
                } else {
                    info!(
                        "{} ✓ {} 导入完成: 写入 {} 道题目, 过滤 {} 条空白",
                        ctx, report.format, report.count, report.filtered
                    );
                }
                Ok(report)
            }
            Err(e) => {
                error!("{} ❌ 导入在 {:?} 阶段中止: {}", ctx, stages.current, e);
                stages.enter(IngestStage::Aborted);
                Err(e)
            }
        }
    }

    fn run(
        &self,
        store: &dyn QuestionStore,
        bytes: &[u8],
        declared_format: &str,
        stages: &mut StageLog<'_>,
    ) -> Result<IngestReport, IngestError> {
        stages.enter(IngestStage::Dispatching);
        let format = Self::resolve_format(declared_format)?;

        stages.enter(IngestStage::Extracting);
        info!("{} 📄 开始解析 {} ({} 字节)", stages.ctx, format, bytes.len());
        let raws = self.extract(format, bytes)?;

        stages.enter(IngestStage::Normalizing);
        let (batch, filtered) = normalize_all(raws);

        stages.enter(IngestStage::Persisting);
        let count = store.add_many(&batch).map_err(IngestError::Persistence)?;

        Ok(IngestReport {
            format,
            count,
            filtered,
        })
    }

    fn extract(
        &self,
        format: UploadFormat,
        bytes: &[u8],
    ) -> Result<Vec<RawCandidate>, IngestError> {
        match format {
            UploadFormat::Tabular => self.tabular.extract(bytes),
            UploadFormat::DocumentText => self.document.extract(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::models::NewQuestion;
    use std::sync::Mutex;

    /// 记录每次写入的内存存储
    #[derive(Default)]
    struct RecordingStore {
        batches: Mutex<Vec<Vec<NewQuestion>>>,
    }

    impl QuestionStore for RecordingStore {
        fn add_many(&self, records: &[NewQuestion]) -> Result<usize, StoreError> {
            self.batches.lock().unwrap().push(records.to_vec());
            Ok(records.len())
        }
    }

    /// 永远写入失败的存储
    struct FailingStore;

    impl QuestionStore for FailingStore {
        fn add_many(&self, _records: &[NewQuestion]) -> Result<usize, StoreError> {
            Err(StoreError::LockPoisoned)
        }
    }

    fn ctx() -> IngestCtx {
        IngestCtx::new(1, "questions.csv")
    }

    #[test]
    fn test_tabular_scenario() {
        let store = RecordingStore::default();
        let csv = "Question,Difficulty\nWhat is a stack?,easy\n,hard\nExplain recursion,\n";

        let report = IngestFlow::new()
            .ingest(&store, &ctx(), csv.as_bytes(), "csv")
            .unwrap();

        assert_eq!(report.count, 2);
        assert_eq!(report.format, UploadFormat::Tabular);

        let batches = store.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(
            batches[0],
            vec![
                NewQuestion {
                    text: "What is a stack?".into(),
                    difficulty: "easy".into()
                },
                NewQuestion {
                    text: "Explain recursion".into(),
                    difficulty: "medium".into()
                },
            ]
        );
    }

    #[test]
    fn test_unsupported_format_touches_nothing() {
        let store = RecordingStore::default();
        let err = IngestFlow::new()
            .ingest(&store, &ctx(), b"Question\nQ\n", "docx")
            .unwrap_err();

        assert!(matches!(err, IngestError::UnsupportedFormat { ref token } if token == "docx"));
        assert!(store.batches.lock().unwrap().is_empty());
    }

    #[test]
    fn test_parse_error_commits_nothing() {
        let store = RecordingStore::default();
        let err = IngestFlow::new()
            .ingest(&store, &ctx(), b"Topic,Difficulty\nnet,easy\n", "csv")
            .unwrap_err();

        assert!(matches!(err, IngestError::Parse { .. }));
        assert!(store.batches.lock().unwrap().is_empty());
    }

    #[test]
    fn test_zero_candidates_is_success() {
        let store = RecordingStore::default();
        let report = IngestFlow::new()
            .ingest(&store, &ctx(), b"Question,Difficulty\n ,easy\n", "csv")
            .unwrap();

        assert!(report.is_empty());
        assert_eq!(report.count, 0);
    }

    #[test]
    fn test_store_failure_becomes_persistence_error() {
        let err = IngestFlow::new()
            .ingest(&FailingStore, &ctx(), b"Question\nWhat is DNS?\n", "CSV")
            .unwrap_err();

        assert!(matches!(err, IngestError::Persistence(StoreError::LockPoisoned)));
    }

    #[test]
    fn test_corrupt_pdf_is_parse_error() {
        let store = RecordingStore::default();
        let err = IngestFlow::new()
            .ingest(&store, &IngestCtx::new(2, "q.pdf"), b"%PDF-garbage", "pdf")
            .unwrap_err();

        assert!(matches!(
            err,
            IngestError::Parse {
                format: UploadFormat::DocumentText,
                ..
            }
        ));
        assert!(store.batches.lock().unwrap().is_empty());
    }
}
