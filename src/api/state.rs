//! 路由共享状态
//!
//! 存储句柄随状态显式传给每个请求，没有进程级单例。

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::infrastructure::SqliteStore;
use crate::services::{AccountService, FeedbackService};
use crate::workflow::IngestFlow;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SqliteStore>,
    pub ingest: Arc<IngestFlow>,
    pub accounts: Arc<AccountService>,
    pub feedback: Arc<FeedbackService>,
    pub upload_archive_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
    upload_seq: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(store: Arc<SqliteStore>, config: &Config) -> Self {
        Self {
            store,
            ingest: Arc::new(IngestFlow::new()),
            accounts: Arc::new(AccountService::new(config.admin_username.clone())),
            feedback: Arc::new(FeedbackService::new(config.feedback_min_chars)),
            upload_archive_dir: config.upload_archive_dir.as_ref().map(PathBuf::from),
            max_upload_bytes: config.max_upload_bytes,
            upload_seq: Arc::new(AtomicU64::new(1)),
        }
    }

    /// 下一个上传序号，仅用于日志
    pub fn next_upload_id(&self) -> u64 {
        self.upload_seq.fetch_add(1, Ordering::Relaxed)
    }
}
