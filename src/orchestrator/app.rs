//! 应用编排 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：打开数据库、组装共享状态
//! 2. **资源管理**：唯一创建 `SqliteStore` 的地方，之后通过状态显式传递
//! 3. **服务运行**：绑定地址、启动 HTTP 服务、处理退出信号

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tracing::info;

use crate::api::{self, AppState};
use crate::config::Config;
use crate::infrastructure::SqliteStore;
use crate::utils::logging::log_startup;

/// 应用主结构
pub struct App {
    config: Config,
    state: AppState,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let db_path = config.database_path.clone();
        let store = tokio::task::spawn_blocking(move || SqliteStore::open(&db_path))
            .await
            .context("打开数据库的后台任务失败")?
            .with_context(|| format!("无法打开数据库: {}", config.database_path))?;

        let state = AppState::new(Arc::new(store), &config);

        Ok(Self { config, state })
    }

    /// 使用已有存储初始化（测试或嵌入场景）
    pub fn with_store(config: Config, store: Arc<SqliteStore>) -> Self {
        let state = AppState::new(store, &config);
        Self { config, state }
    }

    pub fn router(&self) -> Router {
        api::router(self.state.clone())
    }

    /// 运行 HTTP 服务直到收到退出信号
    pub async fn run(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("无法监听地址: {}", self.config.bind_addr))?;

        info!("✓ 服务已就绪: http://{}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP 服务异常退出")?;

        info!("👋 服务已停止");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("收到退出信号，正在关闭...");
    }
}
