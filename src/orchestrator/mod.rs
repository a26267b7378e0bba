//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (持有配置，创建存储，运行服务)
//!     ↓
//! api (HTTP 路由，每个请求拿到显式的 AppState)
//!     ↓
//! workflow::IngestFlow (处理一次上传)
//!     ↓
//! services (能力层：CSV / PDF 提取、规范化、反馈、账号)
//!     ↓
//! infrastructure (基础设施：SqliteStore)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层创建数据库连接
//! 2. **向下依赖**：编排层 → api → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做装配和启动

pub mod app;

pub use app::App;
