//! # Interview Practice
//!
//! 面试练习服务：注册登录、随机抽题、提交作答、查看历史；
//! 管理员可单题添加，或上传 CSV / PDF 批量导入题目。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有数据库连接，只暴露能力
//! - `SqliteStore` - 唯一的连接 owner，批量写入走单事务
//! - `QuestionStore` - 导入流程依赖的写入接口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `TabularExtractor` / `DocumentExtractor` - CSV / PDF 提取
//! - `normalizer` - 候选题目规范化
//! - `FeedbackService` / `AccountService` - 作答反馈、账号
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次上传"的完整处理流程
//! - `IngestCtx` - 上下文封装（上传序号 + 文件名）
//! - `IngestFlow` - 流程编排（格式校验 → 提取 → 规范化 → 入库）
//!
//! ### ④ 接口与编排层（API / Orchestration）
//! - `api/` - HTTP 路由
//! - `orchestrator/` - 应用装配与启动
//!
//! ## 模块结构

pub mod api;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, IngestError, StoreError};
pub use infrastructure::{QuestionStore, SqliteStore};
pub use models::{NewQuestion, Question, UploadFormat};
pub use orchestrator::App;
pub use workflow::{IngestCtx, IngestFlow, IngestReport};
