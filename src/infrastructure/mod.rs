//! 基础设施层：持有数据库连接，只暴露存储能力

pub mod sqlite_store;
pub mod store;

pub use sqlite_store::{SqliteStore, StoredUser};
pub use store::QuestionStore;
