pub mod ingest_ctx;
pub mod ingest_flow;

pub use ingest_ctx::IngestCtx;
pub use ingest_flow::{IngestFlow, IngestReport, IngestStage};
