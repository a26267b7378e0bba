//! HTTP 接口层
//!
//! 路由与原前端保持一致，所有响应都是 JSON。

pub mod answers;
pub mod auth;
pub mod questions;
pub mod response;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// 构建全部路由
pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        // 账号
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        // 题目
        .route("/get_question", get(questions::get_question))
        // 作答
        .route("/submit_answer", post(answers::submit_answer))
        .route("/get_history/{username}", get(answers::get_history))
        // 管理员
        .route("/admin/add_question", post(questions::add_question))
        .route("/admin/get_all_users", get(auth::get_all_users))
        .route("/admin/upload_questions", post(questions::upload_questions))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
