use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::response::blocking;
use crate::api::state::AppState;
use crate::error::{AppError, AppResult, StoreError};
use crate::models::{AnswerRecord, HistoryEntry};

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub username: String,
    pub question_id: i64,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub feedback: String,
    pub confidence: f64,
}

// POST /submit_answer
pub async fn submit_answer(
    State(state): State<AppState>,
    Json(body): Json<SubmitAnswerRequest>,
) -> AppResult<Json<SubmitAnswerResponse>> {
    let feedback = state.feedback.evaluate(&body.answer);
    let record = AnswerRecord {
        username: body.username,
        question_id: body.question_id,
        answer: body.answer,
        feedback: feedback.message.to_string(),
        confidence: feedback.confidence,
    };

    blocking(move || match state.store.insert_answer(&record) {
        Ok(_) => Ok(()),
        Err(StoreError::NotFound { .. }) => Err(AppError::not_found("Question not found")),
        Err(e) => Err(e.into()),
    })
    .await?;

    Ok(Json(SubmitAnswerResponse {
        feedback: feedback.message.to_string(),
        confidence: feedback.confidence,
    }))
}

// GET /get_history/{username}
pub async fn get_history(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let history = blocking(move || Ok(state.store.history(&username)?)).await?;
    Ok(Json(history))
}
