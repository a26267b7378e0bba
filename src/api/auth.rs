use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::response::blocking;
use crate::api::state::AppState;
use crate::error::AppResult;
use crate::models::{Role, User};

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub role: Role,
}

// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> AppResult<Json<SignupResponse>> {
    let role = blocking(move || {
        state
            .accounts
            .signup(&state.store, &body.username, &body.password)
    })
    .await?;

    Ok(Json(SignupResponse {
        message: "Signup successful!".to_string(),
        role,
    }))
}

// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> AppResult<Json<User>> {
    let user = blocking(move || {
        state
            .accounts
            .login(&state.store, &body.username, &body.password)
    })
    .await?;

    Ok(Json(user))
}

// GET /admin/get_all_users
pub async fn get_all_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = blocking(move || Ok(state.store.list_users()?)).await?;
    Ok(Json(users))
}
