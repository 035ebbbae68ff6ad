/*
 * Responsibility
 * - POST /api/auth/login
 * - Body -> Credentials -> TokenIssuer; the issuer owns all credential logic
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::api::dto::login::{LoginRequest, LoginResponse};
use crate::error::AppError;
use crate::services::auth::Credentials;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(req) = body?;

    tracing::info!(identifier = %req.identifier, "login attempt");

    let credentials = Credentials::from(req);
    let issued = state.issuer.issue_token(&credentials).await?;

    Ok(Json(LoginResponse::from(issued)))
}
