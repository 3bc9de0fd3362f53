//! Admin login.

use actix_web::{HttpResponse, web};

use inkwell_shared::dto::{AuthResponse, LoginRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /admin/login
///
/// Only staff accounts may sign in; any other outcome is a plain 401.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .content
        .repositories()
        .users
        .find_by_email(req.email.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? || !user.is_staff {
        tracing::info!(user_id = %user.id, "Admin login rejected");
        return Err(AppError::Unauthorized);
    }

    let token = state.tokens.issue(&user)?;
    tracing::info!(user_id = %user.id, "Admin logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: u64::try_from(state.tokens.expiration_seconds()).unwrap_or_default(),
    }))
}
