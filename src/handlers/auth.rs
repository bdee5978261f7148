// handlers/auth.rs - phone verification, registration, login and /auth/me

use axum::{extract::State, Extension};

use crate::api::schemas::{
    LoginRequest, RegisterRequest, SendCodeRequest, SendCodeResponse, TokenResponse,
};
use crate::app::AppState;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, ValidatedJson};
use crate::services::AuthSession;

/// POST /auth/send-code - dispatch a verification code by SMS
///
/// The code is echoed back only when `expose_dev_code` is enabled.
pub async fn send_code(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SendCodeRequest>,
) -> ApiResult<SendCodeResponse> {
    let code = state.auth.send_code(&body.phone).await;

    Ok(ApiResponse::success(SendCodeResponse {
        message: "verification code sent".to_string(),
        code: state.config.api.expose_dev_code.then_some(code),
    }))
}

/// POST /auth/register - create an account and receive a token
///
/// ```json
/// { "phone": "13800000000", "nickname": "Alice", "code": "1234" }
/// ```
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> ApiResult<TokenResponse> {
    let session = state
        .auth
        .register(&body.phone, &body.nickname, &body.code)
        .await?;

    Ok(ApiResponse::created(token_response(session)))
}

/// POST /auth/login - exchange a verification code for a token
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> ApiResult<TokenResponse> {
    let session = state.auth.login(&body.phone, &body.code).await?;

    Ok(ApiResponse::success(token_response(session)))
}

/// GET /auth/me - the caller resolved from the bearer token
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResult<User> {
    Ok(ApiResponse::success(user))
}

fn token_response(session: AuthSession) -> TokenResponse {
    TokenResponse::bearer(session.token, session.expires_in, session.user)
}
