use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::backend::{LoginResponse, RegisterRequest};
use crate::errors::AppError;
use crate::session::{Dashboard, Role, RoleError, Session};
use crate::state::AppState;

const LOGIN_FAILED: &str = "Error al iniciar sesión";
const REGISTER_FAILED: &str = "Error al registrarse";

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default = "default_register_role")]
    pub role: String,
}

fn default_register_role() -> String {
    Role::Candidate.backend_name().to_string()
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub email: String,
    pub role: Role,
    pub dashboard: Dashboard,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

/// Turns a backend auth response into a loaded session. A role the portal does not
/// know is refused before anything is stored.
async fn open_session(
    state: &AppState,
    fallback_email: &str,
    response: LoginResponse,
) -> Result<SessionResponse, AppError> {
    let role: Role = response.user.role.parse()?;
    let email = response
        .user
        .email
        .unwrap_or_else(|| fallback_email.to_string());
    state
        .session
        .load(Session {
            token: response.token,
            role,
            email: email.clone(),
        })
        .await;
    Ok(SessionResponse {
        email,
        role,
        dashboard: role.dashboard(),
    })
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<SessionResponse>, AppError> {
    let response = state
        .backend
        .login(body.email.trim(), &body.password)
        .await
        .map_err(AppError::upstream(LOGIN_FAILED))?;
    Ok(Json(open_session(&state, body.email.trim(), response).await?))
}

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<Json<SessionResponse>, AppError> {
    let role: Role = body
        .role
        .parse()
        .map_err(|e: RoleError| AppError::Validation(e.to_string()))?;
    if body.email.trim().is_empty() || body.full_name.trim().is_empty() {
        return Err(AppError::Validation(
            "email and full_name are required".to_string(),
        ));
    }

    let request = RegisterRequest {
        email: body.email.trim().to_string(),
        password: body.password,
        full_name: body.full_name.trim().to_string(),
        role: role.backend_name().to_string(),
    };
    let response = state
        .backend
        .register(&request)
        .await
        .map_err(AppError::upstream(REGISTER_FAILED))?;
    Ok(Json(open_session(&state, &request.email, response).await?))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(State(state): State<AppState>) -> Json<LogoutResponse> {
    Json(LogoutResponse {
        logged_out: state.session.clear().await,
    })
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>, AppError> {
    let session = state.session.current().await?;
    Ok(Json(session.role.dashboard()))
}
