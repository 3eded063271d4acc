//! Explicit session context. Identity is loaded once at login, handed to whoever needs
//! it, and cleared at logout; nothing reads credentials from ambient storage.

pub mod handlers;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Recruiter,
    Candidate,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    #[error("unknown role '{0}'")]
    Unknown(String),
}

impl FromStr for Role {
    type Err = RoleError;

    /// Accepts the backend's Spanish role names and their English equivalents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" | "administrador" => Ok(Role::Admin),
            "reclutador" | "recruiter" => Ok(Role::Recruiter),
            "candidato" | "candidate" => Ok(Role::Candidate),
            _ => Err(RoleError::Unknown(s.to_string())),
        }
    }
}

impl Role {
    /// The role name the backend expects on registration.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Recruiter => "reclutador",
            Role::Candidate => "candidato",
        }
    }

    pub fn dashboard(&self) -> Dashboard {
        match self {
            Role::Admin => Dashboard {
                role: *self,
                title: "Panel de Administrador",
                sections: vec![DashboardSection {
                    heading: "Funciones de Administrador",
                    body: "Panel de administración en desarrollo...",
                    link: None,
                }],
            },
            Role::Recruiter => Dashboard {
                role: *self,
                title: "Panel de Reclutador",
                sections: vec![DashboardSection {
                    heading: "Opciones",
                    body: "Ir al panel de ranking",
                    link: Some("/api/v1/ranking"),
                }],
            },
            Role::Candidate => Dashboard {
                role: *self,
                title: "Panel de Candidato",
                sections: vec![DashboardSection {
                    heading: "Subir CV",
                    body: "Subí tu CV en PDF para que sea analizado",
                    link: Some("/api/v1/cvs/upload"),
                }],
            },
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.backend_name())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSection {
    pub heading: &'static str,
    pub body: &'static str,
    pub link: Option<&'static str>,
}

/// What a signed-in user lands on, chosen by role.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub role: Role,
    pub title: &'static str,
    pub sections: Vec<DashboardSection>,
}

/// An authenticated identity: bearer token plus role.
#[derive(Clone)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub email: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .field("email", &self.email)
            .finish()
    }
}

/// Holder of the current session, with explicit load/clear lifecycle.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    pub async fn load(&self, session: Session) {
        info!("Session loaded for {} ({})", session.email, session.role);
        *self.inner.write().await = Some(session);
    }

    pub async fn clear(&self) -> bool {
        let previous = self.inner.write().await.take();
        if let Some(s) = &previous {
            info!("Session cleared for {}", s.email);
        }
        previous.is_some()
    }

    pub async fn current(&self) -> Result<Session, AppError> {
        self.inner.read().await.clone().ok_or(AppError::Unauthorized)
    }

    /// The current session, provided its role is one of `allowed`.
    pub async fn require_role(&self, allowed: &[Role]) -> Result<Session, AppError> {
        let session = self.current().await?;
        if allowed.contains(&session.role) {
            Ok(session)
        } else {
            Err(AppError::Forbidden)
        }
    }
}
