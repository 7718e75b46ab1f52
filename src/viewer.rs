use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the acting project manager's id. Absent means admin.
pub const MANAGER_HEADER: &str = "x-manager-id";

/// Who is looking at the data. Sign-in happens outside this service; the
/// caller only tells us whose view to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Admin,
    Manager(Uuid),
}

impl Viewer {
    pub fn manager_id(&self) -> Option<Uuid> {
        match self {
            Viewer::Admin => None,
            Viewer::Manager(id) => Some(*id),
        }
    }

    /// Managers are pinned to their own data; admins may narrow to any manager.
    pub fn scope(&self, requested: Option<Uuid>) -> Option<Uuid> {
        match self {
            Viewer::Admin => requested,
            Viewer::Manager(id) => Some(*id),
        }
    }

    pub fn require_owner(&self, owner: Option<Uuid>) -> Result<(), AppError> {
        match self {
            Viewer::Admin => Ok(()),
            Viewer::Manager(id) if owner == Some(*id) => Ok(()),
            Viewer::Manager(_) => Err(AppError::Forbidden(
                "You can only modify records assigned to you".to_string(),
            )),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(MANAGER_HEADER) else {
            return Ok(Viewer::Admin);
        };

        let id = header
            .to_str()
            .ok()
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .ok_or_else(|| AppError::BadRequest(format!("Invalid {MANAGER_HEADER} header")))?;

        Ok(Viewer::Manager(id))
    }
}
