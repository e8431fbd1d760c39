//! Per-request identity and capabilities.
//!
//! Authentication happens upstream; the gateway forwards the verified user id
//! and role as headers. Handlers take `Session` as an extractor and pass it
//! explicitly to anything that needs a capability check.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Student,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" | "user" => Some(Role::Student),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Owners may modify their own records; admins may modify anything.
    pub fn can_modify(&self, owner: Uuid) -> bool {
        self.is_admin() || self.user_id == owner
    }

    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let user_id = headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .ok_or(AppError::Unauthorized)?;

        let role = match headers.get(USER_ROLE_HEADER) {
            None => Role::default(),
            Some(v) => v
                .to_str()
                .ok()
                .and_then(Role::parse)
                .ok_or(AppError::Unauthorized)?,
        };

        Ok(Session { user_id, role })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Session::from_headers(&parts.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn test_missing_user_id_is_unauthorized() {
        let err = Session::from_headers(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn test_role_defaults_to_student() {
        let id = Uuid::new_v4();
        let session =
            Session::from_headers(&headers(&[(USER_ID_HEADER, &id.to_string())])).unwrap();
        assert_eq!(session.user_id, id);
        assert_eq!(session.role, Role::Student);
        assert!(session.require_admin().is_err());
    }

    #[test]
    fn test_admin_role_is_case_insensitive() {
        let id = Uuid::new_v4().to_string();
        let session =
            Session::from_headers(&headers(&[(USER_ID_HEADER, &id), (USER_ROLE_HEADER, "Admin")]))
                .unwrap();
        assert!(session.is_admin());
        assert!(session.require_admin().is_ok());
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let id = Uuid::new_v4().to_string();
        let result =
            Session::from_headers(&headers(&[(USER_ID_HEADER, &id), (USER_ROLE_HEADER, "root")]));
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_can_modify() {
        let owner = Uuid::new_v4();
        let student = Session {
            user_id: owner,
            role: Role::Student,
        };
        let stranger = Session {
            user_id: Uuid::new_v4(),
            role: Role::Student,
        };
        let admin = Session {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        };
        assert!(student.can_modify(owner));
        assert!(!stranger.can_modify(owner));
        assert!(admin.can_modify(owner));
    }
}
