//! Modelo de User
//!
//! Mapea la tabla `users`. La vista pública (`UserResponse`) nunca incluye el hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rol del usuario - mapea al ENUM user_role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Employee,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Employee => "EMPLOYEE",
        }
    }

    /// ADMIN satisface cualquier rol requerido
    pub fn satisfies(&self, required: UserRole) -> bool {
        *self == UserRole::Admin || *self == required
    }
}

/// User - mapea exactamente a la tabla users
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Vista redactada del usuario para la API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Usuario con el número de jornadas, para el listado de administración
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserWithSessionCount {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub work_session_count: i64,
}

/// Resumen del usuario embebido en jornadas y ubicaciones
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"ADMIN\"");
        let role: UserRole = serde_json::from_str("\"EMPLOYEE\"").unwrap();
        assert_eq!(role, UserRole::Employee);
    }

    #[test]
    fn test_admin_satisfies_every_role() {
        assert!(UserRole::Admin.satisfies(UserRole::Employee));
        assert!(UserRole::Admin.satisfies(UserRole::Admin));
        assert!(UserRole::Employee.satisfies(UserRole::Employee));
        assert!(!UserRole::Employee.satisfies(UserRole::Admin));
    }

    #[test]
    fn test_user_response_redacts_password() {
        let user = User {
            id: Uuid::new_v4(),
            email: "petre@fenix.com".to_string(),
            name: "Petre".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            role: UserRole::Employee,
            is_active: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["email"], "petre@fenix.com");
        assert_eq!(json["role"], "EMPLOYEE");
    }
}
