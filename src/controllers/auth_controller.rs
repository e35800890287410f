//! Login y creación del administrador inicial

use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

use crate::config::BootstrapAdmin;
use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::models::user::{User, UserRole, UserResponse};
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

const INVALID_CREDENTIALS: &str = "invalid credentials";

pub struct AuthController {
    users: UserRepository,
    jwt: JwtConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, jwt: JwtConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Usuario ausente, inactivo o con contraseña incorrecta dan el mismo error
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        let user = match self.users.find_by_email(&email).await? {
            Some(user) if user.is_active => user,
            _ => {
                warn!("🔒 Login rechazado para {}", email);
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !verify_password(request.password, user.password_hash.clone()).await? {
            warn!("🔒 Contraseña incorrecta para {}", email);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let issued = generate_token(&user, &self.jwt)?;
        info!("🔑 Login de {} ({})", user.email, user.role.as_str());

        Ok(LoginResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            user: UserResponse::from(user),
        })
    }

    /// Crea el administrador configurado si todavía no existe ninguno
    pub async fn ensure_bootstrap_admin(&self, admin: &BootstrapAdmin) -> AppResult<Option<User>> {
        if self.users.admin_exists().await? {
            return Ok(None);
        }

        let email = admin.email.trim().to_lowercase();
        if self.users.find_by_email(&email).await?.is_some() {
            warn!("⚠️ {} ya existe y no es administrador; no se crea el admin inicial", email);
            return Ok(None);
        }

        let password_hash = hash_password(admin.password.clone()).await?;
        let user = self
            .users
            .create(&email, &admin.name, &password_hash, UserRole::Admin)
            .await?;

        info!("👤 Administrador inicial creado: {}", user.email);
        Ok(Some(user))
    }
}

/// bcrypt es costoso en CPU; se ejecuta fuera del runtime async
async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Hash(e.to_string()))
}

pub async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Hash(e.to_string()))
}
