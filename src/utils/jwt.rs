//! Utilidades JWT
//!
//! Emisión y verificación de tokens HS256 con el id, email, nombre y rol del usuario.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    config::environment::EnvironmentConfig,
    models::{auth::JwtClaims, user::User},
    utils::errors::AppError,
};

/// Configuración de JWT
#[derive(Clone)]
pub struct JwtConfig {
    pub expiration: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtConfig {
    pub fn new(secret: &str, expiration: u64) -> Self {
        Self {
            expiration,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expiration)
    }
}

/// Token emitido junto con su fecha de expiración
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Generar JWT token para un usuario
pub fn generate_token(user: &User, config: &JwtConfig) -> Result<IssuedToken, AppError> {
    generate_token_at(user, config, Utc::now())
}

fn generate_token_at(
    user: &User,
    config: &JwtConfig,
    now: DateTime<Utc>,
) -> Result<IssuedToken, AppError> {
    let expires_at = now + chrono::Duration::seconds(config.expiration as i64);

    let claims = JwtClaims {
        sub: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(&Header::new(Algorithm::HS256), &claims, &config.encoding_key)
        .map_err(|e| AppError::Internal(format!("Error generando token: {}", e)))?;

    Ok(IssuedToken { token, expires_at })
}

/// Verificar firma y expiración, y decodificar los claims
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<JwtClaims>(token, &config.decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Authorization header must use Bearer scheme".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AppError::Unauthorized("Access token required".to_string()));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use uuid::Uuid;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "kango@fenix.com".to_string(),
            name: "Admin".to_string(),
            password_hash: String::new(),
            role,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_generate_and_validate_token() {
        let config = JwtConfig::new("test-secret", 86_400);
        let admin = user(UserRole::Admin);

        let issued = generate_token(&admin, &config).unwrap();
        assert!(!issued.token.is_empty());

        let claims = verify_token(&issued.token, &config).unwrap();
        assert_eq!(claims.sub, admin.id);
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.email, "kango@fenix.com");
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issued = generate_token(&user(UserRole::Employee), &JwtConfig::new("a", 60)).unwrap();
        let err = verify_token(&issued.token, &JwtConfig::new("b", 60)).unwrap_err();
        assert!(matches!(err, AppError::Jwt(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = JwtConfig::new("test-secret", 60);
        let issued =
            generate_token_at(&user(UserRole::Employee), &config, Utc::now() - chrono::Duration::hours(25))
                .unwrap();
        assert!(verify_token(&issued.token, &config).is_err());
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_token_from_header("Basic abc").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
    }
}
