//! Utilidades JWT
//!
//! Este módulo contiene funciones helper para generar y verificar los tokens
//! de sesión. Cada token lleva un `jti` propio para poder revocarlo en logout.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::environment::EnvironmentConfig, utils::errors::AppError};

/// Claims del JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,   // user_id
    pub email: String,
    pub role: String,
    pub jti: String,   // token_id, usado para revocación
    pub exp: usize,    // expiration timestamp
    pub iat: usize,    // issued at timestamp
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration: config.jwt_expiration,
        }
    }
}

/// Generar JWT token para un usuario
pub fn generate_token(
    user_id: &str,
    email: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<(String, JwtClaims), AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.expiration as i64);

    let claims = JwtClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        jti: Uuid::new_v4().to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Error generating token: {}", e)))?;

    Ok((token, claims))
}

/// Verificar y decodificar JWT token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Invalid token: {}", e)))?;

    Ok(token_data.claims)
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Authorization header must start with 'Bearer '".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AppError::Unauthorized("Token cannot be empty".to_string()));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        }
    }

    #[test]
    fn test_generate_and_verify_token() {
        let (token, claims) =
            generate_token("user-1", "tm@crips.lk", "Transport Manager", &config()).unwrap();
        let decoded = verify_token(&token, &config()).unwrap();

        assert_eq!(decoded.sub, "user-1");
        assert_eq!(decoded.role, "Transport Manager");
        assert_eq!(decoded.jti, claims.jti);
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn test_each_token_has_its_own_jti() {
        let (_, a) = generate_token("u", "u@crips.lk", "CSM", &config()).unwrap();
        let (_, b) = generate_token("u", "u@crips.lk", "CSM", &config()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let (token, _) = generate_token("u", "u@crips.lk", "CSM", &config()).unwrap();
        let other = JwtConfig {
            secret: "other".to_string(),
            expiration: 3600,
        };
        assert!(matches!(verify_token(&token, &other), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_token_from_header("Basic abc").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
    }
}
