//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! A diferencia de los valores de base de datos, casi todo tiene un valor por
//! defecto razonable para desarrollo.

use chrono::{NaiveDate, Utc};
use std::env;
use thiserror::Error;

const DEV_JWT_SECRET: &str = "crips-dev-secret-change-me";

/// Error al leer la configuración
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    /// Fecha "actual" de referencia para validar salidas; `None` usa la fecha UTC de hoy
    pub scheduling_reference_date: Option<NaiveDate>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub bcrypt_cost: u32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 5000,
            host: "0.0.0.0".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration: 86_400,
            cors_origins: Vec::new(),
            scheduling_reference_date: None,
            admin_email: None,
            admin_password: None,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Leer la configuración desde una fuente arbitraria de variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT").unwrap_or(defaults.environment);

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => defaults.port,
        };

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if environment == "production" => return Err(ConfigError::Missing("JWT_SECRET")),
            None => defaults.jwt_secret,
        };

        let jwt_expiration = match var("JWT_EXPIRATION") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "JWT_EXPIRATION",
                value: raw,
            })?,
            None => defaults.jwt_expiration,
        };

        let scheduling_reference_date = match var("SCHEDULING_REFERENCE_DATE") {
            Some(raw) => Some(NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                ConfigError::Invalid {
                    name: "SCHEDULING_REFERENCE_DATE",
                    value: raw,
                }
            })?),
            None => None,
        };

        let bcrypt_cost = match var("BCRYPT_COST") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => cost,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "BCRYPT_COST",
                        value: raw,
                    })
                }
            },
            None => defaults.bcrypt_cost,
        };

        Ok(Self {
            environment,
            port,
            host: var("HOST").unwrap_or(defaults.host),
            jwt_secret,
            jwt_expiration,
            cors_origins: var("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            scheduling_reference_date,
            admin_email: var("ADMIN_EMAIL"),
            admin_password: var("ADMIN_PASSWORD"),
            bcrypt_cost,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Fecha contra la que se valida que una salida no esté en el pasado
    pub fn reference_date(&self) -> NaiveDate {
        self.scheduling_reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = EnvironmentConfig::from_lookup(|_| None).unwrap();
        assert!(config.is_development());
        assert_eq!(config.port, 5000);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert!(config.cors_origins.is_empty());
        assert!(config.scheduling_reference_date.is_none());
    }

    #[test]
    fn test_production_requires_jwt_secret() {
        let result = EnvironmentConfig::from_lookup(lookup_from(&[("ENVIRONMENT", "production")]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_invalid_port_is_reported() {
        let result = EnvironmentConfig::from_lookup(lookup_from(&[("PORT", "abc")]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "PORT", .. })));
    }

    #[test]
    fn test_reference_date_and_origins() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[
            ("SCHEDULING_REFERENCE_DATE", "2025-05-20"),
            ("CORS_ORIGINS", "http://localhost:3000, http://localhost:5173,"),
        ]))
        .unwrap();

        assert_eq!(
            config.reference_date(),
            NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
        );
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000", "http://localhost:5173"]
        );
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        let low = EnvironmentConfig::from_lookup(lookup_from(&[("BCRYPT_COST", "2")]));
        assert!(low.is_err());
        let ok = EnvironmentConfig::from_lookup(lookup_from(&[("BCRYPT_COST", "4")])).unwrap();
        assert_eq!(ok.bcrypt_cost, 4);
    }
}
