//! Modelo de User
//!
//! Este módulo contiene el struct User y los roles del sistema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::repositories::Entity;

/// Rol del usuario: cada rol tiene su propio dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "Grower Handler")]
    GrowerHandler,
    #[serde(rename = "Inventory Manager")]
    InventoryManager,
    #[serde(rename = "Transport Manager")]
    TransportManager,
    #[serde(rename = "System Manager")]
    SystemManager,
    #[serde(rename = "CSM")]
    Csm,
    Customer,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::GrowerHandler,
        Role::InventoryManager,
        Role::TransportManager,
        Role::SystemManager,
        Role::Csm,
        Role::Customer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::GrowerHandler => "Grower Handler",
            Role::InventoryManager => "Inventory Manager",
            Role::TransportManager => "Transport Manager",
            Role::SystemManager => "System Manager",
            Role::Csm => "CSM",
            Role::Customer => "Customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("Unknown role '{}'", value.trim()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "User";

    fn key(&self) -> &str {
        &self.id
    }
}

/// Response de usuario para la API (sin hash de contraseña)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            active: user.active,
            created_at: user.created_at,
        }
    }
}
