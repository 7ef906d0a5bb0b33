//! Actor roles and the admin authorization guard.
//!
//! The auth collaborator is authoritative for identity; the core only
//! consumes the actor it is handed. Every mutation entry point goes through
//! [`ensure_admin`] before any store call is attempted, and the guard fails
//! closed when no actor is present.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use kutip_shared::types::UserId;
use kutip_shared::AppError;

/// Actor roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access: may mutate fee records, transactions, and lot contacts.
    Admin,
    /// Read-only access over the ledger.
    Resident,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Resident => write!(f, "resident"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "resident" => Ok(Self::Resident),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// The authenticated actor performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Identity as reported by the auth collaborator.
    pub id: UserId,
    /// The actor's role.
    pub role: Role,
    /// Display name.
    pub display_name: String,
}

impl Actor {
    /// Returns true if the actor holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Errors raised by the authorization guard.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    /// No active actor was reported by the auth collaborator.
    #[error("No active actor, mutation rejected")]
    NoActiveActor,

    /// The actor does not hold the admin role.
    #[error("Admin role required, actor has role {0}")]
    AdminRequired(Role),
}

impl From<AccessDenied> for AppError {
    fn from(err: AccessDenied) -> Self {
        Self::Permission(err.to_string())
    }
}

/// The single authorization guard wrapping all mutation entry points.
///
/// Returns the actor back on success so callers can attribute the mutation.
pub fn ensure_admin(actor: Option<&Actor>) -> Result<&Actor, AccessDenied> {
    let actor = actor.ok_or(AccessDenied::NoActiveActor)?;
    if actor.is_admin() {
        Ok(actor)
    } else {
        Err(AccessDenied::AdminRequired(actor.role))
    }
}
