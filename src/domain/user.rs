use serde::{Deserialize, Serialize};
use std::fmt;

pub type UserId = u64;

/// The three kinds of account the platform knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Client,
    Owner,
    Delivery,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UserRole::Client => "Client",
            UserRole::Owner => "Owner",
            UserRole::Delivery => "Delivery",
        };
        f.write_str(name)
    }
}

/// The authenticated actor behind a request.
///
/// Resolved once at the boundary by an identity provider and then passed
/// explicitly into every order operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub id: UserId,
    pub role: UserRole,
}

impl CallerIdentity {
    pub fn new(id: UserId, role: UserRole) -> Self {
        Self { id, role }
    }

    #[allow(dead_code)]
    pub fn client(id: UserId) -> Self {
        Self::new(id, UserRole::Client)
    }

    #[allow(dead_code)]
    pub fn owner(id: UserId) -> Self {
        Self::new(id, UserRole::Owner)
    }

    #[allow(dead_code)]
    pub fn delivery(id: UserId) -> Self {
        Self::new(id, UserRole::Delivery)
    }
}

/// Represents a registered user in the system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    /// Bearer token issued at registration.
    #[serde(skip_serializing)]
    pub token: String,
}

/// Payload for registering a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub email: String,
    pub role: UserRole,
}

impl User {
    pub fn caller(&self) -> CallerIdentity {
        CallerIdentity::new(self.id, self.role)
    }
}
