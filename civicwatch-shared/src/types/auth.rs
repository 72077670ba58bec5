use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Citizen,
    Champion,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Citizen => write!(f, "citizen"),
            Role::Champion => write!(f, "champion"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "citizen" => Ok(Role::Citizen),
            "champion" => Ok(Role::Champion),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// JWT claims. Besides identity, they carry the caller's locality
/// (Nigerian state and LGA) used for notification audience filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub state: String,
    pub lga: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(
        user_id: impl Into<String>,
        state: impl Into<String>,
        lga: impl Into<String>,
        role: Role,
        duration_secs: i64,
    ) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.into(),
            state: state.into(),
            lga: lga.into(),
            role,
            iat: now,
            exp: now + duration_secs,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_champion(&self) -> bool {
        matches!(self.role, Role::Champion | Role::Admin)
    }
}

/// The authenticated caller as seen by route handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub state: String,
    pub lga: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            state: claims.state,
            lga: claims.lga,
            role: claims.role,
        }
    }
}
