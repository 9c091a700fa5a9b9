//! User entity - artists, buyers, and admins

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::ApprovalStatus;
use crate::value_objects::{BadgeSet, Snowflake};

/// Closed set of account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Artist,
    Buyer,
    Admin,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Buyer => "buyer",
            Self::Admin => "admin",
        }
    }

    /// Artists wait for an admin; everyone else is approved on sign-up
    pub const fn initial_status(self) -> ApprovalStatus {
        match self {
            Self::Artist => ApprovalStatus::Pending,
            Self::Buyer | Self::Admin => ApprovalStatus::Approved,
        }
    }

    /// Whether the role may list artworks for sale
    pub const fn can_sell(self) -> bool {
        match self {
            Self::Artist => true,
            Self::Buyer | Self::Admin => false,
        }
    }

    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "artist" => Ok(Self::Artist),
            "buyer" => Ok(Self::Buyer),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub status: ApprovalStatus,
    pub artwork_count: i32,
    pub badges: BadgeSet,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new account. Only artists keep a specialization.
    pub fn new(
        id: Snowflake,
        name: String,
        email: String,
        role: Role,
        specialization: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            role,
            specialization: specialization.filter(|_| role == Role::Artist),
            bio: None,
            status: role.initial_status(),
            artwork_count: 0,
            badges: BadgeSet::empty(),
            password_changed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether the account may obtain a session
    pub fn can_sign_in(&self) -> bool {
        match self.role {
            Role::Artist => self.status.is_approved(),
            Role::Buyer | Role::Admin => true,
        }
    }

    /// True when the password changed after a token issued at `issued_at` (Unix seconds)
    pub fn changed_password_after(&self, issued_at: i64) -> bool {
        self.password_changed_at
            .is_some_and(|changed| changed.timestamp() > issued_at)
    }

    /// Count one more artwork and union in any newly reached badge tiers.
    /// Returns the tiers earned by this call.
    pub fn record_artwork(&mut self) -> BadgeSet {
        self.artwork_count += 1;
        let earned = BadgeSet::earned_for(self.artwork_count);
        let fresh = earned.difference(self.badges);
        self.badges |= earned;
        self.updated_at = Utc::now();
        fresh
    }
}
