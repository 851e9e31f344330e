/*
 * Responsibility
 * - Account model shared by donors and NGOs
 * - The role lives in the Profile tag: one base record + a role-specific payload
 */
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Ngo,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Ngo => "ngo",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donor" => Ok(Role::Donor),
            "ngo" => Ok(Role::Ngo),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfile {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NgoProfile {
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub registration_number: Option<String>,
    pub category: Option<String>,
    pub banner: Option<String>,
}

/// Role-specific half of an account. Serialized with the role as the tag so
/// that a flattened profile renders as `"role": "ngo", "banner": ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Profile {
    Donor(DonorProfile),
    Ngo(NgoProfile),
}

impl Profile {
    pub fn empty(role: Role) -> Self {
        match role {
            Role::Donor => Profile::Donor(DonorProfile::default()),
            Role::Ngo => Profile::Ngo(NgoProfile::default()),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Profile::Donor(_) => Role::Donor,
            Profile::Ngo(_) => Role::Ngo,
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    pub fn as_donor(&self) -> Option<&DonorProfile> {
        match &self.profile {
            Profile::Donor(p) => Some(p),
            Profile::Ngo(_) => None,
        }
    }

    pub fn as_ngo(&self) -> Option<&NgoProfile> {
        match &self.profile {
            Profile::Ngo(p) => Some(p),
            Profile::Donor(_) => None,
        }
    }

    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            profile: self.profile.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile: Profile,
}

/// Public projection of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
