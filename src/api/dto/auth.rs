/*
 * Responsibility
 * - /api/auth request DTOs (register, login)
 */
use serde::Deserialize;

use super::{deserialize_text, is_valid_email};
use crate::models::{DonorProfile, NgoProfile, Profile, Role};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub email: Option<String>,
    // not trimmed by the helper on purpose: whitespace is part of a password
    #[serde(default)]
    pub password: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub role: Option<String>,

    // optional profile fields, kept for the matching role only
    #[serde(default, deserialize_with = "deserialize_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub registration_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub category: Option<String>,
}

/// Checked registration input.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub profile: Profile,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, &'static str> {
        let password = match &self.password {
            Some(serde_json::Value::String(p)) if !p.is_empty() => Some(p.clone()),
            _ => None,
        };
        let (Some(name), Some(email), Some(password), Some(role)) =
            (self.name, self.email, password, self.role)
        else {
            return Err("Name, email, password and role are required");
        };

        let role: Role = role
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| "Role must be either donor or ngo")?;
        let email = email.to_lowercase();
        if !is_valid_email(&email) {
            return Err("Invalid email address");
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 6 characters");
        }

        let profile = match role {
            Role::Donor => Profile::Donor(DonorProfile {
                phone: self.phone,
                address: self.address,
                profile_picture: None,
            }),
            Role::Ngo => Profile::Ngo(NgoProfile {
                description: self.description,
                website: self.website,
                phone: self.phone,
                address: self.address,
                registration_number: self.registration_number,
                category: self.category,
                banner: None,
            }),
        };

        Ok(Registration {
            name,
            email,
            password,
            profile,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<serde_json::Value>,
}

impl LoginRequest {
    /// Returns (lower-cased email, password).
    pub fn validate(self) -> Result<(String, String), &'static str> {
        match (self.email, self.password) {
            (Some(email), Some(serde_json::Value::String(password))) if !password.is_empty() => {
                Ok((email.to_lowercase(), password))
            }
            _ => Err("Email and password are required"),
        }
    }
}
