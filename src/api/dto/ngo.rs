use serde::Deserialize;
use url::Url;

use super::deserialize_patch_text;
use crate::models::NgoProfile;

/// `PUT /api/ngo`. Every field is optional; `null` clears a profile field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNgoRequest {
    #[serde(default, deserialize_with = "deserialize_patch_text")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_text")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_text")]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_text")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_text")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_text")]
    pub registration_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_text")]
    pub category: Option<Option<String>>,
}

impl UpdateNgoRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(None) = &self.name {
            return Err("Name cannot be empty");
        }
        if let Some(Some(website)) = &self.website
            && !Url::parse(website).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
        {
            return Err("Website must be an http(s) URL");
        }
        Ok(())
    }

    pub fn new_name(&self) -> Option<String> {
        self.name.clone().flatten()
    }

    pub fn apply(&self, profile: &mut NgoProfile) {
        let fields = [
            (&self.description, &mut profile.description),
            (&self.website, &mut profile.website),
            (&self.phone, &mut profile.phone),
            (&self.address, &mut profile.address),
            (&self.registration_number, &mut profile.registration_number),
            (&self.category, &mut profile.category),
        ];
        for (patch, field) in fields {
            if let Some(value) = patch {
                *field = value.clone();
            }
        }
    }
}
