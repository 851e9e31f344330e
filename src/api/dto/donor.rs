use serde::Deserialize;

use super::deserialize_patch_text;
use crate::models::DonorProfile;

/// `PATCH /api/donor/update/{id}`: name, phone, address.
#[derive(Debug, Deserialize)]
pub struct UpdateDonorRequest {
    #[serde(default, deserialize_with = "deserialize_patch_text")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_text")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_text")]
    pub address: Option<Option<String>>,
}

impl UpdateDonorRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(None) = &self.name {
            return Err("Name cannot be empty");
        }
        Ok(())
    }

    pub fn new_name(&self) -> Option<String> {
        self.name.clone().flatten()
    }

    pub fn apply(&self, profile: &mut DonorProfile) {
        if let Some(phone) = &self.phone {
            profile.phone = phone.clone();
        }
        if let Some(address) = &self.address {
            profile.address = address.clone();
        }
    }
}
