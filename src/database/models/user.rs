use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user profile. Credentials live in the same table but are never loaded
/// into this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub currency: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub currency: Option<String>,
}

impl ProfilePatch {
    pub fn apply(self, user: &mut User) {
        if let Some(full_name) = self.full_name {
            let trimmed = full_name.trim();
            user.full_name = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        if let Some(currency) = self.currency {
            user.currency = Some(currency.trim().to_ascii_uppercase());
        }
    }
}
