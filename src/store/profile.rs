use chrono::Utc;
use uuid::Uuid;

use super::{validate, Store};
use crate::database::db::queries::users;
use crate::database::models::{ProfilePatch, User};
use crate::error::{AppError, AppResult};
use crate::realtime::{ChangeKind, Table};

impl Store {
    pub async fn profile(&self, user_id: Uuid) -> AppResult<User> {
        users::get_by_id(&self.pool, user_id)
            .await?
            .ok_or(AppError::NotFound("user"))
    }

    /// A blank `full_name` clears it. Currencies are stored uppercase.
    pub async fn update_profile(&self, user_id: Uuid, patch: ProfilePatch) -> AppResult<User> {
        let mut user = self.profile(user_id).await?;
        patch.apply(&mut user);
        if let Some(currency) = &user.currency {
            validate::currency(currency)?;
        }
        user.updated_at = Utc::now();

        if !users::update_profile(&self.pool, &user).await? {
            return Err(AppError::NotFound("user"));
        }
        self.publish(Table::Users, ChangeKind::Update, user_id, user_id);
        Ok(user)
    }
}
