use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, Row};
use std::fmt;
use std::sync::Arc;

use crate::database::entity::{overwrite, same_identity, Entity, SqlValue};
use crate::database::repository::EntityStore;
use crate::database::stores::Stores;
use crate::types::EntityRef;

/// A user of the platform, member of one organization
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformUser {
    pub id: Option<i64>,
    pub user_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Accepted on input, never echoed back
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub last_password_change: Option<DateTime<Utc>>,
    pub password_change_required: Option<bool>,
    pub created_or_edited: Option<DateTime<Utc>>,
    pub organization: Option<EntityRef>,
}

impl Entity for PlatformUser {
    const NAME: &'static str = "platformUser";
    const PATH: &'static str = "platform-users";
    const TABLE: &'static str = "platform_user";
    const COLUMNS: &'static [&'static str] = &[
        "user_name",
        "first_name",
        "last_name",
        "email",
        "password",
        "last_password_change",
        "password_change_required",
        "created_or_edited",
        "organization_id",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.user_name.clone()),
            SqlValue::Text(self.first_name.clone()),
            SqlValue::Text(self.last_name.clone()),
            SqlValue::Text(self.email.clone()),
            SqlValue::Text(self.password.clone()),
            SqlValue::Timestamp(self.last_password_change),
            SqlValue::Bool(self.password_change_required),
            SqlValue::Timestamp(self.created_or_edited),
            SqlValue::BigInt(EntityRef::to_column(self.organization)),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_name: row.try_get("user_name")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            last_password_change: row.try_get("last_password_change")?,
            password_change_required: row.try_get("password_change_required")?,
            created_or_edited: row.try_get("created_or_edited")?,
            organization: EntityRef::from_column(row.try_get("organization_id")?),
        })
    }

    fn merge(&mut self, patch: Self) {
        overwrite(&mut self.user_name, patch.user_name);
        overwrite(&mut self.first_name, patch.first_name);
        overwrite(&mut self.last_name, patch.last_name);
        overwrite(&mut self.email, patch.email);
        overwrite(&mut self.password, patch.password);
        overwrite(&mut self.last_password_change, patch.last_password_change);
        overwrite(&mut self.password_change_required, patch.password_change_required);
        overwrite(&mut self.created_or_edited, patch.created_or_edited);
    }

    fn store(stores: &Stores) -> &Arc<dyn EntityStore<Self>> {
        &stores.platform_users
    }
}

impl fmt::Debug for PlatformUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformUser")
            .field("id", &self.id)
            .field("user_name", &self.user_name)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("last_password_change", &self.last_password_change)
            .field("password_change_required", &self.password_change_required)
            .field("created_or_edited", &self.created_or_edited)
            .field("organization", &self.organization)
            .finish()
    }
}

impl PartialEq for PlatformUser {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}
