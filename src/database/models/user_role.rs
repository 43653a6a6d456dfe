use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, Row};
use std::sync::Arc;

use crate::database::entity::{same_identity, Entity, SqlValue};
use crate::database::repository::EntityStore;
use crate::database::stores::Stores;
use crate::types::EntityRef;

/// Join record granting a role to a user within an organization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRole {
    pub id: Option<i64>,
    pub platform_user: Option<EntityRef>,
    pub organization: Option<EntityRef>,
    pub role: Option<EntityRef>,
}

impl Entity for UserRole {
    const NAME: &'static str = "userRole";
    const PATH: &'static str = "user-roles";
    const TABLE: &'static str = "user_role";
    const COLUMNS: &'static [&'static str] = &["platform_user_id", "organization_id", "role_id"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::BigInt(EntityRef::to_column(self.platform_user)),
            SqlValue::BigInt(EntityRef::to_column(self.organization)),
            SqlValue::BigInt(EntityRef::to_column(self.role)),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            platform_user: EntityRef::from_column(row.try_get("platform_user_id")?),
            organization: EntityRef::from_column(row.try_get("organization_id")?),
            role: EntityRef::from_column(row.try_get("role_id")?),
        })
    }

    fn merge(&mut self, _patch: Self) {}

    fn store(stores: &Stores) -> &Arc<dyn EntityStore<Self>> {
        &stores.user_roles
    }
}

impl PartialEq for UserRole {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}
