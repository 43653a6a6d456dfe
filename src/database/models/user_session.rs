use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, Row};
use std::sync::Arc;

use crate::database::entity::{same_identity, Entity, SqlValue};
use crate::database::repository::EntityStore;
use crate::database::stores::Stores;
use crate::types::EntityRef;

/// Session marker of a platform user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub id: Option<i64>,
    pub platform_user: Option<EntityRef>,
}

impl Entity for UserSession {
    const NAME: &'static str = "userSessions";
    const PATH: &'static str = "user-sessions";
    const TABLE: &'static str = "user_sessions";
    const COLUMNS: &'static [&'static str] = &["platform_user_id"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![SqlValue::BigInt(EntityRef::to_column(self.platform_user))]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            platform_user: EntityRef::from_column(row.try_get("platform_user_id")?),
        })
    }

    fn merge(&mut self, _patch: Self) {}

    fn store(stores: &Stores) -> &Arc<dyn EntityStore<Self>> {
        &stores.user_sessions
    }
}

impl PartialEq for UserSession {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}
