use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, Row};
use std::sync::Arc;

use crate::database::entity::{same_identity, Entity, SqlValue};
use crate::database::repository::EntityStore;
use crate::database::stores::Stores;
use crate::types::EntityRef;

/// Join record: a platform user taking part in someone else's protocol
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalUser {
    pub id: Option<i64>,
    pub platform_user: Option<EntityRef>,
    pub protocol: Option<EntityRef>,
}

impl Entity for AdditionalUser {
    const NAME: &'static str = "additionalUser";
    const PATH: &'static str = "additional-users";
    const TABLE: &'static str = "additional_user";
    const COLUMNS: &'static [&'static str] = &["platform_user_id", "protocol_id"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::BigInt(EntityRef::to_column(self.platform_user)),
            SqlValue::BigInt(EntityRef::to_column(self.protocol)),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            platform_user: EntityRef::from_column(row.try_get("platform_user_id")?),
            protocol: EntityRef::from_column(row.try_get("protocol_id")?),
        })
    }

    // Only links, nothing to merge
    fn merge(&mut self, _patch: Self) {}

    fn store(stores: &Stores) -> &Arc<dyn EntityStore<Self>> {
        &stores.additional_users
    }
}

impl PartialEq for AdditionalUser {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}
