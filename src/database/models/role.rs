use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, Row};
use std::sync::Arc;

use crate::database::entity::{overwrite, same_identity, Entity, SqlValue};
use crate::database::repository::EntityStore;
use crate::database::stores::Stores;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Entity for Role {
    const NAME: &'static str = "role";
    const PATH: &'static str = "roles";
    const TABLE: &'static str = "role";
    const COLUMNS: &'static [&'static str] = &["name", "description"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.name.clone()),
            SqlValue::Text(self.description.clone()),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        })
    }

    fn merge(&mut self, patch: Self) {
        overwrite(&mut self.name, patch.name);
        overwrite(&mut self.description, patch.description);
    }

    fn store(stores: &Stores) -> &Arc<dyn EntityStore<Self>> {
        &stores.roles
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}
