use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, Row};
use std::sync::Arc;

use crate::database::entity::{overwrite, same_identity, Entity, SqlValue};
use crate::database::repository::EntityStore;
use crate::database::stores::Stores;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolTemplate {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub template: Option<String>,
    pub created_or_edited: Option<DateTime<Utc>>,
}

impl Entity for ProtocolTemplate {
    const NAME: &'static str = "protocolTemplate";
    const PATH: &'static str = "protocol-templates";
    const TABLE: &'static str = "protocol_template";
    const COLUMNS: &'static [&'static str] = &["name", "description", "template", "created_or_edited"];

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
            SqlValue::Text(self.template.clone()),
            SqlValue::Timestamp(self.created_or_edited),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            template: row.try_get("template")?,
            created_or_edited: row.try_get("created_or_edited")?,
        })
    }

    fn merge(&mut self, patch: Self) {
        overwrite(&mut self.name, patch.name);
        overwrite(&mut self.description, patch.description);
        overwrite(&mut self.template, patch.template);
        overwrite(&mut self.created_or_edited, patch.created_or_edited);
    }

    fn store(stores: &Stores) -> &Arc<dyn EntityStore<Self>> {
        &stores.protocol_templates
    }
}

impl PartialEq for ProtocolTemplate {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}
