use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, Row};
use std::sync::Arc;

use crate::database::entity::{overwrite, same_identity, Entity, SqlValue};
use crate::database::repository::EntityStore;
use crate::database::stores::Stores;

/// Text body of a protocol. The owning protocol holds the link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolContent {
    pub id: Option<i64>,
    pub content: Option<String>,
}

impl Entity for ProtocolContent {
    const NAME: &'static str = "protocolContent";
    const PATH: &'static str = "protocol-contents";
    const TABLE: &'static str = "protocol_content";
    const COLUMNS: &'static [&'static str] = &["content"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![SqlValue::Text(self.content.clone())]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            content: row.try_get("content")?,
        })
    }

    fn merge(&mut self, patch: Self) {
        overwrite(&mut self.content, patch.content);
    }

    fn store(stores: &Stores) -> &Arc<dyn EntityStore<Self>> {
        &stores.protocol_contents
    }
}

impl PartialEq for ProtocolContent {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}
