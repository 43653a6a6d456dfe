use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, Row};
use std::sync::Arc;

use crate::database::entity::{overwrite, same_identity, Entity, SqlValue};
use crate::database::repository::EntityStore;
use crate::database::stores::Stores;

/// Rendered PDF of a protocol. `content` carries the file base64 encoded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolPdfFile {
    pub id: Option<i64>,
    pub content: Option<String>,
    pub mime_type: Option<String>,
}

impl Entity for ProtocolPdfFile {
    const NAME: &'static str = "protocolPdfFile";
    const PATH: &'static str = "protocol-pdf-files";
    const TABLE: &'static str = "protocol_pdf_file";
    const COLUMNS: &'static [&'static str] = &["content", "mime_type"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.content.clone()),
            SqlValue::Text(self.mime_type.clone()),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            content: row.try_get("content")?,
            mime_type: row.try_get("mime_type")?,
        })
    }

    fn merge(&mut self, patch: Self) {
        overwrite(&mut self.content, patch.content);
        overwrite(&mut self.mime_type, patch.mime_type);
    }

    fn store(stores: &Stores) -> &Arc<dyn EntityStore<Self>> {
        &stores.protocol_pdf_files
    }
}

impl PartialEq for ProtocolPdfFile {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}
