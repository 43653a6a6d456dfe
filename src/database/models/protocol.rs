use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, Row};
use std::sync::Arc;

use crate::database::entity::{overwrite, same_identity, Entity, SqlValue};
use crate::database::repository::EntityStore;
use crate::database::stores::Stores;
use crate::types::EntityRef;

/// A protocol document. Owns the links to its content and its PDF
/// rendering, and belongs to a user and an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protocol {
    pub id: Option<i64>,
    pub is_draft: Option<bool>,
    pub review_comment: Option<String>,
    pub is_closed: Option<bool>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_or_edited: Option<DateTime<Utc>>,
    pub protocol_content: Option<EntityRef>,
    pub protocol_pdf_file: Option<EntityRef>,
    pub platform_user: Option<EntityRef>,
    pub organization: Option<EntityRef>,
}

impl Entity for Protocol {
    const NAME: &'static str = "protocol";
    const PATH: &'static str = "protocols";
    const TABLE: &'static str = "protocol";
    const COLUMNS: &'static [&'static str] = &[
        "is_draft",
        "review_comment",
        "is_closed",
        "closed_at",
        "created_or_edited",
        "protocol_content_id",
        "protocol_pdf_file_id",
        "platform_user_id",
        "organization_id",
    ];
    const UNIQUE_COLUMNS: &'static [&'static str] = &["protocol_content_id", "protocol_pdf_file_id"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Bool(self.is_draft),
            SqlValue::Text(self.review_comment.clone()),
            SqlValue::Bool(self.is_closed),
            SqlValue::Timestamp(self.closed_at),
            SqlValue::Timestamp(self.created_or_edited),
            SqlValue::BigInt(EntityRef::to_column(self.protocol_content)),
            SqlValue::BigInt(EntityRef::to_column(self.protocol_pdf_file)),
            SqlValue::BigInt(EntityRef::to_column(self.platform_user)),
            SqlValue::BigInt(EntityRef::to_column(self.organization)),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            is_draft: row.try_get("is_draft")?,
            review_comment: row.try_get("review_comment")?,
            is_closed: row.try_get("is_closed")?,
            closed_at: row.try_get("closed_at")?,
            created_or_edited: row.try_get("created_or_edited")?,
            protocol_content: EntityRef::from_column(row.try_get("protocol_content_id")?),
            protocol_pdf_file: EntityRef::from_column(row.try_get("protocol_pdf_file_id")?),
            platform_user: EntityRef::from_column(row.try_get("platform_user_id")?),
            organization: EntityRef::from_column(row.try_get("organization_id")?),
        })
    }

    fn merge(&mut self, patch: Self) {
        overwrite(&mut self.is_draft, patch.is_draft);
        overwrite(&mut self.review_comment, patch.review_comment);
        overwrite(&mut self.is_closed, patch.is_closed);
        overwrite(&mut self.closed_at, patch.closed_at);
        overwrite(&mut self.created_or_edited, patch.created_or_edited);
    }

    fn store(stores: &Stores) -> &Arc<dyn EntityStore<Self>> {
        &stores.protocols
    }
}

impl PartialEq for Protocol {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}
