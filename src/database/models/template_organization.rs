use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, Row};
use std::sync::Arc;

use crate::database::entity::{same_identity, Entity, SqlValue};
use crate::database::repository::EntityStore;
use crate::database::stores::Stores;
use crate::types::EntityRef;

/// Join record: a protocol template made available to an organization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOrganization {
    pub id: Option<i64>,
    pub organization: Option<EntityRef>,
    pub protocol_template: Option<EntityRef>,
}

impl Entity for TemplateOrganization {
    const NAME: &'static str = "templateOrganization";
    const PATH: &'static str = "template-organizations";
    const TABLE: &'static str = "template_organization";
    const COLUMNS: &'static [&'static str] = &["organization_id", "protocol_template_id"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::BigInt(EntityRef::to_column(self.organization)),
            SqlValue::BigInt(EntityRef::to_column(self.protocol_template)),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            organization: EntityRef::from_column(row.try_get("organization_id")?),
            protocol_template: EntityRef::from_column(row.try_get("protocol_template_id")?),
        })
    }

    fn merge(&mut self, _patch: Self) {}

    fn store(stores: &Stores) -> &Arc<dyn EntityStore<Self>> {
        &stores.template_organizations
    }
}

impl PartialEq for TemplateOrganization {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}
