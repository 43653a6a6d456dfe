use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, Row};
use std::sync::Arc;

use crate::database::entity::{overwrite, same_identity, Entity, SqlValue};
use crate::database::repository::EntityStore;
use crate::database::stores::Stores;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Option<i64>,
    pub parent_id: Option<i64>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "type")]
    pub organization_type: Option<String>,
    pub created_or_edited: Option<DateTime<Utc>>,
}

impl Entity for Organization {
    const NAME: &'static str = "organization";
    const PATH: &'static str = "organizations";
    const TABLE: &'static str = "organization";
    const COLUMNS: &'static [&'static str] = &[
        "parent_id",
        "name",
        "address",
        "city",
        "postal_code",
        "country",
        "type",
        "created_or_edited",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::BigInt(self.parent_id),
            SqlValue::Text(self.name.clone()),
            SqlValue::Text(self.address.clone()),
            SqlValue::Text(self.city.clone()),
            SqlValue::Text(self.postal_code.clone()),
            SqlValue::Text(self.country.clone()),
            SqlValue::Text(self.organization_type.clone()),
            SqlValue::Timestamp(self.created_or_edited),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            parent_id: row.try_get("parent_id")?,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            postal_code: row.try_get("postal_code")?,
            country: row.try_get("country")?,
            organization_type: row.try_get("type")?,
            created_or_edited: row.try_get("created_or_edited")?,
        })
    }

    fn merge(&mut self, patch: Self) {
        overwrite(&mut self.parent_id, patch.parent_id);
        overwrite(&mut self.name, patch.name);
        overwrite(&mut self.address, patch.address);
        overwrite(&mut self.city, patch.city);
        overwrite(&mut self.postal_code, patch.postal_code);
        overwrite(&mut self.country, patch.country);
        overwrite(&mut self.organization_type, patch.organization_type);
        overwrite(&mut self.created_or_edited, patch.created_or_edited);
    }

    fn store(stores: &Stores) -> &Arc<dyn EntityStore<Self>> {
        &stores.organizations
    }
}

impl PartialEq for Organization {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}
