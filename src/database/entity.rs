use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::postgres::{PgArguments, PgRow};
use std::sync::Arc;

use crate::database::repository::EntityStore;
use crate::database::stores::Stores;

/// A persisted record kind with a system-assigned numeric identity.
///
/// Implementations describe their table layout (`TABLE`, `COLUMNS`) so a
/// single generic repository can serve every kind, and name the store that
/// holds them so generic handlers can find it.
pub trait Entity:
    Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static
{
    /// Name used in change notifications, e.g. `protocolContent`
    const NAME: &'static str;
    /// Plural path segment under `/api`, e.g. `protocol-contents`
    const PATH: &'static str;
    const TABLE: &'static str;
    /// Non-identity columns, in the order produced by [`Entity::values`]
    const COLUMNS: &'static [&'static str];
    /// Columns holding a UNIQUE constraint in the schema
    const UNIQUE_COLUMNS: &'static [&'static str] = &[];

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    /// Column values matching `COLUMNS`
    fn values(&self) -> Vec<SqlValue>;

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;

    /// Merge-patch: every non-null scalar attribute of `patch` overwrites
    /// the corresponding field. Associations are left untouched.
    fn merge(&mut self, patch: Self);

    fn store(stores: &Stores) -> &Arc<dyn EntityStore<Self>>;

    /// Value of `column` (or `id`) used for ordering
    fn sort_value(&self, column: &str) -> Option<SqlValue> {
        if column == "id" {
            return Some(SqlValue::BigInt(self.id()));
        }
        let index = Self::COLUMNS.iter().position(|c| *c == column)?;
        self.values().into_iter().nth(index)
    }
}

/// Identity equality: equal only when both identities are assigned and the
/// same. Transient instances compare equal to nothing but themselves.
pub fn same_identity<T: Entity>(a: &T, b: &T) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }
    matches!((a.id(), b.id()), (Some(x), Some(y)) if x == y)
}

/// Overwrite `slot` only when `value` is present
pub fn overwrite<V>(slot: &mut Option<V>, value: Option<V>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Typed column value for parameter binding
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum SqlValue {
    Bool(Option<bool>),
    BigInt(Option<i64>),
    Text(Option<String>),
    Timestamp(Option<DateTime<Utc>>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        match self {
            SqlValue::Bool(v) => v.is_none(),
            SqlValue::BigInt(v) => v.is_none(),
            SqlValue::Text(v) => v.is_none(),
            SqlValue::Timestamp(v) => v.is_none(),
        }
    }
}

pub(crate) fn bind_value<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: SqlValue,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        SqlValue::Bool(b) => q.bind(b),
        SqlValue::BigInt(i) => q.bind(i),
        SqlValue::Text(s) => q.bind(s),
        SqlValue::Timestamp(t) => q.bind(t),
    }
}

/// Resolve a sort attribute given in camelCase or snake_case to a column
pub fn resolve_column<T: Entity>(attribute: &str) -> Option<&'static str> {
    let snake = to_snake_case(attribute);
    if snake == "id" {
        return Some("id");
    }
    T::COLUMNS.iter().copied().find(|c| *c == snake)
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Organization, Role};

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_snake_case("createdOrEdited"), "created_or_edited");
        assert_eq!(to_snake_case("name"), "name");
        assert_eq!(to_snake_case("postal_code"), "postal_code");
    }

    #[test]
    fn resolves_known_columns_only() {
        assert_eq!(resolve_column::<Organization>("postalCode"), Some("postal_code"));
        assert_eq!(resolve_column::<Organization>("created_or_edited"), Some("created_or_edited"));
        assert_eq!(resolve_column::<Organization>("id"), Some("id"));
        assert_eq!(resolve_column::<Organization>("name; DROP TABLE role"), None);
        assert_eq!(resolve_column::<Role>("city"), None);
    }

    #[test]
    fn transient_instances_are_only_equal_to_themselves() {
        let a = Role::default();
        let b = Role::default();
        assert!(same_identity(&a, &a));
        assert!(!same_identity(&a, &b));
    }

    #[test]
    fn persisted_instances_compare_by_identity() {
        let mut a = Role::default();
        let mut b = Role::default();
        a.set_id(5);
        b.set_id(5);
        b.name = Some("different".to_string());
        assert!(same_identity(&a, &b));

        b.set_id(6);
        assert!(!same_identity(&a, &b));
    }

    #[test]
    fn overwrite_keeps_existing_value_on_null() {
        let mut slot = Some(1);
        overwrite(&mut slot, None);
        assert_eq!(slot, Some(1));
        overwrite(&mut slot, Some(2));
        assert_eq!(slot, Some(2));
    }

    #[test]
    fn sort_value_reads_named_column() {
        let mut role = Role::default();
        role.set_id(3);
        role.name = Some("admin".to_string());
        assert_eq!(role.sort_value("name"), Some(SqlValue::Text(Some("admin".to_string()))));
        assert_eq!(role.sort_value("id"), Some(SqlValue::BigInt(Some(3))));
        assert_eq!(role.sort_value("missing"), None);
    }
}
