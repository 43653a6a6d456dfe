use async_trait::async_trait;
use sqlx::{self, PgPool, Row};

use crate::database::entity::{bind_value, resolve_column, Entity};
use crate::database::manager::DatabaseError;

/// Persistence port for one entity kind.
///
/// Implemented over Postgres by [`PgRepository`] and in process by
/// [`crate::database::memory::MemoryRepository`].
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Insert `entity` under a freshly assigned identity. Any identity on
    /// the incoming value is ignored.
    async fn create(&self, entity: T) -> Result<T, DatabaseError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<T>, DatabaseError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, DatabaseError>;

    /// Every record, ordered by identity
    async fn list_all(&self) -> Result<Vec<T>, DatabaseError>;

    async fn list_page(&self, request: &PageRequest) -> Result<Page<T>, DatabaseError>;

    /// Overwrite the stored record with the same identity. Returns `None`
    /// when no such record exists; nothing is written in that case.
    async fn update(&self, entity: T) -> Result<Option<T>, DatabaseError>;

    /// Returns whether a record was removed
    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub descending: bool,
}

impl Sort {
    /// Parse `attribute[,asc|desc]` against the columns of `T`
    pub fn parse<T: Entity>(raw: &str) -> Result<Self, String> {
        let mut parts = raw.split(',').map(str::trim);
        let attribute = parts.next().unwrap_or_default();
        let column = resolve_column::<T>(attribute)
            .ok_or_else(|| format!("Unknown sort attribute '{}'", attribute))?;
        let descending = match parts.next().map(|d| d.to_ascii_lowercase()) {
            None => false,
            Some(d) if d == "asc" => false,
            Some(d) if d == "desc" => true,
            Some(d) => return Err(format!("Unknown sort direction '{}'", d)),
        };
        Ok(Self { column, descending })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.size))
    }
}

/// Unique-constraint failures become [`DatabaseError::UniqueViolation`]
fn write_error(err: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return DatabaseError::UniqueViolation(db.constraint().unwrap_or("unique").to_string());
        }
    }
    DatabaseError::Sqlx(err)
}

pub struct PgRepository<T> {
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Entity> PgRepository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    fn column_list() -> String {
        T::COLUMNS
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for PgRepository<T> {
    async fn create(&self, entity: T) -> Result<T, DatabaseError> {
        let placeholders = (1..=T::COLUMNS.len())
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING *",
            T::TABLE,
            Self::column_list(),
            placeholders
        );

        let mut q = sqlx::query(&sql);
        for value in entity.values() {
            q = bind_value(q, value);
        }
        let row = q.fetch_one(&self.pool).await.map_err(write_error)?;
        Ok(T::from_row(&row)?)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        let sql = format!("SELECT * FROM \"{}\" WHERE id = $1", T::TABLE);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(T::from_row).transpose()?)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM \"{}\" WHERE id = $1) AS present",
            T::TABLE
        );
        let row = sqlx::query(&sql).bind(id).fetch_one(&self.pool).await?;
        Ok(row.try_get("present")?)
    }

    async fn list_all(&self) -> Result<Vec<T>, DatabaseError> {
        let sql = format!("SELECT * FROM \"{}\" ORDER BY id", T::TABLE);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| T::from_row(row).map_err(DatabaseError::from))
            .collect()
    }

    async fn list_page(&self, request: &PageRequest) -> Result<Page<T>, DatabaseError> {
        let count_sql = format!("SELECT COUNT(*) AS count FROM \"{}\"", T::TABLE);
        let total: i64 = sqlx::query(&count_sql)
            .fetch_one(&self.pool)
            .await?
            .try_get("count")?;

        // Column names come from `resolve_column`, never from the request
        let order = match request.sort {
            Some(sort) if sort.column != "id" => format!(
                "\"{}\" {}, id",
                sort.column,
                if sort.descending { "DESC" } else { "ASC" }
            ),
            Some(sort) if sort.descending => "id DESC".to_string(),
            _ => "id".to_string(),
        };
        let sql = format!(
            "SELECT * FROM \"{}\" ORDER BY {} LIMIT $1 OFFSET $2",
            T::TABLE,
            order
        );
        let rows = sqlx::query(&sql)
            .bind(i64::from(request.size))
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;
        let items = rows
            .iter()
            .map(T::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            number: request.page,
            size: request.size,
            total_elements: total.max(0) as u64,
        })
    }

    async fn update(&self, entity: T) -> Result<Option<T>, DatabaseError> {
        let id = entity
            .id()
            .ok_or_else(|| DatabaseError::QueryError("update requires an identity".to_string()))?;
        let assignments = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, c)| format!("\"{}\" = ${}", c, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE \"{}\" SET {} WHERE id = ${} RETURNING *",
            T::TABLE,
            assignments,
            T::COLUMNS.len() + 1
        );

        let mut q = sqlx::query(&sql);
        for value in entity.values() {
            q = bind_value(q, value);
        }
        let row = q
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(write_error)?;
        Ok(row.as_ref().map(T::from_row).transpose()?)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
