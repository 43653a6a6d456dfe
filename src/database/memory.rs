use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::entity::{Entity, SqlValue};
use crate::database::manager::DatabaseError;
use crate::database::repository::{EntityStore, Page, PageRequest, Sort};

/// First identity handed out, same as the Postgres `sequence_generator`
pub const SEQUENCE_START: i64 = 1050;

/// Identity sequence shared by every in-memory store of one application
#[derive(Debug, Clone)]
pub struct Sequence(Arc<AtomicI64>);

impl Sequence {
    pub fn new() -> Self {
        Self(Arc::new(AtomicI64::new(SEQUENCE_START)))
    }

    pub fn next(&self) -> i64 {
        self.0.fetch_add(1, AtomicOrdering::SeqCst)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MemoryRepository<T> {
    rows: RwLock<BTreeMap<i64, T>>,
    sequence: Sequence,
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new(sequence: Sequence) -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            sequence,
        }
    }
}

/// Postgres ordering: nulls sort last ascending and first descending
fn compare<T: Entity>(a: &T, b: &T, sort: &Sort) -> Ordering {
    let left = a.sort_value(sort.column);
    let right = b.sort_value(sort.column);
    let by_value = match (left, right) {
        (Some(l), Some(r)) => match (l.is_null(), r.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => compare_values(&l, &r),
        },
        _ => Ordering::Equal,
    };
    let by_value = if sort.descending { by_value.reverse() } else { by_value };
    by_value.then_with(|| a.id().cmp(&b.id()))
}

/// Rejects `entity` when another row already holds one of its unique values
fn check_unique<T: Entity>(rows: &BTreeMap<i64, T>, entity: &T) -> Result<(), DatabaseError> {
    for column in T::UNIQUE_COLUMNS {
        let Some(value) = entity.sort_value(column).filter(|v| !v.is_null()) else {
            continue;
        };
        let taken = rows
            .values()
            .any(|other| other.id() != entity.id() && other.sort_value(column).as_ref() == Some(&value));
        if taken {
            return Err(DatabaseError::UniqueViolation(format!("{}.{}", T::TABLE, column)));
        }
    }
    Ok(())
}

fn compare_values(l: &SqlValue, r: &SqlValue) -> Ordering {
    l.partial_cmp(r).unwrap_or(Ordering::Equal)
}

#[async_trait]
impl<T: Entity> EntityStore<T> for MemoryRepository<T> {
    async fn create(&self, mut entity: T) -> Result<T, DatabaseError> {
        let id = self.sequence.next();
        entity.set_id(id);
        let mut rows = self.rows.write().await;
        check_unique(&rows, &entity)?;
        rows.insert(id, entity.clone());
        Ok(entity)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.rows.read().await.contains_key(&id))
    }

    async fn list_all(&self) -> Result<Vec<T>, DatabaseError> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn list_page(&self, request: &PageRequest) -> Result<Page<T>, DatabaseError> {
        let mut items: Vec<T> = self.rows.read().await.values().cloned().collect();
        let total_elements = items.len() as u64;
        if let Some(sort) = &request.sort {
            items.sort_by(|a, b| compare(a, b, sort));
        }

        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = items
            .into_iter()
            .skip(offset)
            .take(request.size as usize)
            .collect();

        Ok(Page {
            items,
            number: request.page,
            size: request.size,
            total_elements,
        })
    }

    async fn update(&self, entity: T) -> Result<Option<T>, DatabaseError> {
        let Some(id) = entity.id() else {
            return Err(DatabaseError::QueryError("update requires an identity".to_string()));
        };
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&id) {
            return Ok(None);
        }
        check_unique(&rows, &entity)?;
        rows.insert(id, entity.clone());
        Ok(Some(entity))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Protocol, Role};
    use crate::types::EntityRef;

    fn role(name: &str) -> Role {
        Role {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_identities_from_the_shared_sequence() {
        let sequence = Sequence::new();
        let roles = MemoryRepository::<Role>::new(sequence.clone());
        let protocols = MemoryRepository::<Protocol>::new(sequence);

        let mut incoming = role("admin");
        incoming.id = Some(7);
        let first = roles.create(incoming).await.unwrap();
        let second = protocols.create(Protocol::default()).await.unwrap();
        let third = roles.create(role("viewer")).await.unwrap();

        assert_eq!(first.id, Some(SEQUENCE_START));
        assert_eq!(second.id, Some(SEQUENCE_START + 1));
        assert_eq!(third.id, Some(SEQUENCE_START + 2));
        assert!(!roles.exists_by_id(7).await.unwrap());
    }

    #[tokio::test]
    async fn update_only_touches_existing_rows() {
        let roles = MemoryRepository::<Role>::new(Sequence::new());
        let mut saved = roles.create(role("admin")).await.unwrap();

        saved.description = Some("full access".to_string());
        let updated = roles.update(saved.clone()).await.unwrap();
        assert_eq!(updated.and_then(|r| r.description).as_deref(), Some("full access"));

        let mut ghost = role("ghost");
        ghost.id = Some(9999);
        assert!(roles.update(ghost).await.unwrap().is_none());
        assert!(!roles.exists_by_id(9999).await.unwrap());
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let roles = MemoryRepository::<Role>::new(Sequence::new());
        let saved = roles.create(role("admin")).await.unwrap();
        let id = saved.id.unwrap();

        assert!(roles.delete_by_id(id).await.unwrap());
        assert!(!roles.delete_by_id(id).await.unwrap());
        assert!(roles.get_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_page_slices_and_sorts() {
        let roles = MemoryRepository::<Role>::new(Sequence::new());
        for name in ["delta", "alpha", "charlie", "bravo", "echo"] {
            roles.create(role(name)).await.unwrap();
        }
        roles.create(Role::default()).await.unwrap();

        let request = PageRequest {
            page: 0,
            size: 4,
            sort: Some(Sort::parse::<Role>("name").unwrap()),
        };
        let page = roles.list_page(&request).await.unwrap();
        let names: Vec<_> = page.items.iter().map(|r| r.name.clone()).collect();
        assert_eq!(
            names,
            vec![
                Some("alpha".to_string()),
                Some("bravo".to_string()),
                Some("charlie".to_string()),
                Some("delta".to_string())
            ]
        );
        assert_eq!(page.total_elements, 6);
        assert_eq!(page.total_pages(), 2);

        let request = PageRequest { page: 1, ..request };
        let page = roles.list_page(&request).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].name.as_deref(), Some("echo"));
        assert!(page.items[1].name.is_none());
    }

    #[tokio::test]
    async fn list_all_is_ordered_by_identity() {
        let roles = MemoryRepository::<Role>::new(Sequence::new());
        for name in ["b", "a", "c"] {
            roles.create(role(name)).await.unwrap();
        }
        let ids: Vec<_> = roles.list_all().await.unwrap().into_iter().map(|r| r.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn protocol_partners_are_held_by_one_protocol() {
        let protocols = MemoryRepository::<Protocol>::new(Sequence::new());
        let holding = |content: i64| Protocol {
            protocol_content: Some(EntityRef::new(content)),
            ..Default::default()
        };

        let first = protocols.create(holding(1)).await.unwrap();
        let err = protocols.create(holding(1)).await.unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(ref c) if c == "protocol.protocol_content_id"));

        // Moving another protocol onto a taken content fails too
        let mut second = protocols.create(holding(2)).await.unwrap();
        second.protocol_content = Some(EntityRef::new(1));
        assert!(matches!(
            protocols.update(second).await,
            Err(DatabaseError::UniqueViolation(_))
        ));

        // Re-saving the holder and leaving the link empty are fine
        assert!(protocols.update(first).await.unwrap().is_some());
        protocols.create(Protocol::default()).await.unwrap();
        protocols.create(Protocol::default()).await.unwrap();
        assert_eq!(protocols.list_all().await.unwrap().len(), 4);
    }
}
