// handlers/mod.rs - request handlers
//
// resource: create / update / partial update / get / delete, generic over the entity kind
// listing:  the list variants (plain, paginated, protocol-is-null filter)
// system:   service description and health

pub mod listing;
pub mod resource;
pub mod system;

use axum::http::HeaderMap;
use sqlx::PgPool;
use std::sync::Arc;

use crate::api::entity_alert;
use crate::config::ApiConfig;
use crate::database::{Entity, Stores};
use crate::observer::{ChangeBus, EntityChange};
use crate::types::ChangeAction;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub changes: ChangeBus,
    pub api: Arc<ApiConfig>,
    /// Present on the Postgres backend, used by the health check
    pub pool: Option<PgPool>,
}

impl AppState {
    pub fn new(stores: Stores, api: ApiConfig, pool: Option<PgPool>) -> Self {
        Self {
            stores,
            changes: ChangeBus::new(),
            api: Arc::new(api),
            pool,
        }
    }

    /// Publish a change of `T` and build its alert headers
    pub fn record_change<T: Entity>(&self, id: i64, action: ChangeAction) -> HeaderMap {
        self.changes.publish(EntityChange::new(T::NAME, id, action));
        entity_alert(&self.api.application_name, T::NAME, id, action)
    }
}
