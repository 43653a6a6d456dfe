use sqlx::PgPool;
use std::sync::Arc;

use crate::database::entity::Entity;
use crate::database::memory::{MemoryRepository, Sequence};
use crate::database::models::*;
use crate::database::repository::{EntityStore, PgRepository};

/// One store per entity kind, all on the same backend
#[derive(Clone)]
pub struct Stores {
    pub organizations: Arc<dyn EntityStore<Organization>>,
    pub platform_users: Arc<dyn EntityStore<PlatformUser>>,
    pub protocols: Arc<dyn EntityStore<Protocol>>,
    pub protocol_contents: Arc<dyn EntityStore<ProtocolContent>>,
    pub protocol_pdf_files: Arc<dyn EntityStore<ProtocolPdfFile>>,
    pub additional_users: Arc<dyn EntityStore<AdditionalUser>>,
    pub protocol_templates: Arc<dyn EntityStore<ProtocolTemplate>>,
    pub template_organizations: Arc<dyn EntityStore<TemplateOrganization>>,
    pub roles: Arc<dyn EntityStore<Role>>,
    pub user_roles: Arc<dyn EntityStore<UserRole>>,
    pub user_sessions: Arc<dyn EntityStore<UserSession>>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            organizations: pg(&pool),
            platform_users: pg(&pool),
            protocols: pg(&pool),
            protocol_contents: pg(&pool),
            protocol_pdf_files: pg(&pool),
            additional_users: pg(&pool),
            protocol_templates: pg(&pool),
            template_organizations: pg(&pool),
            roles: pg(&pool),
            user_roles: pg(&pool),
            user_sessions: pg(&pool),
        }
    }

    /// Process-local stores sharing one identity sequence
    pub fn in_memory() -> Self {
        let seq = Sequence::new();
        Self {
            organizations: memory(&seq),
            platform_users: memory(&seq),
            protocols: memory(&seq),
            protocol_contents: memory(&seq),
            protocol_pdf_files: memory(&seq),
            additional_users: memory(&seq),
            protocol_templates: memory(&seq),
            template_organizations: memory(&seq),
            roles: memory(&seq),
            user_roles: memory(&seq),
            user_sessions: memory(&seq),
        }
    }
}

fn pg<T: Entity>(pool: &PgPool) -> Arc<dyn EntityStore<T>> {
    Arc::new(PgRepository::<T>::new(pool.clone()))
}

fn memory<T: Entity>(sequence: &Sequence) -> Arc<dyn EntityStore<T>> {
    Arc::new(MemoryRepository::<T>::new(sequence.clone()))
}
