use std::collections::HashMap;
use std::sync::Arc;

use crate::database::models::*;
use crate::database::{DatabaseError, Entity, EntityStore, Stores};
use crate::graph::{Arena, EntityGraph, Handle, HasManyToOne, HasOneToOne};
use crate::types::EntityRef;

/// Identities assigned to graph records by [`EntityGraph::persist`]
#[derive(Debug, Default, Clone)]
pub struct Identities {
    assigned: HashMap<(&'static str, usize), i64>,
}

impl Identities {
    pub fn id<T: Entity>(&self, handle: Handle<T>) -> Option<i64> {
        self.assigned.get(&(T::NAME, handle.index())).copied()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    fn reference<T: Entity>(&self, handle: Option<Handle<T>>) -> Option<EntityRef> {
        handle.and_then(|h| self.id(h)).map(EntityRef::new)
    }

    fn record<T: Entity>(&mut self, handle: Handle<T>, id: i64) {
        self.assigned.insert((T::NAME, handle.index()), id);
    }
}

async fn write_all<T, F>(
    arena: &Arena<T>,
    store: &Arc<dyn EntityStore<T>>,
    ids: &mut Identities,
    link: F,
) -> Result<(), DatabaseError>
where
    T: Entity,
    F: Fn(Handle<T>, &mut T, &Identities),
{
    for (handle, record) in arena.iter() {
        let mut record = record.clone();
        link(handle, &mut record, ids);
        let saved = store.create(record).await?;
        let id = saved
            .id()
            .ok_or_else(|| DatabaseError::QueryError(format!("{} saved without identity", T::NAME)))?;
        ids.record(handle, id);
    }
    Ok(())
}

impl EntityGraph {
    fn parent_ref<C, P: Entity>(&self, ids: &Identities, child: Handle<C>) -> Option<EntityRef>
    where
        Self: HasManyToOne<C, P>,
    {
        ids.reference(self.parent::<C, P>(child))
    }

    fn partner_ref<B: Entity>(&self, ids: &Identities, owner: Handle<Protocol>) -> Option<EntityRef>
    where
        Self: HasOneToOne<Protocol, B>,
    {
        ids.reference(self.partner::<Protocol, B>(owner))
    }

    /// Write every record through `stores`, parents before the records that
    /// point at them, and return the identities they were given. Reference
    /// fields are taken from the graph's relations.
    pub async fn persist(&self, stores: &Stores) -> Result<Identities, DatabaseError> {
        let mut ids = Identities::default();

        write_all(&self.organizations, &stores.organizations, &mut ids, |_, _, _| {}).await?;
        write_all(&self.roles, &stores.roles, &mut ids, |_, _, _| {}).await?;
        write_all(&self.protocol_templates, &stores.protocol_templates, &mut ids, |_, _, _| {}).await?;
        write_all(&self.protocol_contents, &stores.protocol_contents, &mut ids, |_, _, _| {}).await?;
        write_all(&self.protocol_pdf_files, &stores.protocol_pdf_files, &mut ids, |_, _, _| {}).await?;

        write_all(&self.platform_users, &stores.platform_users, &mut ids, |h, user, ids| {
            user.organization = self.parent_ref::<PlatformUser, Organization>(ids, h);
        })
        .await?;

        write_all(&self.protocols, &stores.protocols, &mut ids, |h, protocol, ids| {
            protocol.organization = self.parent_ref::<Protocol, Organization>(ids, h);
            protocol.platform_user = self.parent_ref::<Protocol, PlatformUser>(ids, h);
            protocol.protocol_content = self.partner_ref::<ProtocolContent>(ids, h);
            protocol.protocol_pdf_file = self.partner_ref::<ProtocolPdfFile>(ids, h);
        })
        .await?;

        write_all(&self.additional_users, &stores.additional_users, &mut ids, |h, extra, ids| {
            extra.platform_user = self.parent_ref::<AdditionalUser, PlatformUser>(ids, h);
            extra.protocol = self.parent_ref::<AdditionalUser, Protocol>(ids, h);
        })
        .await?;

        write_all(&self.template_organizations, &stores.template_organizations, &mut ids, |h, link, ids| {
            link.organization = self.parent_ref::<TemplateOrganization, Organization>(ids, h);
            link.protocol_template = self.parent_ref::<TemplateOrganization, ProtocolTemplate>(ids, h);
        })
        .await?;

        write_all(&self.user_roles, &stores.user_roles, &mut ids, |h, grant, ids| {
            grant.platform_user = self.parent_ref::<UserRole, PlatformUser>(ids, h);
            grant.organization = self.parent_ref::<UserRole, Organization>(ids, h);
            grant.role = self.parent_ref::<UserRole, Role>(ids, h);
        })
        .await?;

        write_all(&self.user_sessions, &stores.user_sessions, &mut ids, |h, session, ids| {
            session.platform_user = self.parent_ref::<UserSession, PlatformUser>(ids, h);
        })
        .await?;

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn persist_writes_references_from_relations() {
        let stores = Stores::in_memory();
        let mut graph = EntityGraph::new();
        let org = graph.insert(Organization {
            name: Some("Ortsverein Mitte".to_string()),
            ..Default::default()
        });
        let user = graph.insert(PlatformUser {
            user_name: Some("jdoe".to_string()),
            // ignored, the relation decides
            organization: Some(EntityRef::new(424242)),
            ..Default::default()
        });
        let protocol = graph.insert(Protocol::default());
        let content = graph.insert(ProtocolContent {
            content: Some("<p>Einsatz</p>".to_string()),
            ..Default::default()
        });
        graph.add_associated(org, user);
        graph.add_associated(org, protocol);
        graph.add_associated(user, protocol);
        graph.set_partner(protocol, Some(content));

        let ids = graph.persist(&stores).await.unwrap();
        assert_eq!(ids.len(), 4);

        let org_id = ids.id(org).unwrap();
        let user_id = ids.id(user).unwrap();
        let saved_user = stores.platform_users.get_by_id(user_id).await.unwrap().unwrap();
        assert_eq!(saved_user.organization, Some(EntityRef::new(org_id)));

        let saved = stores.protocols.get_by_id(ids.id(protocol).unwrap()).await.unwrap().unwrap();
        assert_eq!(saved.organization, Some(EntityRef::new(org_id)));
        assert_eq!(saved.platform_user, Some(EntityRef::new(user_id)));
        assert_eq!(saved.protocol_content, Some(EntityRef::new(ids.id(content).unwrap())));
        assert_eq!(saved.protocol_pdf_file, None);
    }

    #[tokio::test]
    async fn empty_graph_persists_nothing() {
        let stores = Stores::in_memory();
        let ids = EntityGraph::new().persist(&stores).await.unwrap();
        assert!(ids.is_empty());
        assert!(stores.organizations.list_all().await.unwrap().is_empty());
    }
}
