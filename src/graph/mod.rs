//! In-memory entity graph with bidirectional association bookkeeping.
//!
//! Records live in per-kind arenas and refer to each other through typed
//! [`Handle`]s, so cycles such as organization -> protocol -> organization
//! need no shared ownership. Each association is stored once, and the
//! inverse view is derived, which keeps both directions consistent after
//! any sequence of mutations. Relations are selected by the handle types:
//! `graph.set_associated(org, [p1, p2])` updates Organization 1-N Protocol.

pub mod persist;
pub mod relation;

pub use persist::Identities;
pub use relation::{Arena, Handle, ManyToOne, OneToOne};

use crate::database::models::*;

/// Gives access to the arena of one entity kind
pub trait HasArena<T> {
    fn arena(&self) -> &Arena<T>;
    fn arena_mut(&mut self) -> &mut Arena<T>;
}

/// Gives access to the many-to-one relation from `C` to its parent `P`
pub trait HasManyToOne<C, P> {
    fn relation(&self) -> &ManyToOne<C, P>;
    fn relation_mut(&mut self) -> &mut ManyToOne<C, P>;
}

/// Gives access to the one-to-one relation owned by `A`
pub trait HasOneToOne<A, B> {
    fn one_to_one(&self) -> &OneToOne<A, B>;
    fn one_to_one_mut(&mut self) -> &mut OneToOne<A, B>;
}

#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    organizations: Arena<Organization>,
    platform_users: Arena<PlatformUser>,
    protocols: Arena<Protocol>,
    protocol_contents: Arena<ProtocolContent>,
    protocol_pdf_files: Arena<ProtocolPdfFile>,
    additional_users: Arena<AdditionalUser>,
    protocol_templates: Arena<ProtocolTemplate>,
    template_organizations: Arena<TemplateOrganization>,
    roles: Arena<Role>,
    user_roles: Arena<UserRole>,
    user_sessions: Arena<UserSession>,

    protocol_organization: ManyToOne<Protocol, Organization>,
    user_organization: ManyToOne<PlatformUser, Organization>,
    user_role_organization: ManyToOne<UserRole, Organization>,
    template_organization_organization: ManyToOne<TemplateOrganization, Organization>,
    additional_user_user: ManyToOne<AdditionalUser, PlatformUser>,
    protocol_user: ManyToOne<Protocol, PlatformUser>,
    session_user: ManyToOne<UserSession, PlatformUser>,
    user_role_user: ManyToOne<UserRole, PlatformUser>,
    additional_user_protocol: ManyToOne<AdditionalUser, Protocol>,
    template_organization_template: ManyToOne<TemplateOrganization, ProtocolTemplate>,
    user_role_role: ManyToOne<UserRole, Role>,
    protocol_content: OneToOne<Protocol, ProtocolContent>,
    protocol_pdf_file: OneToOne<Protocol, ProtocolPdfFile>,
}

macro_rules! arena {
    ($kind:ty, $field:ident) => {
        impl HasArena<$kind> for EntityGraph {
            fn arena(&self) -> &Arena<$kind> {
                &self.$field
            }
            fn arena_mut(&mut self) -> &mut Arena<$kind> {
                &mut self.$field
            }
        }
    };
}

macro_rules! many_to_one {
    ($child:ty => $parent:ty, $field:ident) => {
        impl HasManyToOne<$child, $parent> for EntityGraph {
            fn relation(&self) -> &ManyToOne<$child, $parent> {
                &self.$field
            }
            fn relation_mut(&mut self) -> &mut ManyToOne<$child, $parent> {
                &mut self.$field
            }
        }
    };
}

macro_rules! one_to_one {
    ($owner:ty => $partner:ty, $field:ident) => {
        impl HasOneToOne<$owner, $partner> for EntityGraph {
            fn one_to_one(&self) -> &OneToOne<$owner, $partner> {
                &self.$field
            }
            fn one_to_one_mut(&mut self) -> &mut OneToOne<$owner, $partner> {
                &mut self.$field
            }
        }
    };
}

arena!(Organization, organizations);
arena!(PlatformUser, platform_users);
arena!(Protocol, protocols);
arena!(ProtocolContent, protocol_contents);
arena!(ProtocolPdfFile, protocol_pdf_files);
arena!(AdditionalUser, additional_users);
arena!(ProtocolTemplate, protocol_templates);
arena!(TemplateOrganization, template_organizations);
arena!(Role, roles);
arena!(UserRole, user_roles);
arena!(UserSession, user_sessions);

many_to_one!(Protocol => Organization, protocol_organization);
many_to_one!(PlatformUser => Organization, user_organization);
many_to_one!(UserRole => Organization, user_role_organization);
many_to_one!(TemplateOrganization => Organization, template_organization_organization);
many_to_one!(AdditionalUser => PlatformUser, additional_user_user);
many_to_one!(Protocol => PlatformUser, protocol_user);
many_to_one!(UserSession => PlatformUser, session_user);
many_to_one!(UserRole => PlatformUser, user_role_user);
many_to_one!(AdditionalUser => Protocol, additional_user_protocol);
many_to_one!(TemplateOrganization => ProtocolTemplate, template_organization_template);
many_to_one!(UserRole => Role, user_role_role);

one_to_one!(Protocol => ProtocolContent, protocol_content);
one_to_one!(Protocol => ProtocolPdfFile, protocol_pdf_file);

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transient record. Its identity and reference fields are
    /// ignored; links are made through the relation methods.
    pub fn insert<T>(&mut self, record: T) -> Handle<T>
    where
        Self: HasArena<T>,
    {
        <Self as HasArena<T>>::arena_mut(self).insert(record)
    }

    pub fn get<T>(&self, handle: Handle<T>) -> Option<&T>
    where
        Self: HasArena<T>,
    {
        <Self as HasArena<T>>::arena(self).get(handle)
    }

    pub fn get_mut<T>(&mut self, handle: Handle<T>) -> Option<&mut T>
    where
        Self: HasArena<T>,
    {
        <Self as HasArena<T>>::arena_mut(self).get_mut(handle)
    }

    pub fn parent<C, P>(&self, child: Handle<C>) -> Option<Handle<P>>
    where
        Self: HasManyToOne<C, P>,
    {
        <Self as HasManyToOne<C, P>>::relation(self).parent(child)
    }

    pub fn children<C, P>(&self, parent: Handle<P>) -> Vec<Handle<C>>
    where
        Self: HasManyToOne<C, P>,
    {
        <Self as HasManyToOne<C, P>>::relation(self).children(parent)
    }

    pub fn set_parent<C, P>(&mut self, child: Handle<C>, parent: Option<Handle<P>>)
    where
        Self: HasManyToOne<C, P>,
    {
        <Self as HasManyToOne<C, P>>::relation_mut(self).set_parent(child, parent)
    }

    pub fn set_associated<C, P, I>(&mut self, parent: Handle<P>, children: I)
    where
        Self: HasManyToOne<C, P>,
        I: IntoIterator<Item = Handle<C>>,
    {
        <Self as HasManyToOne<C, P>>::relation_mut(self).set_associated(parent, children)
    }

    pub fn add_associated<C, P>(&mut self, parent: Handle<P>, child: Handle<C>)
    where
        Self: HasManyToOne<C, P>,
    {
        <Self as HasManyToOne<C, P>>::relation_mut(self).add_associated(parent, child)
    }

    pub fn remove_associated<C, P>(&mut self, parent: Handle<P>, child: Handle<C>)
    where
        Self: HasManyToOne<C, P>,
    {
        <Self as HasManyToOne<C, P>>::relation_mut(self).remove_associated(parent, child)
    }

    pub fn partner<A, B>(&self, owner: Handle<A>) -> Option<Handle<B>>
    where
        Self: HasOneToOne<A, B>,
    {
        <Self as HasOneToOne<A, B>>::one_to_one(self).partner(owner)
    }

    pub fn owner<A, B>(&self, partner: Handle<B>) -> Option<Handle<A>>
    where
        Self: HasOneToOne<A, B>,
    {
        <Self as HasOneToOne<A, B>>::one_to_one(self).owner(partner)
    }

    pub fn set_partner<A, B>(&mut self, owner: Handle<A>, partner: Option<Handle<B>>)
    where
        Self: HasOneToOne<A, B>,
    {
        <Self as HasOneToOne<A, B>>::one_to_one_mut(self).set_partner(owner, partner)
    }

    pub fn set_owner<A, B>(&mut self, partner: Handle<B>, owner: Option<Handle<A>>)
    where
        Self: HasOneToOne<A, B>,
    {
        <Self as HasOneToOne<A, B>>::one_to_one_mut(self).set_owner(partner, owner)
    }
}
