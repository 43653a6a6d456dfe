use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Typed index of a record in an [`Arena`]
pub struct Handle<T> {
    index: usize,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(index: usize) -> Self {
        Self {
            index,
            _kind: PhantomData,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

/// Append-only storage of transient records
#[derive(Debug, Clone)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Arena<T> {
    pub fn insert(&mut self, item: T) -> Handle<T> {
        self.items.push(item);
        Handle::new(self.items.len() - 1)
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.items.get(handle.index)
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.items.get_mut(handle.index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| (Handle::new(index), item))
    }
}

/// Many-to-one association. The child side is authoritative; the parent's
/// collection is an index kept in step by every mutator, so both sides can
/// never disagree.
#[derive(Debug, Clone)]
pub struct ManyToOne<C, P> {
    parent_of: HashMap<Handle<C>, Handle<P>>,
    children_of: HashMap<Handle<P>, BTreeSet<Handle<C>>>,
}

impl<C, P> Default for ManyToOne<C, P> {
    fn default() -> Self {
        Self {
            parent_of: HashMap::new(),
            children_of: HashMap::new(),
        }
    }
}

impl<C, P> ManyToOne<C, P> {
    pub fn parent(&self, child: Handle<C>) -> Option<Handle<P>> {
        self.parent_of.get(&child).copied()
    }

    /// Children of `parent`, ordered by handle
    pub fn children(&self, parent: Handle<P>) -> Vec<Handle<C>> {
        self.children_of
            .get(&parent)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Owning-side setter: point `child` at `parent`, detaching it from
    /// its previous parent's collection.
    pub fn set_parent(&mut self, child: Handle<C>, parent: Option<Handle<P>>) {
        if let Some(previous) = self.parent_of.remove(&child) {
            if let Some(set) = self.children_of.get_mut(&previous) {
                set.remove(&child);
                if set.is_empty() {
                    self.children_of.remove(&previous);
                }
            }
        }
        if let Some(parent) = parent {
            self.parent_of.insert(child, parent);
            self.children_of.entry(parent).or_default().insert(child);
        }
    }

    /// Replace the whole collection of `parent`. Former members lose their
    /// back-pointer, new members are re-pointed at `parent`.
    pub fn set_associated<I>(&mut self, parent: Handle<P>, children: I)
    where
        I: IntoIterator<Item = Handle<C>>,
    {
        for former in self.children(parent) {
            self.set_parent(former, None);
        }
        for child in children {
            self.set_parent(child, Some(parent));
        }
    }

    pub fn add_associated(&mut self, parent: Handle<P>, child: Handle<C>) {
        self.set_parent(child, Some(parent));
    }

    /// Detach `child` from `parent`. A child that belongs to some other
    /// parent is left alone.
    pub fn remove_associated(&mut self, parent: Handle<P>, child: Handle<C>) {
        if self.parent(child) == Some(parent) {
            self.set_parent(child, None);
        }
    }
}

/// One-to-one association, owned by `A`. Unique on both sides.
#[derive(Debug, Clone)]
pub struct OneToOne<A, B> {
    forward: HashMap<Handle<A>, Handle<B>>,
    backward: HashMap<Handle<B>, Handle<A>>,
}

impl<A, B> Default for OneToOne<A, B> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            backward: HashMap::new(),
        }
    }
}

impl<A, B> OneToOne<A, B> {
    pub fn partner(&self, owner: Handle<A>) -> Option<Handle<B>> {
        self.forward.get(&owner).copied()
    }

    pub fn owner(&self, partner: Handle<B>) -> Option<Handle<A>> {
        self.backward.get(&partner).copied()
    }

    /// Link `owner` to `partner`. The owner's previous partner and the
    /// partner's previous owner are both released.
    pub fn set_partner(&mut self, owner: Handle<A>, partner: Option<Handle<B>>) {
        if let Some(previous) = self.forward.remove(&owner) {
            self.backward.remove(&previous);
        }
        if let Some(partner) = partner {
            if let Some(previous_owner) = self.backward.remove(&partner) {
                self.forward.remove(&previous_owner);
            }
            self.forward.insert(owner, partner);
            self.backward.insert(partner, owner);
        }
    }

    /// Inverse-side setter
    pub fn set_owner(&mut self, partner: Handle<B>, owner: Option<Handle<A>>) {
        match owner {
            Some(owner) => self.set_partner(owner, Some(partner)),
            None => {
                if let Some(previous_owner) = self.backward.remove(&partner) {
                    self.forward.remove(&previous_owner);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Parent;
    struct Child;

    fn arenas(parents: usize, children: usize) -> (Vec<Handle<Parent>>, Vec<Handle<Child>>) {
        let mut p = Arena::default();
        let mut c = Arena::default();
        (
            (0..parents).map(|_| p.insert(Parent)).collect(),
            (0..children).map(|_| c.insert(Child)).collect(),
        )
    }

    fn assert_consistent(rel: &ManyToOne<Child, Parent>) {
        for (child, parent) in &rel.parent_of {
            assert!(rel.children(*parent).contains(child));
        }
        for (parent, set) in &rel.children_of {
            for child in set {
                assert_eq!(rel.parent(*child), Some(*parent));
            }
        }
    }

    #[test]
    fn set_associated_replaces_the_collection() {
        let (parents, children) = arenas(1, 3);
        let (o, p1, p2, p3) = (parents[0], children[0], children[1], children[2]);
        let mut rel = ManyToOne::<Child, Parent>::default();
        rel.add_associated(o, p1);

        rel.set_associated(o, [p2, p3]);

        assert_eq!(rel.parent(p1), None);
        assert_eq!(rel.parent(p2), Some(o));
        assert_eq!(rel.parent(p3), Some(o));
        assert_eq!(rel.children(o), vec![p2, p3]);
        assert_consistent(&rel);
    }

    #[test]
    fn set_associated_steals_children_from_other_parents() {
        let (parents, children) = arenas(2, 2);
        let mut rel = ManyToOne::<Child, Parent>::default();
        rel.set_associated(parents[0], [children[0], children[1]]);

        rel.set_associated(parents[1], [children[1]]);

        assert_eq!(rel.children(parents[0]), vec![children[0]]);
        assert_eq!(rel.children(parents[1]), vec![children[1]]);
        assert_consistent(&rel);
    }

    #[test]
    fn set_associated_with_empty_set_clears_everything() {
        let (parents, children) = arenas(1, 2);
        let mut rel = ManyToOne::<Child, Parent>::default();
        rel.set_associated(parents[0], children.clone());
        rel.set_associated(parents[0], []);
        assert!(rel.children(parents[0]).is_empty());
        assert!(children.iter().all(|c| rel.parent(*c).is_none()));
    }

    #[test]
    fn remove_associated_ignores_foreign_children() {
        let (parents, children) = arenas(2, 1);
        let mut rel = ManyToOne::<Child, Parent>::default();
        rel.add_associated(parents[1], children[0]);

        rel.remove_associated(parents[0], children[0]);
        assert_eq!(rel.parent(children[0]), Some(parents[1]));

        rel.remove_associated(parents[1], children[0]);
        assert_eq!(rel.parent(children[0]), None);
        assert_consistent(&rel);
    }

    #[test]
    fn one_to_one_reassignment_releases_the_old_partner() {
        let (owners, partners) = arenas(1, 2);
        let (protocol, content1, content2) = (owners[0], partners[0], partners[1]);
        let mut rel = OneToOne::<Parent, Child>::default();
        rel.set_partner(protocol, Some(content1));

        rel.set_partner(protocol, Some(content2));

        assert_eq!(rel.owner(content1), None);
        assert_eq!(rel.owner(content2), Some(protocol));
        assert_eq!(rel.partner(protocol), Some(content2));
    }

    #[test]
    fn one_to_one_stays_unique_on_both_sides() {
        let (owners, partners) = arenas(2, 1);
        let mut rel = OneToOne::<Parent, Child>::default();
        rel.set_partner(owners[0], Some(partners[0]));

        rel.set_owner(partners[0], Some(owners[1]));

        assert_eq!(rel.partner(owners[0]), None);
        assert_eq!(rel.partner(owners[1]), Some(partners[0]));

        rel.set_owner(partners[0], None);
        assert_eq!(rel.partner(owners[1]), None);
        assert_eq!(rel.owner(partners[0]), None);
    }

    #[test]
    fn one_to_one_can_be_cleared_from_the_owner() {
        let (owners, partners) = arenas(1, 1);
        let mut rel = OneToOne::<Parent, Child>::default();
        rel.set_partner(owners[0], Some(partners[0]));
        rel.set_partner(owners[0], None);
        assert_eq!(rel.owner(partners[0]), None);
    }
}
