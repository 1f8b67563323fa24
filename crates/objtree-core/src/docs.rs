//! Documentation lookup for type catalog entries.
//!
//! The catalog builder asks a [`DocLookup`] once for each new type (member
//! `""`) and once per member. Absence is `None` and lands in the tree as an
//! empty string.

use std::any::TypeId;
use std::collections::HashMap;

use crate::describe::{Describe, TypeDesc, TypeRef};

/// Supplies documentation for a type or one of its members.
pub trait DocLookup: Send + Sync {
    /// `member` is `""` for the type-level doc.
    fn lookup(&self, ty: &TypeDesc, member: &str) -> Option<String>;
}

/// Docs captured from `///` comments by the derive macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedDocs;

impl DocLookup for EmbeddedDocs {
    fn lookup(&self, ty: &TypeDesc, member: &str) -> Option<String> {
        let doc = if member.is_empty() {
            &ty.doc
        } else {
            &ty.member(member)?.doc
        };
        (!doc.is_empty()).then(|| doc.to_string())
    }
}

/// Never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDocs;

impl DocLookup for NoDocs {
    fn lookup(&self, _ty: &TypeDesc, _member: &str) -> Option<String> {
        None
    }
}

impl<F> DocLookup for F
where
    F: Fn(&TypeDesc, &str) -> Option<String> + Send + Sync,
{
    fn lookup(&self, ty: &TypeDesc, member: &str) -> Option<String> {
        self(ty, member)
    }
}

/// Tries the first lookup, then the second.
impl<A: DocLookup, B: DocLookup> DocLookup for (A, B) {
    fn lookup(&self, ty: &TypeDesc, member: &str) -> Option<String> {
        self.0.lookup(ty, member).or_else(|| self.1.lookup(ty, member))
    }
}

/// Registry of docs keyed by canonical type, filled at runtime.
///
/// Keys strip pointer indirection, so docs registered for `Box<Account>`
/// are found for `Account`.
#[derive(Debug, Clone, Default)]
pub struct DocIndex {
    entries: HashMap<TypeId, HashMap<String, String>>,
}

impl DocIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the doc of `member` (`""` for the type itself) of `T`.
    pub fn insert<T: Describe + ?Sized>(&mut self, member: &str, doc: impl Into<String>) {
        self.entries
            .entry(canonical_key::<T>())
            .or_default()
            .insert(member.to_string(), doc.into());
    }

    /// Registers every `(member, doc)` pair for `T`, replacing earlier entries
    /// with the same member.
    pub fn load<T, I, K, V>(&mut self, docs: I)
    where
        T: Describe + ?Sized,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let slot = self.entries.entry(canonical_key::<T>()).or_default();
        slot.extend(docs.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DocLookup for DocIndex {
    fn lookup(&self, ty: &TypeDesc, member: &str) -> Option<String> {
        self.entries.get(&ty.key)?.get(member).cloned()
    }
}

fn canonical_key<T: Describe + ?Sized>() -> TypeId {
    TypeRef::of::<T>().canonical().key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::Member;
    use crate::kind::Kind;

    struct Account;

    impl Describe for Account {
        fn describe() -> TypeDesc {
            TypeDesc::named::<Account>(Kind::Struct, "bank", "Account")
                .with_doc("A ledger account.")
                .with_member(Member::field("owner", TypeRef::of::<String>(), true, false).with_doc("Holder."))
                .with_member(Member::field("id", TypeRef::of::<u64>(), true, false))
        }
    }

    impl crate::inspect::Inspect for Account {
        fn type_ref(&self) -> TypeRef {
            TypeRef::of::<Account>()
        }

        fn view(&self) -> crate::inspect::View<'_> {
            crate::inspect::View::Opaque
        }
    }

    #[test]
    fn embedded_docs_read_the_descriptor() {
        let desc = Account::describe();
        assert_eq!(EmbeddedDocs.lookup(&desc, "").as_deref(), Some("A ledger account."));
        assert_eq!(EmbeddedDocs.lookup(&desc, "owner").as_deref(), Some("Holder."));
        assert_eq!(EmbeddedDocs.lookup(&desc, "id"), None);
        assert_eq!(EmbeddedDocs.lookup(&desc, "missing"), None);
    }

    #[test]
    fn index_strips_pointers() {
        let mut index = DocIndex::new();
        index.insert::<Box<Account>>("", "registered through a box");
        index.load::<Account, _, _, _>([("id", "Primary key.")]);

        let desc = Account::describe();
        assert_eq!(index.lookup(&desc, "").as_deref(), Some("registered through a box"));
        assert_eq!(index.lookup(&desc, "id").as_deref(), Some("Primary key."));
        assert_eq!(index.lookup(&desc, "owner"), None);
    }

    #[test]
    fn pair_falls_back_to_second() {
        let mut index = DocIndex::new();
        index.insert::<Account>("id", "from index");
        let docs = (index, EmbeddedDocs);

        let desc = Account::describe();
        assert_eq!(docs.lookup(&desc, "id").as_deref(), Some("from index"));
        assert_eq!(docs.lookup(&desc, "owner").as_deref(), Some("Holder."));
    }

    #[test]
    fn closures_are_lookups() {
        let upper = |ty: &TypeDesc, member: &str| Some(format!("{}.{}", ty.name, member));
        let desc = Account::describe();
        assert_eq!(upper.lookup(&desc, "id").as_deref(), Some("Account.id"));
        assert_eq!(NoDocs.lookup(&desc, ""), None);
    }
}
