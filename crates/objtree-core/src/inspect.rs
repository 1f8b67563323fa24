//! Value-level half of the introspection layer.
//!
//! [`Inspect`] is dyn-compatible: the value graph builder walks a tree of
//! `&dyn Inspect` handles, asking each for its declared type and a [`View`]
//! of its immediate children. Identity is the address of the handle's data
//! paired with its type, so a struct and its first field never collide.
//! Zero-sized values own no storage and have no identity.
//!
//! Trait objects are reached through pointers. [`Pointee`] lets `Box`, `Rc`
//! and `Arc` tell whether their target is a concrete value (plain
//! indirection) or a trait object (an interface value holding a concrete
//! one). `#[interface]` implements it for `dyn Trait`; [`Object`] is the
//! method-less interface every inspectable type satisfies.

use std::any::TypeId;
use std::mem;

use crate::describe::{Describe, TypeDesc, TypeRef};

/// Runtime access to a value's type and children.
pub trait Inspect {
    /// Declared type of this value.
    fn type_ref(&self) -> TypeRef;

    /// Immediate children of this value.
    fn view(&self) -> View<'_>;
}

/// Decomposition of a value into its immediate children.
pub enum View<'a> {
    /// Leaf value: primitives, functions, opaque types.
    Opaque,
    /// Indirection; `None` is a nil pointer.
    Pointer(Option<&'a dyn Inspect>),
    /// Interface value holding a concrete value; `None` is a nil interface.
    Interface(Option<&'a dyn Inspect>),
    /// Struct fields in declaration order.
    Struct(Vec<Field<'a>>),
    /// Map entries in storage order, each with a textual rendering of its key.
    Map(Vec<Entry<'a>>),
    /// Slice or array elements by index.
    Seq(Vec<&'a dyn Inspect>),
}

pub struct Field<'a> {
    pub name: &'static str,
    pub value: &'a dyn Inspect,
    pub exported: bool,
    pub anonymous: bool,
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, value: &'a dyn Inspect, exported: bool, anonymous: bool) -> Self {
        Field {
            name,
            value,
            exported,
            anonymous,
        }
    }
}

pub struct Entry<'a> {
    pub key: String,
    pub value: &'a dyn Inspect,
}

impl<'a> Entry<'a> {
    pub fn new(key: String, value: &'a dyn Inspect) -> Self {
        Entry { key, value }
    }
}

/// Identity of a value: same storage, same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    addr: usize,
    ty: TypeId,
}

impl Identity {
    /// `None` for zero-sized values: distinct instances may share an address.
    pub fn of(value: &dyn Inspect) -> Option<Self> {
        if mem::size_of_val(value) == 0 {
            return None;
        }
        Some(Identity {
            addr: value as *const dyn Inspect as *const () as usize,
            ty: value.type_ref().key(),
        })
    }
}

/// Upcast to `&dyn Inspect`. Supertrait of every `#[interface]` trait.
pub trait AsInspect {
    fn as_inspect(&self) -> &dyn Inspect;
}

impl<T: Inspect> AsInspect for T {
    fn as_inspect(&self) -> &dyn Inspect {
        self
    }
}

/// Target of a pointer type.
pub trait Pointee {
    /// The interface type when `Self` is a trait object.
    fn interface() -> Option<TypeRef> {
        None
    }

    /// The value a pointer to `Self` leads to: `self`, or for trait objects
    /// the concrete value they hold.
    fn target(&self) -> &dyn Inspect;
}

impl<T: Inspect + Describe> Pointee for T {
    fn target(&self) -> &dyn Inspect {
        self
    }
}

/// The empty interface: any inspectable value.
pub trait Object: AsInspect {}

impl<T: Inspect> Object for T {}

impl Describe for dyn Object {
    fn describe() -> TypeDesc {
        TypeDesc::interface::<dyn Object>(module_path!(), "Object").with_display("dyn Object")
    }
}

impl Pointee for dyn Object {
    fn interface() -> Option<TypeRef> {
        Some(TypeRef::of::<dyn Object>())
    }

    fn target(&self) -> &dyn Inspect {
        self.as_inspect()
    }
}

/// Follows pointers from `value` to the first non-pointer value.
///
/// Returns the value, its view, and whether any pointer was crossed; `None`
/// when a nil pointer is reached.
pub fn deref(value: &dyn Inspect) -> Option<(&dyn Inspect, View<'_>, bool)> {
    let mut current = value;
    let mut through_pointer = false;
    loop {
        match current.view() {
            View::Pointer(Some(target)) => {
                current = target;
                through_pointer = true;
            }
            View::Pointer(None) => return None,
            view => return Some((current, view, through_pointer)),
        }
    }
}
