//! Type-level half of the introspection layer.
//!
//! Every inspectable type implements [`Describe`], producing a [`TypeDesc`]:
//! its kind, origin module, display string and ordered members. Members name
//! their types through [`TypeRef`] handles rather than nested descriptors, so
//! describing a self-referential type never recurses.
//!
//! Implementations are normally generated by `#[derive(Inspect)]` and
//! `#[interface]`; the core ships them for std containers and primitives.

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::kind::Kind;

/// Static description of a type.
pub trait Describe: 'static {
    fn describe() -> TypeDesc;
}

/// Cheap, copyable handle naming a type without describing it.
#[derive(Clone, Copy)]
pub struct TypeRef {
    key: TypeId,
    describe: fn() -> TypeDesc,
}

impl TypeRef {
    pub fn of<T: Describe + ?Sized>() -> Self {
        TypeRef {
            key: TypeId::of::<T>(),
            describe: T::describe,
        }
    }

    /// Builds a handle from an explicit key and descriptor function. Used for
    /// types without a [`Describe`] impl, such as trait method signatures.
    pub fn from_parts(key: TypeId, describe: fn() -> TypeDesc) -> Self {
        TypeRef { key, describe }
    }

    /// Identity of the named type (not of its canonical form).
    pub fn key(&self) -> TypeId {
        self.key
    }

    pub fn describe(&self) -> TypeDesc {
        (self.describe)()
    }

    /// Describes the type with all leading pointer indirection stripped.
    pub fn canonical(&self) -> TypeDesc {
        let mut desc = self.describe();
        while desc.kind == Kind::Pointer {
            match desc.members.first() {
                Some(pointee) => desc = pointee.ty.describe(),
                None => break,
            }
        }
        desc
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRef").field("key", &self.key).finish()
    }
}

/// Description of a single type.
#[derive(Debug, Clone)]
pub struct TypeDesc {
    /// Identity of the described type.
    pub key: TypeId,
    pub kind: Kind,
    /// Module path of the declaring module, empty for built-in types.
    pub package: Cow<'static, str>,
    /// Declared name, empty for anonymous types (`Vec<T>`, `[T; N]`, ...).
    pub name: Cow<'static, str>,
    /// Canonical textual rendering used for labels.
    pub display: Cow<'static, str>,
    /// Type-level doc comment, if captured.
    pub doc: Cow<'static, str>,
    /// Fields, methods, or the single `""` element of collections and pointers.
    pub members: Vec<Member>,
}

impl TypeDesc {
    pub fn new(key: TypeId, kind: Kind, display: impl Into<Cow<'static, str>>) -> Self {
        TypeDesc {
            key,
            kind,
            package: Cow::Borrowed(""),
            name: Cow::Borrowed(""),
            display: display.into(),
            doc: Cow::Borrowed(""),
            members: Vec::new(),
        }
    }

    pub fn of<T: ?Sized + 'static>(kind: Kind, display: impl Into<Cow<'static, str>>) -> Self {
        Self::new(TypeId::of::<T>(), kind, display)
    }

    /// Built-in leaf type whose name is its display string.
    pub fn primitive<T: ?Sized + 'static>(name: &'static str) -> Self {
        TypeDesc {
            name: Cow::Borrowed(name),
            ..Self::of::<T>(Kind::Primitive, name)
        }
    }

    /// Nominal type declared in `package`, displayed as `module::Name`.
    pub fn named<T: ?Sized + 'static>(kind: Kind, package: &'static str, name: &'static str) -> Self {
        TypeDesc {
            package: Cow::Borrowed(package),
            name: Cow::Borrowed(name),
            ..Self::of::<T>(kind, short_path(package, name))
        }
    }

    /// Trait-object interface declared in `package`, displayed as `dyn module::Name`.
    pub fn interface<T: ?Sized + 'static>(package: &'static str, name: &'static str) -> Self {
        let desc = Self::named::<T>(Kind::Interface, package, name);
        let display = format!("dyn {}", desc.display);
        desc.with_display(display)
    }

    /// Anonymous container with a single element type keyed by `""`.
    pub fn element<T: ?Sized + 'static>(
        kind: Kind,
        display: impl Into<Cow<'static, str>>,
        element: TypeRef,
    ) -> Self {
        Self::of::<T>(kind, display).with_member(Member::element(element))
    }

    pub fn pointer<T: ?Sized + 'static>(display: impl Into<Cow<'static, str>>, pointee: TypeRef) -> Self {
        Self::element::<T>(Kind::Pointer, display, pointee)
    }

    pub fn with_display(mut self, display: impl Into<Cow<'static, str>>) -> Self {
        self.display = display.into();
        self
    }

    pub fn with_doc(mut self, doc: &'static str) -> Self {
        self.doc = Cow::Borrowed(doc);
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Appends generic arguments to the display string: `Pair` -> `Pair<i32>`.
    pub fn with_generic_args(mut self, args: &[String]) -> Self {
        if !args.is_empty() {
            self.display = Cow::Owned(format!("{}<{}>", self.display, args.join(", ")));
        }
        self
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// `package::Name` for nominal types, the display string otherwise.
    pub fn full_name(&self) -> String {
        full_name(&self.package, &self.name, &self.display)
    }
}

/// A field, method, or element slot of a type.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: Cow<'static, str>,
    pub ty: TypeRef,
    pub exported: bool,
    pub anonymous: bool,
    pub doc: Cow<'static, str>,
}

impl Member {
    pub fn field(name: &'static str, ty: TypeRef, exported: bool, anonymous: bool) -> Self {
        Member {
            name: Cow::Borrowed(name),
            ty,
            exported,
            anonymous,
            doc: Cow::Borrowed(""),
        }
    }

    pub fn method(name: &'static str, ty: TypeRef) -> Self {
        Self::field(name, ty, true, false)
    }

    pub fn element(ty: TypeRef) -> Self {
        Self::field("", ty, true, false)
    }

    pub fn with_doc(mut self, doc: &'static str) -> Self {
        self.doc = Cow::Borrowed(doc);
        self
    }
}

/// Display string of `T`.
pub fn display_of<T: Describe + ?Sized>() -> Cow<'static, str> {
    T::describe().display
}

pub(crate) fn full_name(package: &str, name: &str, display: &str) -> String {
    if !package.is_empty() && !name.is_empty() {
        format!("{}::{}", package, name)
    } else {
        display.to_string()
    }
}

/// `a::b::c` + `Name` -> `c::Name`.
fn short_path(package: &str, name: &str) -> String {
    match package.rsplit("::").next() {
        Some(last) if !last.is_empty() => format!("{}::{}", last, name),
        _ => name.to_string(),
    }
}

/// Renders a function signature: `fn(A, B) -> R`, omitting a unit return.
pub(crate) fn signature(params: &[String], ret: &str) -> String {
    if ret == "()" {
        format!("fn({})", params.join(", "))
    } else {
        format!("fn({}) -> {}", params.join(", "), ret)
    }
}
