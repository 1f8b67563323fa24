//! [`Describe`] and [`Inspect`] for primitives and std / indexmap containers.

use std::cell::OnceCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::describe::{display_of, signature, Describe, TypeDesc, TypeRef};
use crate::inspect::{Entry, Inspect, Pointee, View};
use crate::kind::Kind;

macro_rules! primitive {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl Describe for $ty {
            fn describe() -> TypeDesc {
                TypeDesc::primitive::<$ty>($name)
            }
        }

        impl Inspect for $ty {
            fn type_ref(&self) -> TypeRef {
                TypeRef::of::<$ty>()
            }

            fn view(&self) -> View<'_> {
                View::Opaque
            }
        }
    )*};
}

primitive! {
    bool => "bool",
    char => "char",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
    String => "String",
    &'static str => "&str",
    () => "()",
}

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

macro_rules! sequence {
    ($($seq:ident),*) => {$(
        impl<T: Inspect + Describe> Describe for $seq<T> {
            fn describe() -> TypeDesc {
                let display = format!("{}<{}>", stringify!($seq), display_of::<T>());
                TypeDesc::element::<Self>(Kind::Slice, display, TypeRef::of::<T>())
            }
        }

        impl<T: Inspect + Describe> Inspect for $seq<T> {
            fn type_ref(&self) -> TypeRef {
                TypeRef::of::<Self>()
            }

            fn view(&self) -> View<'_> {
                View::Seq(self.iter().map(|item| item as &dyn Inspect).collect())
            }
        }
    )*};
}

sequence!(Vec, VecDeque);

impl<T: Inspect + Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDesc {
        let display = format!("[{}; {}]", display_of::<T>(), N);
        TypeDesc::element::<Self>(Kind::Array, display, TypeRef::of::<T>())
    }
}

impl<T: Inspect + Describe, const N: usize> Inspect for [T; N] {
    fn type_ref(&self) -> TypeRef {
        TypeRef::of::<Self>()
    }

    fn view(&self) -> View<'_> {
        View::Seq(self.iter().map(|item| item as &dyn Inspect).collect())
    }
}

// ---------------------------------------------------------------------------
// Maps
// ---------------------------------------------------------------------------

fn map_view<'a, K: Debug + 'a, V: Inspect + 'a>(
    entries: impl Iterator<Item = (&'a K, &'a V)>,
) -> View<'a> {
    View::Map(
        entries
            .map(|(key, value)| Entry::new(format!("{:?}", key), value as &dyn Inspect))
            .collect(),
    )
}

impl<K, V, S> Describe for HashMap<K, V, S>
where
    K: Describe + Debug,
    V: Inspect + Describe,
    S: BuildHasher + 'static,
{
    fn describe() -> TypeDesc {
        let display = format!("HashMap<{}, {}>", display_of::<K>(), display_of::<V>());
        TypeDesc::element::<Self>(Kind::Map, display, TypeRef::of::<V>())
    }
}

impl<K, V, S> Inspect for HashMap<K, V, S>
where
    K: Describe + Debug,
    V: Inspect + Describe,
    S: BuildHasher + 'static,
{
    fn type_ref(&self) -> TypeRef {
        TypeRef::of::<Self>()
    }

    fn view(&self) -> View<'_> {
        map_view(self.iter())
    }
}

impl<K, V, S> Describe for IndexMap<K, V, S>
where
    K: Describe + Debug,
    V: Inspect + Describe,
    S: BuildHasher + 'static,
{
    fn describe() -> TypeDesc {
        let display = format!("IndexMap<{}, {}>", display_of::<K>(), display_of::<V>());
        TypeDesc::element::<Self>(Kind::Map, display, TypeRef::of::<V>())
    }
}

impl<K, V, S> Inspect for IndexMap<K, V, S>
where
    K: Describe + Debug,
    V: Inspect + Describe,
    S: BuildHasher + 'static,
{
    fn type_ref(&self) -> TypeRef {
        TypeRef::of::<Self>()
    }

    fn view(&self) -> View<'_> {
        map_view(self.iter())
    }
}

impl<K: Describe + Debug, V: Inspect + Describe> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDesc {
        let display = format!("BTreeMap<{}, {}>", display_of::<K>(), display_of::<V>());
        TypeDesc::element::<Self>(Kind::Map, display, TypeRef::of::<V>())
    }
}

impl<K: Describe + Debug, V: Inspect + Describe> Inspect for BTreeMap<K, V> {
    fn type_ref(&self) -> TypeRef {
        TypeRef::of::<Self>()
    }

    fn view(&self) -> View<'_> {
        map_view(self.iter())
    }
}

// ---------------------------------------------------------------------------
// Pointers
// ---------------------------------------------------------------------------

// Owning and shared pointers. A pointer to a trait object is the interface
// value itself; a pointer to anything else is plain indirection.
macro_rules! pointer {
    ($($ptr:ident),*) => {$(
        impl<T: Pointee + Describe + ?Sized> Describe for $ptr<T> {
            fn describe() -> TypeDesc {
                let display = format!("{}<{}>", stringify!($ptr), display_of::<T>());
                TypeDesc::pointer::<Self>(display, TypeRef::of::<T>())
            }
        }

        impl<T: Pointee + Describe + ?Sized> Inspect for $ptr<T> {
            fn type_ref(&self) -> TypeRef {
                T::interface().unwrap_or_else(TypeRef::of::<Self>)
            }

            fn view(&self) -> View<'_> {
                let target = Pointee::target(&**self);
                match T::interface() {
                    Some(_) => View::Interface(Some(target)),
                    None => View::Pointer(Some(target)),
                }
            }
        }
    )*};
}

pointer!(Box, Rc, Arc);

// Optional and write-once slots: nil until set.
macro_rules! optional {
    ($($slot:ident => $get:ident),*) => {$(
        impl<T: Inspect + Describe> Describe for $slot<T> {
            fn describe() -> TypeDesc {
                let display = format!("{}<{}>", stringify!($slot), display_of::<T>());
                TypeDesc::pointer::<Self>(display, TypeRef::of::<T>())
            }
        }

        impl<T: Inspect + Describe> Inspect for $slot<T> {
            fn type_ref(&self) -> TypeRef {
                TypeRef::of::<Self>()
            }

            fn view(&self) -> View<'_> {
                View::Pointer(self.$get().map(|value| value as &dyn Inspect))
            }
        }
    )*};
}

optional!(Option => as_ref, OnceCell => get, OnceLock => get);

// ---------------------------------------------------------------------------
// Function pointers
// ---------------------------------------------------------------------------

macro_rules! function {
    ($($arg:ident),*) => {
        impl<R: Describe, $($arg: Describe),*> Describe for fn($($arg),*) -> R {
            fn describe() -> TypeDesc {
                let params: Vec<String> = vec![$(display_of::<$arg>().into_owned()),*];
                TypeDesc::of::<Self>(Kind::Function, signature(&params, &display_of::<R>()))
            }
        }

        impl<R: Describe, $($arg: Describe),*> Inspect for fn($($arg),*) -> R {
            fn type_ref(&self) -> TypeRef {
                TypeRef::of::<Self>()
            }

            fn view(&self) -> View<'_> {
                View::Opaque
            }
        }
    };
}

function!();
function!(A);
function!(A, B);
function!(A, B, C);
function!(A, B, C, D);
