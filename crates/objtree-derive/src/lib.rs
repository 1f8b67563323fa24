//! Procedural macros for objtree
//!
//! This crate provides two macros:
//! - `#[derive(Inspect)]` - Generate `Describe` + `Inspect` for structs and field-less enums
//! - `#[interface]` - Make a trait usable as an interface value (`Box<dyn Trait>` and friends)
//!
//! Generated code refers to `::objtree_core`, so these macros are meant to be
//! used through its re-exports.

use proc_macro::TokenStream;

mod docs;
mod inspect;
mod interface;
mod tidy;

/// Derive macro for inspectable types.
///
/// Structs expose their fields in declaration order: `pub` fields are
/// exported, tuple-struct fields are anonymous and keyed `"0"`, `"1"`, ...
/// Field-less enums are opaque leaves. `///` comments on the type and its
/// fields become their documentation.
///
/// # Attributes
///
/// - `#[inspect(opaque)]` on the type - Never expose children (any struct or enum)
/// - `#[inspect(skip)]` on a field - Leave the field out entirely
///
/// # Example
///
/// ```ignore
/// /// A ledger account.
/// #[derive(Inspect)]
/// pub struct Account {
///     /// Holder's name.
///     pub owner: String,
///     balance: i64,
/// }
/// ```
#[proc_macro_derive(Inspect, attributes(inspect))]
pub fn derive_inspect(input: TokenStream) -> TokenStream {
    inspect::derive_inspect_impl(input)
}

/// Turns a trait into an interface type.
///
/// Adds `AsInspect` as a supertrait and implements `Describe` and `Pointee`
/// for `dyn Trait`, so `Box<dyn Trait>`, `Rc<dyn Trait>` and `Arc<dyn Trait>`
/// are inspected as interface values holding a concrete value. Methods become
/// function-typed members; generic methods, methods mentioning `Self` and
/// methods bounded by `Self: Sized` are left out.
///
/// # Example
///
/// ```ignore
/// #[interface]
/// pub trait Event {
///     /// Amount moved, in cents.
///     fn amount(&self) -> i64;
/// }
/// ```
#[proc_macro_attribute]
pub fn interface(_attr: TokenStream, input: TokenStream) -> TokenStream {
    interface::interface_impl(input)
}
