//! Implementation of #[interface] attribute macro

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::visit::Visit;
use syn::visit_mut::VisitMut;
use syn::{
    parse_macro_input, parse_quote, FnArg, ItemTrait, Lifetime, ReturnType, TraitItem, TraitItemFn, Type,
    TypeReference, WherePredicate,
};

use crate::docs::doc_string;
use crate::tidy;

pub fn interface_impl(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemTrait);
    match expand(item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// A method that can be described as a member of the interface.
struct MethodSpec {
    name: String,
    doc: String,
    /// `fn(A, B) -> R` with every elided lifetime made `'static`.
    fn_type: Type,
    display: String,
}

fn expand(mut item: ItemTrait) -> syn::Result<TokenStream2> {
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[interface] does not support generic traits",
        ));
    }
    if let Some(assoc) = item.items.iter().find(|i| matches!(i, TraitItem::Type(_))) {
        return Err(syn::Error::new_spanned(
            assoc,
            "#[interface] does not support associated types",
        ));
    }

    let name = item.ident.clone();
    let name_str = name.to_string();
    let doc = doc_string(&item.attrs);
    let methods: Vec<MethodSpec> = item
        .items
        .iter()
        .filter_map(|i| match i {
            TraitItem::Fn(method) => method_spec(method),
            _ => None,
        })
        .collect();

    item.supertraits.push(parse_quote!(::objtree_core::AsInspect));

    let describers = methods.iter().enumerate().map(|(i, m)| {
        let describer = format_ident!("__objtree_method_{}", i);
        let fn_type = &m.fn_type;
        let display = &m.display;
        quote! {
            fn #describer() -> ::objtree_core::TypeDesc {
                ::objtree_core::TypeDesc::new(
                    ::core::any::TypeId::of::<#fn_type>(),
                    ::objtree_core::Kind::Function,
                    #display,
                )
            }
        }
    });

    let members = methods.iter().enumerate().map(|(i, m)| {
        let describer = format_ident!("__objtree_method_{}", i);
        let fn_type = &m.fn_type;
        let method_name = &m.name;
        let method_doc = &m.doc;
        quote! {
            .with_member(
                ::objtree_core::Member::method(
                    #method_name,
                    ::objtree_core::TypeRef::from_parts(
                        ::core::any::TypeId::of::<#fn_type>(),
                        #describer,
                    ),
                )
                .with_doc(#method_doc)
            )
        }
    });

    Ok(quote! {
        #item

        impl ::objtree_core::Describe for dyn #name {
            fn describe() -> ::objtree_core::TypeDesc {
                #(#describers)*

                ::objtree_core::TypeDesc::interface::<dyn #name>(::core::module_path!(), #name_str)
                    .with_doc(#doc)
                    #(#members)*
            }
        }

        impl ::objtree_core::Pointee for dyn #name {
            fn interface() -> ::std::option::Option<::objtree_core::TypeRef> {
                ::std::option::Option::Some(::objtree_core::TypeRef::of::<dyn #name>())
            }

            fn target(&self) -> &dyn ::objtree_core::Inspect {
                ::objtree_core::AsInspect::as_inspect(self)
            }
        }
    })
}

/// Describes `method`, or `None` when it cannot be named as a plain `fn`
/// pointer type.
fn method_spec(method: &TraitItemFn) -> Option<MethodSpec> {
    let sig = &method.sig;
    if !sig.generics.params.is_empty() || requires_sized(method) {
        return None;
    }

    let mut params = Vec::new();
    for arg in &sig.inputs {
        match arg {
            FnArg::Receiver(_) => {}
            FnArg::Typed(pat) => params.push((*pat.ty).clone()),
        }
    }
    let ret: Option<Type> = match &sig.output {
        ReturnType::Default => None,
        ReturnType::Type(_, ty) => Some((**ty).clone()),
    };

    if params.iter().chain(ret.iter()).any(unnameable) {
        return None;
    }

    let shown: Vec<String> = params.iter().map(tidy::display).collect();
    let display = match &ret {
        Some(ty) => format!("fn({}) -> {}", shown.join(", "), tidy::display(ty)),
        None => format!("fn({})", shown.join(", ")),
    };

    let mut fn_type: Type = match ret {
        Some(ret) => parse_quote!(fn(#(#params),*) -> #ret),
        None => parse_quote!(fn(#(#params),*)),
    };
    StaticLifetimes.visit_type_mut(&mut fn_type);

    Some(MethodSpec {
        name: sig.ident.unraw().to_string(),
        doc: doc_string(&method.attrs),
        fn_type,
        display,
    })
}

/// `where Self: Sized` methods are not callable on trait objects.
fn requires_sized(method: &TraitItemFn) -> bool {
    let Some(where_clause) = &method.sig.generics.where_clause else {
        return false;
    };
    where_clause.predicates.iter().any(|pred| match pred {
        WherePredicate::Type(pt) => matches!(&pt.bounded_ty, Type::Path(p) if p.path.is_ident("Self")),
        _ => false,
    })
}

/// Types that mention `Self` or `impl Trait` have no `'static` fn pointer form.
fn unnameable(ty: &Type) -> bool {
    let mut finder = Unnameable(false);
    finder.visit_type(ty);
    finder.0
}

struct Unnameable(bool);

impl<'ast> Visit<'ast> for Unnameable {
    fn visit_type(&mut self, ty: &'ast Type) {
        match ty {
            Type::ImplTrait(_) => self.0 = true,
            Type::Path(p) if p.qself.is_none() && p.path.segments.first().is_some_and(|s| s.ident == "Self") => {
                self.0 = true
            }
            _ => syn::visit::visit_type(self, ty),
        }
    }
}

/// Rewrites elided and `'_` lifetimes to `'static`.
struct StaticLifetimes;

impl VisitMut for StaticLifetimes {
    fn visit_type_reference_mut(&mut self, reference: &mut TypeReference) {
        if reference.lifetime.is_none() {
            reference.lifetime = Some(Lifetime::new("'static", proc_macro2::Span::call_site()));
        }
        syn::visit_mut::visit_type_reference_mut(self, reference);
    }

    fn visit_lifetime_mut(&mut self, lifetime: &mut Lifetime) {
        if lifetime.ident == "_" {
            *lifetime = Lifetime::new("'static", lifetime.span());
        }
    }
}
