//! Implementation of #[derive(Inspect)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields, GenericParam, Generics, Visibility};

use crate::docs::doc_string;

pub fn derive_inspect_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct FieldSpec {
    /// Member key: field name, or position for tuple fields.
    key: String,
    access: TokenStream2,
    ty: syn::Type,
    exported: bool,
    anonymous: bool,
    doc: String,
}

fn expand(mut input: DeriveInput) -> syn::Result<TokenStream2> {
    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "Inspect cannot be derived for types with lifetime parameters",
        ));
    }

    let opaque = parse_container_attrs(&input.attrs)?;
    let name = input.ident.clone();
    let name_str = name.unraw().to_string();
    let doc = doc_string(&input.attrs);

    add_bounds(&mut input.generics);
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let generic_args = generic_args(&input.generics);

    let (kind, fields) = match &input.data {
        _ if opaque => (quote!(Other), None),
        Data::Struct(data) => (quote!(Struct), Some(collect_fields(&data.fields)?)),
        Data::Enum(data) => {
            if let Some(variant) = data.variants.iter().find(|v| !matches!(v.fields, Fields::Unit)) {
                return Err(syn::Error::new_spanned(
                    variant,
                    "Inspect can only be derived for field-less enums; add #[inspect(opaque)]",
                ));
            }
            (quote!(Other), None)
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(&input, "Inspect cannot be derived for unions"));
        }
    };

    let members = fields.iter().flatten().map(|f| {
        let key = &f.key;
        let ty = &f.ty;
        let exported = f.exported;
        let anonymous = f.anonymous;
        let doc = &f.doc;
        quote! {
            .with_member(
                ::objtree_core::Member::field(
                    #key,
                    ::objtree_core::TypeRef::of::<#ty>(),
                    #exported,
                    #anonymous,
                )
                .with_doc(#doc)
            )
        }
    });

    let view = match &fields {
        Some(fields) => {
            let entries = fields.iter().map(|f| {
                let key = &f.key;
                let access = &f.access;
                let exported = f.exported;
                let anonymous = f.anonymous;
                quote! {
                    ::objtree_core::Field::new(#key, &self.#access, #exported, #anonymous)
                }
            });
            quote!(::objtree_core::View::Struct(::std::vec![#(#entries),*]))
        }
        None => quote!(::objtree_core::View::Opaque),
    };

    Ok(quote! {
        impl #impl_generics ::objtree_core::Describe for #name #ty_generics #where_clause {
            fn describe() -> ::objtree_core::TypeDesc {
                ::objtree_core::TypeDesc::named::<Self>(
                    ::objtree_core::Kind::#kind,
                    ::core::module_path!(),
                    #name_str,
                )
                .with_generic_args(&[#(#generic_args),*])
                .with_doc(#doc)
                #(#members)*
            }
        }

        impl #impl_generics ::objtree_core::Inspect for #name #ty_generics #where_clause {
            fn type_ref(&self) -> ::objtree_core::TypeRef {
                ::objtree_core::TypeRef::of::<Self>()
            }

            fn view(&self) -> ::objtree_core::View<'_> {
                #view
            }
        }
    })
}

fn parse_container_attrs(attrs: &[syn::Attribute]) -> syn::Result<bool> {
    let mut opaque = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("inspect")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("opaque") {
                opaque = true;
                Ok(())
            } else {
                Err(meta.error("unknown inspect attribute, expected `opaque`"))
            }
        })?;
    }
    Ok(opaque)
}

fn is_skipped(attrs: &[syn::Attribute]) -> syn::Result<bool> {
    let mut skip = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("inspect")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unknown inspect attribute, expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}

fn collect_fields(fields: &Fields) -> syn::Result<Vec<FieldSpec>> {
    let mut specs = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        if is_skipped(&field.attrs)? {
            continue;
        }
        let (key, access, anonymous) = match &field.ident {
            Some(ident) => (ident.unraw().to_string(), quote!(#ident), false),
            None => {
                let index = syn::Index::from(index);
                (index.index.to_string(), quote!(#index), true)
            }
        };
        specs.push(FieldSpec {
            key,
            access,
            ty: field.ty.clone(),
            exported: matches!(field.vis, Visibility::Public(_)),
            anonymous,
            doc: doc_string(&field.attrs),
        });
    }
    Ok(specs)
}

/// Every type parameter must itself be inspectable.
fn add_bounds(generics: &mut Generics) {
    for param in generics.params.iter_mut() {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::objtree_core::Inspect));
            ty.bounds.push(parse_quote!(::objtree_core::Describe));
        }
    }
}

/// Display of each generic argument, for `Name<A, B>` labels.
fn generic_args(generics: &Generics) -> Vec<TokenStream2> {
    generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(ty) => {
                let ident = &ty.ident;
                Some(quote!(::objtree_core::display_of::<#ident>().into_owned()))
            }
            GenericParam::Const(c) => {
                let ident = &c.ident;
                Some(quote!(::std::string::ToString::to_string(&#ident)))
            }
            GenericParam::Lifetime(_) => None,
        })
        .collect()
}
