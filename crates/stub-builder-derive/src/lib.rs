//! stub-builder derive: typed façades over stubbed instances
//!
//! `#[stubbed]` on a trait keeps the trait as written and generates a
//! `Stubbed<Trait><S>` struct implementing it on top of a
//! `stub_builder::StubbedInstance<S>`. Every trait method reads its member
//! through the instance's interception layer, so stubs are materialized on
//! first call, overrides win, and exclusions apply.
//!
//! # Example
//!
//! ```ignore
//! use stub_builder::prelude::*;
//!
//! #[stubbed]
//! trait MyInterface {
//!     fn func(&self, input: i32, text: &str) -> i32;
//!     async fn asyn_func(&self, value: i32) -> i32;
//!
//!     #[stub(getter)]
//!     fn property(&self) -> i32;
//!
//!     #[stub(setter = "property")]
//!     fn set_property(&self, value: i32);
//! }
//!
//! let creator = StubbedInstanceCreator::new(Stub::creator());
//! let mock: StubbedMyInterface<Stub> = creator
//!     .create_stubbed_instance_with(Overrides::new().value("property", 5))
//!     .into();
//!
//! assert_eq!(mock.property(), 5);
//! mock.func(5, "whatever");
//! mock.stub("func").unwrap().assert_called_with(args![5, "whatever"])?;
//! ```
//!
//! # Member attributes
//!
//! - `#[stub(name = "asynFunc")]` - member key (defaults to the method name)
//! - `#[stub(getter)]` / `#[stub(getter = "prop")]` - read a plain value
//! - `#[stub(setter)]` / `#[stub(setter = "prop")]` - write a plain value
//!   (`set_` is stripped from the method name by default)

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::visit::Visit;
use syn::{
    parse_macro_input, parse_quote, Attribute, FnArg, Ident, ItemTrait, LitStr, ReturnType,
    Token, TraitItem, TraitItemFn, Type,
};

/// Generate a typed stubbed façade for a trait.
///
/// Takes an optional struct name: `#[stubbed(MockRepository)]`. Defaults to
/// `Stubbed` followed by the trait name.
///
/// Method arguments must implement `serde::Serialize`; return types must
/// implement `serde::de::DeserializeOwned + Default` (getters additionally
/// `Clone + 'static`). Setter arguments are stored as plain values and must
/// be owned `'static` types: take `String`, not `&str`.
#[proc_macro_attribute]
pub fn stubbed(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item_trait = parse_macro_input!(item as ItemTrait);
    let struct_name = if attr.is_empty() {
        None
    } else {
        Some(parse_macro_input!(attr as Ident))
    };

    expand(item_trait, struct_name)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

// ============================================================================
// Expansion
// ============================================================================

/// What a trait method stands for on the instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Callable member backed by a stub
    Method,
    /// Plain value read
    Getter,
    /// Plain value write
    Setter,
}

/// Parsed `#[stub(...)]` attributes of one method
#[derive(Debug)]
struct MemberSpec {
    role: Role,
    name: Option<String>,
}

fn expand(mut item_trait: ItemTrait, struct_name: Option<Ident>) -> syn::Result<TokenStream2> {
    if !item_trait.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item_trait.generics,
            "#[stubbed] does not support generic traits",
        ));
    }

    let trait_ident = item_trait.ident.clone();
    let struct_name = struct_name.unwrap_or_else(|| format_ident!("Stubbed{}", trait_ident));
    let vis = item_trait.vis.clone();

    let mut methods = Vec::new();
    for item in &mut item_trait.items {
        match item {
            TraitItem::Fn(method) => {
                let spec = take_stub_attrs(&mut method.attrs)?;
                methods.push(expand_method(method, &spec)?);
            }
            TraitItem::Const(constant) if constant.default.is_some() => {}
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "#[stubbed] traits may only contain methods and defaulted constants",
                ));
            }
        }
    }

    let doc = format!("Stubbed implementation of [`{trait_ident}`]");

    Ok(quote! {
        #item_trait

        #[doc = #doc]
        #vis struct #struct_name<S> {
            instance: ::stub_builder::StubbedInstance<S>,
        }

        #[allow(dead_code)]
        impl<S> #struct_name<S> {
            /// Wrap a stubbed instance
            #vis fn new(instance: ::stub_builder::StubbedInstance<S>) -> Self {
                Self { instance }
            }

            /// The underlying stubbed instance
            #vis fn instance(&self) -> &::stub_builder::StubbedInstance<S> {
                &self.instance
            }

            /// Unwrap the underlying stubbed instance
            #vis fn into_instance(self) -> ::stub_builder::StubbedInstance<S> {
                self.instance
            }
        }

        #[automatically_derived]
        impl<S> ::core::convert::From<::stub_builder::StubbedInstance<S>> for #struct_name<S> {
            fn from(instance: ::stub_builder::StubbedInstance<S>) -> Self {
                Self { instance }
            }
        }

        #[automatically_derived]
        impl<S> ::core::ops::Deref for #struct_name<S> {
            type Target = ::stub_builder::StubbedInstance<S>;

            fn deref(&self) -> &Self::Target {
                &self.instance
            }
        }

        #[automatically_derived]
        impl<S> ::core::fmt::Debug for #struct_name<S> {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_struct(::core::stringify!(#struct_name))
                    .field("instance", &self.instance)
                    .finish()
            }
        }

        #[automatically_derived]
        impl<S> #trait_ident for #struct_name<S>
        where
            S: ::stub_builder::Invoke + ::core::clone::Clone + 'static,
        {
            #(#methods)*
        }
    })
}

fn expand_method(method: &TraitItemFn, spec: &MemberSpec) -> syn::Result<TokenStream2> {
    let mut sig = method.sig.clone();

    if !matches!(sig.inputs.first(), Some(FnArg::Receiver(_))) {
        return Err(syn::Error::new_spanned(
            &sig,
            "#[stubbed] methods need a `self` receiver",
        ));
    }

    // Arguments get fixed names so any pattern can be forwarded
    let mut args = Vec::new();
    for (index, input) in sig.inputs.iter_mut().skip(1).enumerate() {
        if let FnArg::Typed(pat_type) = input {
            let ident = format_ident!("__stub_arg{}", index);
            *pat_type.pat = parse_quote!(#ident);
            args.push(ident);
        }
    }

    let name = member_name(spec, &sig.ident);
    let body = match spec.role {
        Role::Method => {
            let dispatch = if sig.asyncness.is_some() {
                quote!(dispatch_async)
            } else {
                quote!(dispatch)
            };
            quote! {
                let __stub_args = ::std::vec![#(::stub_builder::__private::to_arg(&#args)),*];
                ::stub_builder::__private::#dispatch(&self.instance, #name, __stub_args)
            }
        }
        Role::Getter => {
            if !args.is_empty() {
                return Err(syn::Error::new_spanned(
                    &sig.inputs,
                    "#[stub(getter)] methods take no arguments besides `self`",
                ));
            }
            if matches!(sig.output, ReturnType::Default) {
                return Err(syn::Error::new_spanned(
                    &sig,
                    "#[stub(getter)] methods must return a value",
                ));
            }
            quote! {
                ::stub_builder::__private::read(&self.instance, #name)
            }
        }
        Role::Setter => {
            if args.len() != 1 {
                return Err(syn::Error::new_spanned(
                    &sig.inputs,
                    "#[stub(setter)] methods take exactly one argument besides `self`",
                ));
            }
            if !matches!(sig.output, ReturnType::Default) {
                return Err(syn::Error::new_spanned(
                    &sig.output,
                    "#[stub(setter)] methods must not return a value",
                ));
            }
            if let Some(FnArg::Typed(pat_type)) = sig.inputs.iter().nth(1) {
                if borrows(&pat_type.ty) {
                    return Err(syn::Error::new_spanned(
                        &pat_type.ty,
                        "#[stub(setter)] arguments are stored and must be owned 'static types \
                         (e.g. `String` instead of `&str`)",
                    ));
                }
            }
            let value = &args[0];
            quote! {
                ::stub_builder::__private::write(&self.instance, #name, #value)
            }
        }
    };

    let cfgs = method.attrs.iter().filter(|attr| attr.path().is_ident("cfg"));

    Ok(quote! {
        #(#cfgs)*
        #sig {
            #body
        }
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse and remove `#[stub(...)]` attributes
fn take_stub_attrs(attrs: &mut Vec<Attribute>) -> syn::Result<MemberSpec> {
    let mut spec = MemberSpec {
        role: Role::Method,
        name: None,
    };
    let mut kept = Vec::with_capacity(attrs.len());

    for attr in attrs.drain(..) {
        if !attr.path().is_ident("stub") {
            kept.push(attr);
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let role = if meta.path.is_ident("getter") {
                Some(Role::Getter)
            } else if meta.path.is_ident("setter") {
                Some(Role::Setter)
            } else if meta.path.is_ident("name") {
                None
            } else {
                return Err(meta.error("expected `name`, `getter` or `setter`"));
            };

            if let Some(role) = role {
                if spec.role != Role::Method {
                    return Err(meta.error("a member is either a getter or a setter"));
                }
                spec.role = role;
            }

            if meta.input.peek(Token![=]) {
                let lit: LitStr = meta.value()?.parse()?;
                spec.name = Some(lit.value());
            } else if role.is_none() {
                return Err(meta.error("`name` needs a value: name = \"...\""));
            }
            Ok(())
        })?;
    }

    *attrs = kept;
    Ok(spec)
}

/// Whether a type is a reference or carries a non-'static lifetime
fn borrows(ty: &Type) -> bool {
    struct Borrows(bool);

    impl<'ast> Visit<'ast> for Borrows {
        fn visit_type_reference(&mut self, reference: &'ast syn::TypeReference) {
            match &reference.lifetime {
                Some(lifetime) if lifetime.ident == "static" => {
                    syn::visit::visit_type_reference(self, reference);
                }
                _ => self.0 = true,
            }
        }

        fn visit_lifetime(&mut self, lifetime: &'ast syn::Lifetime) {
            if lifetime.ident != "static" {
                self.0 = true;
            }
        }
    }

    let mut visitor = Borrows(false);
    visitor.visit_type(ty);
    visitor.0
}

/// Member key for a method
fn member_name(spec: &MemberSpec, ident: &Ident) -> String {
    if let Some(name) = &spec.name {
        return name.clone();
    }

    let raw = ident.to_string();
    let ident = raw.strip_prefix("r#").unwrap_or(&raw);
    match spec.role {
        Role::Setter => ident.strip_prefix("set_").unwrap_or(ident).to_string(),
        Role::Method | Role::Getter => ident.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_of(mut method: TraitItemFn) -> (MemberSpec, TraitItemFn) {
        let spec = take_stub_attrs(&mut method.attrs).unwrap();
        (spec, method)
    }

    mod attribute_tests {
        use super::*;

        #[test]
        fn test_plain_method() {
            let (spec, method) = spec_of(parse_quote! {
                fn func(&self, input: i32, text: &str) -> i32;
            });
            assert_eq!(spec.role, Role::Method);
            assert_eq!(member_name(&spec, &method.sig.ident), "func");
        }

        #[test]
        fn test_renamed_method() {
            let (spec, method) = spec_of(parse_quote! {
                #[stub(name = "asynFunc")]
                async fn asyn_func(&self, value: i32) -> i32;
            });
            assert_eq!(member_name(&spec, &method.sig.ident), "asynFunc");
            assert!(method.attrs.is_empty());
        }

        #[test]
        fn test_getter() {
            let (spec, method) = spec_of(parse_quote! {
                #[stub(getter)]
                fn property(&self) -> i32;
            });
            assert_eq!(spec.role, Role::Getter);
            assert_eq!(member_name(&spec, &method.sig.ident), "property");
        }

        #[test]
        fn test_setter_strips_prefix() {
            let (spec, method) = spec_of(parse_quote! {
                #[stub(setter)]
                fn set_property(&self, value: i32);
            });
            assert_eq!(spec.role, Role::Setter);
            assert_eq!(member_name(&spec, &method.sig.ident), "property");
        }

        #[test]
        fn test_named_setter() {
            let (spec, method) = spec_of(parse_quote! {
                #[stub(setter = "setter")]
                fn assign(&self, value: i32);
            });
            assert_eq!(member_name(&spec, &method.sig.ident), "setter");
        }

        #[test]
        fn test_other_attributes_are_kept() {
            let (_, method) = spec_of(parse_quote! {
                /// Docs
                #[stub(getter)]
                #[allow(clippy::all)]
                fn property(&self) -> i32;
            });
            assert_eq!(method.attrs.len(), 2);
        }

        #[test]
        fn test_conflicting_roles() {
            let mut method: TraitItemFn = parse_quote! {
                #[stub(getter, setter)]
                fn property(&self) -> i32;
            };
            assert!(take_stub_attrs(&mut method.attrs).is_err());
        }

        #[test]
        fn test_unknown_key() {
            let mut method: TraitItemFn = parse_quote! {
                #[stub(skip)]
                fn property(&self) -> i32;
            };
            assert!(take_stub_attrs(&mut method.attrs).is_err());
        }

        #[test]
        fn test_name_without_value() {
            let mut method: TraitItemFn = parse_quote! {
                #[stub(name)]
                fn property(&self) -> i32;
            };
            assert!(take_stub_attrs(&mut method.attrs).is_err());
        }
    }

    mod expansion_tests {
        use super::*;

        #[test]
        fn test_default_struct_name() {
            let tokens = expand(
                parse_quote! {
                    pub trait MyInterface {
                        fn func(&self, input: i32, text: &str) -> i32;
                    }
                },
                None,
            )
            .unwrap()
            .to_string();
            assert!(tokens.contains("pub struct StubbedMyInterface"));
            assert!(tokens.contains("dispatch"));
            assert!(tokens.contains("\"func\""));
        }

        #[test]
        fn test_custom_struct_name() {
            let tokens = expand(
                parse_quote! {
                    trait Repository {
                        #[stub(getter)]
                        fn size(&self) -> usize;
                    }
                },
                Some(format_ident!("MockRepository")),
            )
            .unwrap()
            .to_string();
            assert!(tokens.contains("struct MockRepository"));
            assert!(tokens.contains("read"));
            // Helper attribute is stripped from the emitted trait
            assert!(!tokens.contains("# [stub"));
        }

        #[test]
        fn test_async_method_dispatch() {
            let tokens = expand(
                parse_quote! {
                    trait Service {
                        #[stub(name = "asynFunc")]
                        async fn asyn_func(&self, value: i32) -> i32;
                    }
                },
                None,
            )
            .unwrap()
            .to_string();
            assert!(tokens.contains("dispatch_async"));
            assert!(tokens.contains("\"asynFunc\""));
        }

        #[test]
        fn test_generic_trait_rejected() {
            let result = expand(
                parse_quote! {
                    trait Store<T> {
                        fn put(&self, value: T);
                    }
                },
                None,
            );
            assert!(result.is_err());
        }

        #[test]
        fn test_missing_receiver_rejected() {
            let result = expand(
                parse_quote! {
                    trait Factory {
                        fn build() -> i32;
                    }
                },
                None,
            );
            assert!(result.is_err());
        }

        #[test]
        fn test_setter_arity_rejected() {
            let result = expand(
                parse_quote! {
                    trait Shape {
                        #[stub(setter)]
                        fn set_both(&self, a: i32, b: i32);
                    }
                },
                None,
            );
            assert!(result.is_err());
        }

        #[test]
        fn test_borrowed_setter_argument_rejected() {
            let result = expand(
                parse_quote! {
                    trait Person {
                        #[stub(setter)]
                        fn set_name(&self, name: &str);
                    }
                },
                None,
            );
            let err = result.unwrap_err().to_string();
            assert!(err.contains("owned 'static"));
        }

        #[test]
        fn test_owned_setter_argument_accepted() {
            let result = expand(
                parse_quote! {
                    trait Person {
                        #[stub(setter)]
                        fn set_name(&self, name: String);
                        #[stub(setter = "tag")]
                        fn set_tag(&self, tag: Option<&'static str>);
                    }
                },
                None,
            );
            assert!(result.is_ok());
        }

        #[test]
        fn test_borrows() {
            assert!(borrows(&parse_quote!(&str)));
            assert!(borrows(&parse_quote!(Vec<&'a str>)));
            assert!(borrows(&parse_quote!(std::borrow::Cow<'a, str>)));
            assert!(!borrows(&parse_quote!(String)));
            assert!(!borrows(&parse_quote!(Option<i32>)));
            assert!(!borrows(&parse_quote!(&'static str)));
        }

        #[test]
        fn test_associated_type_rejected() {
            let result = expand(
                parse_quote! {
                    trait Source {
                        type Item;
                        fn next(&self) -> i32;
                    }
                },
                None,
            );
            assert!(result.is_err());
        }
    }
}
