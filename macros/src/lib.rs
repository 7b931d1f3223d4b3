//! Derive macros for the Autohire state layer
//!
//! This crate provides procedural macros to reduce boilerplate when declaring
//! the action catalog of a store slice.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Implements `autohire_core::action::Action` and
//!   generates intent/outcome helpers for action enums
//!
//! # Example
//!
//! ```ignore
//! use autohire_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(scope = "Session")]
//! enum SessionAction {
//!     #[intent]
//!     Login { email: String, password: String },
//!
//!     #[outcome]
//!     LoginFailed { message: String },
//! }
//!
//! // Generated methods:
//! assert!(SessionAction::Login { email: "a".into(), password: "b".into() }.is_intent());
//! assert_eq!(SessionAction::LoginFailed { message: "x".into() }.kind(), "[Session] LoginFailed");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr, Variant};

/// Derive macro for Action enums
///
/// Generates:
/// - `impl autohire_core::action::Action` with `kind()` returning
///   `"[Scope] Variant"` (or just `"Variant"` without a scope)
/// - `is_intent()` - Returns true if this variant describes user intent
/// - `is_outcome()` - Returns true if this variant describes a completed I/O outcome
///
/// Both are `const` inherent methods and also back the matching `Action`
/// trait methods, which the store uses to classify dispatched actions.
///
/// # Attributes
///
/// - `#[action(scope = "...")]` on the enum - Prefix for `kind()`
/// - `#[intent]` - Mark a variant as an intent
/// - `#[outcome]` - Mark a variant as an outcome
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - A variant has both `#[intent]` and `#[outcome]` attributes
/// - The `#[action(...)]` attribute is malformed
#[proc_macro_derive(Action, attributes(action, intent, outcome))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(
            input,
            "#[derive(Action)] can only be used on enums"
        )
        .to_compile_error()
        .into();
    };

    let scope = match parse_scope(&input.attrs) {
        Ok(scope) => scope,
        Err(error) => return error.to_compile_error().into(),
    };

    let mut intent_arms = Vec::new();
    let mut outcome_arms = Vec::new();
    let mut kind_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_intent = has_attribute(&variant.attrs, "intent");
        let is_outcome = has_attribute(&variant.attrs, "outcome");

        if is_intent && is_outcome {
            return syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[intent] and #[outcome]"
            )
            .to_compile_error()
            .into();
        }

        let pattern = variant_pattern(variant);

        if is_intent {
            intent_arms.push(quote! { #pattern => true, });
        }

        if is_outcome {
            outcome_arms.push(quote! { #pattern => true, });
        }

        let kind = match &scope {
            Some(scope) => format!("[{scope}] {}", variant.ident),
            None => variant.ident.to_string(),
        };
        kind_arms.push(quote! { #pattern => #kind, });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Returns true if this action describes user intent
            #[must_use]
            #[allow(unreachable_patterns, clippy::match_like_matches_macro, clippy::match_single_binding)]
            pub const fn is_intent(&self) -> bool {
                match self {
                    #(#intent_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action describes a completed I/O outcome
            #[must_use]
            #[allow(unreachable_patterns, clippy::match_like_matches_macro, clippy::match_single_binding)]
            pub const fn is_outcome(&self) -> bool {
                match self {
                    #(#outcome_arms)*
                    _ => false,
                }
            }
        }

        impl #impl_generics ::autohire_core::action::Action for #name #ty_generics #where_clause {
            fn is_intent(&self) -> bool {
                Self::is_intent(self)
            }

            fn is_outcome(&self) -> bool {
                Self::is_outcome(self)
            }

            fn kind(&self) -> &'static str {
                match self {
                    #(#kind_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Build a match pattern ignoring the fields of a variant
fn variant_pattern(variant: &Variant) -> proc_macro2::TokenStream {
    let ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

/// Read `scope = "..."` from an `#[action(...)]` attribute, if present
fn parse_scope(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut scope = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("scope") {
                let value: LitStr = meta.value()?.parse()?;
                scope = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported action attribute, expected `scope = \"...\"`"))
            }
        })?;
    }

    Ok(scope)
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident(name)
    })
}
