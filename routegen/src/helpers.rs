//! Shared helper catalog.
//!
//! Emitted route code calls a handful of small helpers by name. Instead of
//! tracking which emitter used which helper, the registry scans the finished
//! text for helper names and emits exactly the helpers it finds, once each,
//! in order of first appearance.

use proc_macro2::TokenStream;
use quote::quote;
use tracing::trace;

use crate::constants::{HELPER_BOOL_CONVERTER, HELPER_CONVERT_MAP_VALUE, HELPER_ENUM_CODEC};
use crate::emit::{BlockKind, TextBlock, render_items};
use crate::errors::{RouteGenError, SourceRef};

/// One catalog entry: a name and a renderer parameterized by the runtime path.
#[derive(Debug, Clone, Copy)]
pub struct HelperTemplate {
    /// Identifier the helper declares.
    pub name: &'static str,
    render: fn(&syn::Path) -> TokenStream,
}

impl HelperTemplate {
    /// The helper's tokens for a given runtime crate path.
    pub fn tokens(&self, runtime: &syn::Path) -> TokenStream {
        (self.render)(runtime)
    }
}

static CATALOG: &[HelperTemplate] = &[
    HelperTemplate {
        name: HELPER_CONVERT_MAP_VALUE,
        render: convert_map_value,
    },
    HelperTemplate {
        name: HELPER_BOOL_CONVERTER,
        render: bool_converter,
    },
    HelperTemplate {
        name: HELPER_ENUM_CODEC,
        render: enum_codec,
    },
];

fn convert_map_value(rt: &syn::Path) -> TokenStream {
    quote! {
        fn __route_convert_map_value<T>(
            key: &str,
            map: &::std::collections::HashMap<::std::string::String, ::std::string::String>,
            converter: impl ::core::ops::Fn(&str) -> ::core::option::Option<T>,
        ) -> ::core::result::Result<::core::option::Option<T>, #rt::DecodeError> {
            match map.get(key) {
                ::core::option::Option::None => ::core::result::Result::Ok(::core::option::Option::None),
                ::core::option::Option::Some(raw) => converter(raw)
                    .map(::core::option::Option::Some)
                    .ok_or_else(|| #rt::DecodeError::invalid(key, raw)),
            }
        }
    }
}

fn bool_converter(_rt: &syn::Path) -> TokenStream {
    quote! {
        fn __route_bool_converter(value: &str) -> ::core::option::Option<bool> {
            match value {
                "true" => ::core::option::Option::Some(true),
                "false" => ::core::option::Option::Some(false),
                _ => ::core::option::Option::None,
            }
        }
    }
}

fn enum_codec(_rt: &syn::Path) -> TokenStream {
    quote! {
        trait __RouteEnumCodec<T> {
            fn from_name(&self, name: &str) -> ::core::option::Option<&T>;
            fn to_name(&self, value: &T) -> ::core::option::Option<&'static str>;
        }

        impl<T: ::core::cmp::PartialEq> __RouteEnumCodec<T> for [(T, &'static str)] {
            fn from_name(&self, name: &str) -> ::core::option::Option<&T> {
                self.iter().find(|(_, n)| *n == name).map(|(v, _)| v)
            }

            fn to_name(&self, value: &T) -> ::core::option::Option<&'static str> {
                self.iter().find(|(v, _)| v == value).map(|(_, n)| *n)
            }
        }
    }
}

/// Scans emitted text for helper references.
#[derive(Debug, Clone, Copy)]
pub struct HelperRegistry {
    catalog: &'static [HelperTemplate],
}

impl Default for HelperRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl HelperRegistry {
    /// The built-in catalog.
    pub const fn standard() -> Self {
        Self { catalog: CATALOG }
    }

    /// Every helper the registry knows.
    pub const fn catalog(&self) -> &'static [HelperTemplate] {
        self.catalog
    }

    /// Helpers referenced in `text`, ordered by first appearance.
    pub fn referenced(&self, text: &str) -> Vec<&'static HelperTemplate> {
        let mut found: Vec<(usize, &'static HelperTemplate)> = self
            .catalog
            .iter()
            .filter_map(|helper| first_token(text, helper.name).map(|at| (at, helper)))
            .collect();
        found.sort_by_key(|(at, _)| *at);
        trace!(count = found.len(), "scanned for helper references");
        found.into_iter().map(|(_, helper)| helper).collect()
    }

    /// Render the helpers referenced by `blocks` as helper blocks.
    pub fn emit(
        &self,
        blocks: &[TextBlock],
        runtime: &syn::Path,
        at: &SourceRef,
    ) -> Result<Vec<TextBlock>, RouteGenError> {
        let text: String = blocks
            .iter()
            .filter(|b| b.kind != BlockKind::Helper)
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        self.referenced(&text)
            .into_iter()
            .map(|helper| {
                let rendered = render_items(helper.tokens(runtime), at)?;
                Ok(TextBlock::new(BlockKind::Helper, helper.name, rendered))
            })
            .collect()
    }
}

/// Byte offset of the first occurrence of `name` as a whole identifier.
fn first_token(text: &str, name: &str) -> Option<usize> {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    text.match_indices(name).map(|(at, _)| at).find(|&at| {
        let before = text[..at].chars().next_back();
        let after = text[at + name.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}
