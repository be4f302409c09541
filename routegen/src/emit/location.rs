//! `location` builders and navigation wrappers for leaf routes.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use super::EmitContext;
use super::decode::default_expr;
use super::types::{ValueCodec, ident};
use crate::constants::NAVIGATION_METHODS;
use crate::errors::{ErrorKind, RouteGenError, SourceRef};
use crate::model::FieldInfo;
use crate::params::ParameterInfo;
use crate::provider::TypeInfoProvider;
use crate::tree::{LeafRoute, RouteConfig};

/// Emit `location` followed by one wrapper per navigation primitive.
pub fn leaf_methods<P>(
    node: &RouteConfig,
    leaf: &LeafRoute,
    ctx: &EmitContext<'_, P>,
    at: &SourceRef,
) -> Result<TokenStream, RouteGenError>
where
    P: TypeInfoProvider + ?Sized,
{
    let location = location_fn(node, leaf, ctx, at)?;
    let wrappers = navigation_fns(node, ctx, at)?;
    Ok(quote! {
        #location
        #wrappers
    })
}

fn location_fn<P>(
    node: &RouteConfig,
    leaf: &LeafRoute,
    ctx: &EmitContext<'_, P>,
    at: &SourceRef,
) -> Result<TokenStream, RouteGenError>
where
    P: TypeInfoProvider + ?Sized,
{
    let rt = ctx.runtime;

    let mut path_locals = Vec::new();
    for name in leaf.pattern.parameter_names() {
        let param_at = at.clone().parameter(name);
        let field = resolve_field(node, name, &param_at)?;
        let codec = ValueCodec::for_scalar(&field.ty, ctx.provider, &param_at)?;
        let field_ident = ident(name, &param_at)?;
        let local = local_ident(name);

        // `None` renders as an empty segment.
        let encoded = if field.ty.nullable {
            let value = codec.encoder(&quote!(__value));
            quote! {
                self.#field_ident.as_ref().map(|__value| #value).unwrap_or_default()
            }
        } else {
            codec.encoder(&quote!(&self.#field_ident))
        };
        path_locals.push(quote! {
            let #local = #rt::encode_component(&#encoded);
        });
    }

    let path = if path_locals.is_empty() {
        let literal = leaf.pattern.render(str::to_string, |name| {
            Err(RouteGenError::new(
                ErrorKind::MissingParameter,
                at.clone().parameter(name),
                format!("Path parameter '{name}' has no binding."),
            ))
        })?;
        quote!(#literal)
    } else {
        let template = leaf.pattern.render(
            |text| text.replace('{', "{{").replace('}', "}}"),
            |name| Ok::<_, RouteGenError>(format!("{{{}}}", local_ident(name))),
        )?;
        quote!(&::std::format!(#template))
    };

    let mut pushes = Vec::new();
    for param in node.parameters.query() {
        let param_at = at.clone().parameter(param.name.as_str());
        resolve_field(node, &param.name, &param_at)?;
        pushes.push(query_push(param, ctx, &param_at)?);
    }

    let query_binding = if pushes.is_empty() {
        quote!(let __query: ::std::vec::Vec<(&'static str, ::std::string::String)> = ::std::vec::Vec::new();)
    } else {
        quote!(let mut __query: ::std::vec::Vec<(&'static str, ::std::string::String)> = ::std::vec::Vec::new();)
    };

    Ok(quote! {
        pub fn location(&self) -> ::std::string::String {
            #(#path_locals)*
            #query_binding
            #(#pushes)*
            #rt::location(#path, &__query)
        }
    })
}

/// One conditional or unconditional push onto `__query`.
fn query_push<P>(
    param: &ParameterInfo,
    ctx: &EmitContext<'_, P>,
    at: &SourceRef,
) -> Result<TokenStream, RouteGenError>
where
    P: TypeInfoProvider + ?Sized,
{
    let key = ctx.config.query_key(&param.name);
    let field = ident(&param.name, at)?;
    let default = default_expr(param, at)?;

    if let Some(element) = param.ty.list_element() {
        let codec = ValueCodec::for_scalar(element, ctx.provider, at)?;
        let value = codec.encoder(&quote!(__value));
        let each = |values: TokenStream| {
            quote! {
                for __value in #values {
                    __query.push((#key, #value));
                }
            }
        };
        return Ok(match default {
            _ if param.is_nullable => {
                let body = each(quote!(__values));
                quote! {
                    if let ::core::option::Option::Some(__values) = &self.#field {
                        #body
                    }
                }
            },
            Some(default) => {
                let body = each(quote!(&self.#field));
                quote! {
                    if self.#field != #default {
                        #body
                    }
                }
            },
            None => each(quote!(&self.#field)),
        });
    }

    let codec = ValueCodec::for_scalar(&param.ty, ctx.provider, at)?;
    Ok(match default {
        _ if param.is_nullable => {
            let value = codec.encoder(&quote!(__value));
            quote! {
                if let ::core::option::Option::Some(__value) = &self.#field {
                    __query.push((#key, #value));
                }
            }
        },
        Some(default) => {
            let value = codec.encoder(&quote!(&self.#field));
            quote! {
                if self.#field != #default {
                    __query.push((#key, #value));
                }
            }
        },
        None => {
            let value = codec.encoder(&quote!(&self.#field));
            quote!(__query.push((#key, #value));)
        },
    })
}

fn navigation_fns<P>(
    node: &RouteConfig,
    ctx: &EmitContext<'_, P>,
    at: &SourceRef,
) -> Result<TokenStream, RouteGenError>
where
    P: TypeInfoProvider + ?Sized,
{
    let rt = ctx.runtime;

    let extra = match node.parameters.payload() {
        None => quote!(::core::option::Option::None),
        Some(payload) => {
            let payload_at = at.clone().parameter(payload.name.as_str());
            resolve_field(node, &payload.name, &payload_at)?;
            let field = ident(&payload.name, &payload_at)?;
            if payload.is_nullable {
                quote! {
                    self.#field
                        .as_ref()
                        .map(|__extra| __extra as &dyn ::core::any::Any)
                }
            } else {
                quote!(::core::option::Option::Some(&self.#field as &dyn ::core::any::Any))
            }
        },
    };

    let methods = NAVIGATION_METHODS.iter().map(|method| {
        let method = Ident::new(method, Span::call_site());
        quote! {
            pub fn #method(&self, navigator: &dyn #rt::Navigator) {
                navigator.#method(&self.location(), #extra);
            }
        }
    });

    Ok(quote!(#(#methods)*))
}

/// The instance field backing an encoded parameter.
fn resolve_field<'n>(
    node: &'n RouteConfig,
    name: &str,
    at: &SourceRef,
) -> Result<&'n FieldInfo, RouteGenError> {
    node.field(name).ok_or_else(|| {
        RouteGenError::new(
            ErrorKind::UnresolvedField,
            at.clone(),
            format!(
                "'{}' has no field '{name}' to encode into its location.",
                node.route_data_type
            ),
        )
    })
}

fn local_ident(name: &str) -> Ident {
    Ident::new(&format!("__{name}"), Span::call_site())
}
