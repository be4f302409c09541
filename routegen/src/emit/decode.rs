//! `from_state`: navigation state to route-data instance.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use super::EmitContext;
use super::types::{ValueCodec, ident, is_string, type_tokens};
use crate::constants::{FROM_STATE_FN, HELPER_CONVERT_MAP_VALUE};
use crate::errors::{ErrorKind, RouteGenError, SourceRef};
use crate::params::{ParameterInfo, ParameterKind};
use crate::provider::TypeInfoProvider;
use crate::tree::RouteConfig;

/// Emit the decode function for one node.
///
/// Parameters are decoded in constructor order into locals, then the value is
/// built with a struct literal, or with `Self::new` when any parameter is
/// positional.
pub fn from_state_fn<P>(
    node: &RouteConfig,
    ctx: &EmitContext<'_, P>,
    at: &SourceRef,
) -> Result<TokenStream, RouteGenError>
where
    P: TypeInfoProvider + ?Sized,
{
    let rt = ctx.runtime;
    let fn_name = Ident::new(FROM_STATE_FN, Span::call_site());

    let mut locals = Vec::new();
    let mut names = Vec::new();
    for param in node.parameters.all() {
        let param_at = at.clone().parameter(param.name.as_str());
        let name = ident(&param.name, &param_at)?;
        let value = match param.kind {
            ParameterKind::Path => decode_path(param, ctx, &param_at)?,
            ParameterKind::Query => decode_query(param, ctx, &param_at)?,
            ParameterKind::Payload => decode_payload(param, ctx, &param_at)?,
        };
        locals.push(quote!(let #name = #value;));
        names.push(name);
    }

    let construct = if node.parameters.has_positional() {
        quote!(Self::new(#(#names),*))
    } else {
        quote!(Self { #(#names),* })
    };

    Ok(quote! {
        #[allow(unused_variables)]
        pub fn #fn_name(
            __state: &dyn #rt::NavigationState,
        ) -> ::core::result::Result<Self, #rt::DecodeError> {
            #(#locals)*
            ::core::result::Result::Ok(#construct)
        }
    })
}

fn decode_path<P>(
    param: &ParameterInfo,
    ctx: &EmitContext<'_, P>,
    at: &SourceRef,
) -> Result<TokenStream, RouteGenError>
where
    P: TypeInfoProvider + ?Sized,
{
    let rt = ctx.runtime;
    let key = &param.name;
    let decoder = ValueCodec::for_scalar(&param.ty, ctx.provider, at)?.decoder();

    let value = quote! {
        {
            let __raw = __state
                .path_parameter(#key)
                .ok_or_else(|| #rt::DecodeError::missing(#key))?;
            (#decoder)(__raw).ok_or_else(|| #rt::DecodeError::invalid(#key, __raw))?
        }
    };

    Ok(if param.is_nullable {
        quote!(::core::option::Option::Some(#value))
    } else {
        value
    })
}

fn decode_query<P>(
    param: &ParameterInfo,
    ctx: &EmitContext<'_, P>,
    at: &SourceRef,
) -> Result<TokenStream, RouteGenError>
where
    P: TypeInfoProvider + ?Sized,
{
    let rt = ctx.runtime;
    let key = ctx.config.query_key(&param.name);
    let default = default_expr(param, at)?;

    if let Some(element) = param.ty.list_element() {
        let decoder = ValueCodec::for_scalar(element, ctx.provider, at)?.decoder();
        let values = quote! {
            __state
                .query_parameters_all()
                .get(#key)
                .map(|__items| {
                    __items
                        .iter()
                        .map(|__item| {
                            (#decoder)(__item.as_str())
                                .ok_or_else(|| #rt::DecodeError::invalid(#key, __item))
                        })
                        .collect::<::core::result::Result<::std::vec::Vec<_>, _>>()
                })
                .transpose()?
        };
        return Ok(match default {
            _ if param.is_nullable => values,
            Some(default) => quote!(#values.unwrap_or_else(|| #default)),
            None => quote!(#values.unwrap_or_default()),
        });
    }

    let helper = Ident::new(HELPER_CONVERT_MAP_VALUE, Span::call_site());
    let decoder = ValueCodec::for_scalar(&param.ty, ctx.provider, at)?.decoder();
    let value = quote!(#helper(#key, __state.query_parameters(), #decoder)?);

    Ok(match default {
        _ if param.is_nullable => value,
        Some(default) if is_string(&param.ty) => {
            quote!(#value.unwrap_or_else(|| ::std::string::String::from(#default)))
        },
        Some(default) => quote!(#value.unwrap_or_else(|| #default)),
        None => quote!(#value.ok_or_else(|| #rt::DecodeError::missing(#key))?),
    })
}

fn decode_payload<P>(
    param: &ParameterInfo,
    ctx: &EmitContext<'_, P>,
    at: &SourceRef,
) -> Result<TokenStream, RouteGenError>
where
    P: TypeInfoProvider + ?Sized,
{
    let rt = ctx.runtime;
    let key = &param.name;
    let ty = type_tokens(&param.ty.non_nullable(), at)?;
    let value = quote! {
        __state
            .extra()
            .and_then(|__extra| __extra.downcast_ref::<#ty>())
            .cloned()
    };

    Ok(if param.is_nullable {
        value
    } else {
        quote!(#value.ok_or_else(|| #rt::DecodeError::missing(#key))?)
    })
}

/// The parameter's default literal parsed as an expression.
pub fn default_expr(param: &ParameterInfo, at: &SourceRef) -> Result<Option<syn::Expr>, RouteGenError> {
    param
        .default_value
        .as_deref()
        .map(|literal| {
            syn::parse_str::<syn::Expr>(literal).map_err(|e| {
                RouteGenError::new(
                    ErrorKind::InvalidDefaultValue,
                    at.clone(),
                    format!("Default value '{literal}' does not parse: {e}"),
                )
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::model::{ConstructorParam, RouteAnnotation, RouteDeclaration, TypeInfo, TypeRef};
    use crate::provider::TypeCatalog;
    use crate::tree::RouteTree;

    fn compact(tokens: &TokenStream) -> String {
        tokens.to_string().split_whitespace().collect()
    }

    fn emit_for(constructor: Vec<ConstructorParam>, path: &str) -> String {
        let catalog = TypeCatalog::new()
            .with(TypeInfo::route_data("SearchRoute", constructor))
            .with(TypeInfo::enumeration("Color", ["Red", "Green"]));
        let config = GeneratorConfig::default();
        let declaration =
            RouteDeclaration::new("SearchRoute", RouteAnnotation::go_route("SearchRoute", path));
        let tree = RouteTree::build(&declaration, &catalog, &config).unwrap();
        let runtime = config.runtime().unwrap();
        let ctx = EmitContext {
            provider: &catalog,
            config: &config,
            runtime: &runtime,
        };
        let tokens = from_state_fn(tree.root(), &ctx, &tree.source_of(tree.root().id)).unwrap();
        compact(&tokens)
    }

    #[test]
    fn test_required_path_parameter_errors_when_missing() {
        let code = emit_for(
            vec![ConstructorParam::named("fid", TypeRef::named("String"))],
            "/family/:fid",
        );
        assert!(code.contains("__state.path_parameter(\"fid\").ok_or_else(||::route_runtime::DecodeError::missing(\"fid\"))?"));
        assert!(code.contains("Self{fid}"));
    }

    #[test]
    fn test_required_query_parameter() {
        let code = emit_for(
            vec![ConstructorParam::named("pageSize", TypeRef::named("u32"))],
            "/search",
        );
        assert!(code.contains("__route_convert_map_value(\"page-size\",__state.query_parameters(),"));
        assert!(code.contains(".ok_or_else(||::route_runtime::DecodeError::missing(\"page-size\"))?"));
    }

    #[test]
    fn test_defaulted_string_query_parameter() {
        let code = emit_for(
            vec![ConstructorParam::named("q", TypeRef::named("String")).with_default("\"all\"")],
            "/search",
        );
        assert!(code.contains(".unwrap_or_else(||::std::string::String::from(\"all\"))"));
    }

    #[test]
    fn test_nullable_query_parameter_stays_optional() {
        let code = emit_for(
            vec![ConstructorParam::named("color", TypeRef::named("Color").nullable()).optional()],
            "/search",
        );
        assert!(code.contains("from_name(COLOR_ENUM_MAP,__v).cloned()"));
        assert!(!code.contains("missing(\"color\")"));
    }

    #[test]
    fn test_list_query_parameter_defaults_to_empty() {
        let code = emit_for(
            vec![ConstructorParam::named("tags", TypeRef::list(TypeRef::named("String"))).optional()],
            "/search",
        );
        assert!(code.contains("__state.query_parameters_all().get(\"tags\")"));
        assert!(code.contains(".transpose()?.unwrap_or_default()"));
    }

    #[test]
    fn test_payload_is_downcast() {
        let code = emit_for(
            vec![ConstructorParam::named("extra", TypeRef::named("Draft"))],
            "/compose",
        );
        assert!(code.contains("downcast_ref::<Draft>()"));
        assert!(code.contains("missing(\"extra\")"));
    }

    #[test]
    fn test_positional_uses_constructor() {
        let code = emit_for(
            vec![ConstructorParam::positional("fid", TypeRef::named("String"))],
            "/family/:fid",
        );
        assert!(code.contains("Self::new(fid)"));
    }
}
