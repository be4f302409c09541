//! Type tokens and per-type value codecs.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use crate::constants::{ENUM_MAP_SUFFIX, HELPER_BOOL_CONVERTER, HELPER_ENUM_CODEC};
use crate::errors::{ErrorKind, RouteGenError, SourceRef};
use crate::model::TypeRef;
use crate::naming::screaming_snake_case;
use crate::provider::TypeInfoProvider;

/// Render a type descriptor as Rust type tokens, `Option` included.
pub fn type_tokens(ty: &TypeRef, at: &SourceRef) -> Result<TokenStream, RouteGenError> {
    let path = type_path(&ty.name, at)?;

    let args = ty
        .args
        .iter()
        .map(|arg| type_tokens(arg, at))
        .collect::<Result<Vec<_>, _>>()?;

    let base = if args.is_empty() {
        quote!(#path)
    } else {
        quote!(#path<#(#args),*>)
    };

    Ok(if ty.nullable {
        quote!(::core::option::Option<#base>)
    } else {
        base
    })
}

/// A type path such as `HomeRoute` or `crate::routes::HomeRoute`.
pub fn type_path(name: &str, at: &SourceRef) -> Result<syn::Path, RouteGenError> {
    syn::parse_str(name).map_err(|_| {
        RouteGenError::new(
            ErrorKind::InvalidIdentifier,
            at.clone(),
            format!("Type name '{name}' is not a valid Rust path."),
        )
    })
}

/// A plain identifier, or an `InvalidIdentifier` error.
pub fn ident(name: &str, at: &SourceRef) -> Result<Ident, RouteGenError> {
    syn::parse_str::<Ident>(name).map_err(|_| {
        RouteGenError::new(
            ErrorKind::InvalidIdentifier,
            at.clone(),
            format!("'{name}' cannot be used as an identifier in generated code."),
        )
    })
}

/// Last segment of a type path, without any `r#` prefix.
pub fn last_segment(name: &str) -> &str {
    let simple = name.rsplit("::").next().unwrap_or(name);
    simple.strip_prefix("r#").unwrap_or(simple)
}

/// Name of the codec table emitted for an enum (`Color` -> `COLOR_ENUM_MAP`).
pub fn enum_table_ident(enum_name: &str, at: &SourceRef) -> Result<Ident, RouteGenError> {
    let simple = last_segment(enum_name);
    ident(&format!("{}{ENUM_MAP_SUFFIX}", screaming_snake_case(simple)), at)
}

// =============================================================================
// VALUE CODECS
// =============================================================================

/// How one scalar value travels through a path segment or query value.
#[derive(Debug, Clone)]
pub enum ValueCodec {
    /// `String`: copied in, `to_string()` out.
    Text,
    /// `bool`: only `"true"` and `"false"` decode.
    Bool,
    /// An enum looked up in its codec table.
    Enum { ty: TokenStream, table: Ident },
    /// Anything else: `str::parse` in, `to_string()` out.
    Parsed { ty: TokenStream },
}

impl ValueCodec {
    /// Pick the codec for a scalar (non-nullable, non-list) type.
    pub fn for_scalar<P>(ty: &TypeRef, provider: &P, at: &SourceRef) -> Result<Self, RouteGenError>
    where
        P: TypeInfoProvider + ?Sized,
    {
        if !ty.args.is_empty() {
            return Err(RouteGenError::new(
                ErrorKind::UnsupportedParameterType,
                at.clone(),
                format!("Type '{ty}' is a container; only scalar values can be encoded."),
            ));
        }

        let scalar = ty.non_nullable();
        if enum_name(&scalar, provider).is_some() {
            return Ok(Self::Enum {
                ty: type_tokens(&scalar, at)?,
                table: enum_table_ident(&scalar.name, at)?,
            });
        }

        Ok(match scalar.simple_name() {
            "String" => Self::Text,
            "bool" => Self::Bool,
            _ => Self::Parsed {
                ty: type_tokens(&scalar, at)?,
            },
        })
    }

    /// A callable `Fn(&str) -> Option<T>`.
    pub fn decoder(&self) -> TokenStream {
        match self {
            Self::Text => quote! {
                |__v: &str| ::core::option::Option::Some(::std::string::String::from(__v))
            },
            Self::Bool => {
                let helper = Ident::new(HELPER_BOOL_CONVERTER, Span::call_site());
                quote!(#helper)
            },
            Self::Enum { ty, table } => {
                let codec = Ident::new(HELPER_ENUM_CODEC, Span::call_site());
                quote! {
                    |__v: &str| <[(#ty, &'static str)] as #codec<#ty>>::from_name(#table, __v).cloned()
                }
            },
            Self::Parsed { ty } => quote! {
                |__v: &str| __v.parse::<#ty>().ok()
            },
        }
    }

    /// A `String` expression encoding `value`, itself an expression of type `&T`.
    pub fn encoder(&self, value: &TokenStream) -> TokenStream {
        match self {
            Self::Enum { ty, table } => {
                let codec = Ident::new(HELPER_ENUM_CODEC, Span::call_site());
                quote! {
                    <[(#ty, &'static str)] as #codec<#ty>>::to_name(#table, #value)
                        .expect("enum member has a codec entry")
                        .to_string()
                }
            },
            Self::Text | Self::Bool | Self::Parsed { .. } => quote!((#value).to_string()),
        }
    }
}

/// The provider's name for `ty` when it describes an enum.
pub fn enum_name<'p, P>(ty: &TypeRef, provider: &'p P) -> Option<&'p str>
where
    P: TypeInfoProvider + ?Sized,
{
    [ty.name.as_str(), ty.simple_name()]
        .into_iter()
        .find_map(|name| provider.type_info(name).filter(|_| provider.enum_members(name).is_some()))
        .map(|info| info.name.as_str())
}

/// Whether `ty` is `String`, ignoring nullability.
pub fn is_string(ty: &TypeRef) -> bool {
    ty.args.is_empty() && ty.simple_name() == "String"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeInfo;
    use crate::provider::TypeCatalog;

    fn at() -> SourceRef {
        SourceRef::declaration("HomeRoute")
    }

    fn catalog() -> TypeCatalog {
        TypeCatalog::new().with(TypeInfo::enumeration("Color", ["Red", "DarkBlue"]))
    }

    fn compact(tokens: &TokenStream) -> String {
        tokens.to_string().split_whitespace().collect()
    }

    #[test]
    fn test_type_tokens_nested() {
        let ty = TypeRef::list(TypeRef::named("crate::Color")).nullable();
        let tokens = type_tokens(&ty, &at()).unwrap();
        assert_eq!(
            compact(&tokens),
            "::core::option::Option<Vec<crate::Color>>"
        );
    }

    #[test]
    fn test_type_tokens_rejects_garbage() {
        let err = type_tokens(&TypeRef::named("not a type"), &at()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidIdentifier);
    }

    #[test]
    fn test_enum_table_ident() {
        assert_eq!(enum_table_ident("Color", &at()).unwrap().to_string(), "COLOR_ENUM_MAP");
        assert_eq!(
            enum_table_ident("crate::SportKind", &at()).unwrap().to_string(),
            "SPORT_KIND_ENUM_MAP"
        );
    }

    #[test]
    fn test_enum_table_ident_raw_name() {
        assert_eq!(
            enum_table_ident("r#Match", &at()).unwrap().to_string(),
            "MATCH_ENUM_MAP"
        );
        assert_eq!(
            enum_table_ident("crate::r#Match", &at()).unwrap().to_string(),
            "MATCH_ENUM_MAP"
        );
    }

    #[test]
    fn test_enum_table_ident_rejects_leading_digit() {
        let err = enum_table_ident("9Lives", &at()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidIdentifier);
        assert!(err.message.contains("ENUM_MAP"));
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("crate::models::Color"), "Color");
        assert_eq!(last_segment("r#Match"), "Match");
        assert_eq!(last_segment("Color"), "Color");
    }

    #[test]
    fn test_codec_selection() {
        let catalog = catalog();
        let codec = |name: &str| ValueCodec::for_scalar(&TypeRef::named(name), &catalog, &at());
        assert!(matches!(codec("String").unwrap(), ValueCodec::Text));
        assert!(matches!(codec("bool").unwrap(), ValueCodec::Bool));
        assert!(matches!(codec("Color").unwrap(), ValueCodec::Enum { .. }));
        assert!(matches!(codec("i64").unwrap(), ValueCodec::Parsed { .. }));
    }

    #[test]
    fn test_codec_ignores_nullability() {
        let codec =
            ValueCodec::for_scalar(&TypeRef::named("Color").nullable(), &catalog(), &at()).unwrap();
        assert!(matches!(codec, ValueCodec::Enum { .. }));
    }

    #[test]
    fn test_codec_rejects_containers() {
        let err = ValueCodec::for_scalar(&TypeRef::list(TypeRef::named("u8")), &catalog(), &at())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedParameterType);
    }

    #[test]
    fn test_enum_encoder_asserts_non_null() {
        let codec = ValueCodec::for_scalar(&TypeRef::named("Color"), &catalog(), &at()).unwrap();
        let encoded = compact(&codec.encoder(&quote!(&self.color)));
        assert!(encoded.contains("__RouteEnumCodec<Color>>::to_name(COLOR_ENUM_MAP,&self.color)"));
        assert!(encoded.contains(".expect("));
    }

    #[test]
    fn test_parsed_decoder() {
        let codec = ValueCodec::for_scalar(&TypeRef::named("u32"), &catalog(), &at()).unwrap();
        assert_eq!(
            compact(&codec.decoder()),
            "|__v:&str|__v.parse::<u32>().ok()"
        );
    }
}
