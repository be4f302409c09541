//! Enum codec tables.

use std::collections::HashMap;

use proc_macro2::TokenStream;
use quote::quote;

use super::types::{enum_name, enum_table_ident, ident, type_tokens};
use crate::errors::{ErrorKind, RouteGenError, SourceRef};
use crate::model::TypeRef;
use crate::naming::kebab_case;
use crate::provider::TypeInfoProvider;
use crate::tree::RouteConfig;

/// Enums a node encodes or decodes, in first-reference order.
///
/// Looks at path and query parameters, the element type of list parameters,
/// and the fields backing path segments of the joined pattern.
pub fn referenced_enums<P>(node: &RouteConfig, provider: &P) -> Vec<String>
where
    P: TypeInfoProvider + ?Sized,
{
    let params = node
        .parameters
        .path()
        .chain(node.parameters.query())
        .map(|param| &param.ty);
    let pattern_fields = node
        .pattern()
        .map(|pattern| {
            pattern
                .parameter_names()
                .into_iter()
                .filter_map(|name| node.field(name))
                .map(|field| &field.ty)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let mut found: Vec<String> = Vec::new();
    for ty in params.chain(pattern_fields) {
        let scalar: &TypeRef = ty.list_element().unwrap_or(ty);
        if let Some(name) = enum_name(scalar, provider)
            && !found.iter().any(|f| f == name)
        {
            found.push(name.to_string());
        }
    }
    found
}

/// `const <ENUM>_ENUM_MAP: &[(Enum, &str)]` pairing members with kebab-case names.
pub fn enum_table(
    enum_type: &str,
    members: &[String],
    at: &SourceRef,
) -> Result<TokenStream, RouteGenError> {
    let ty = type_tokens(&TypeRef::named(enum_type), at)?;
    let table = enum_table_ident(enum_type, at)?;

    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut entries = Vec::with_capacity(members.len());
    for member in members {
        let variant = ident(member, at)?;
        let external = kebab_case(member);
        if let Some(previous) = seen.insert(external.clone(), member) {
            return Err(RouteGenError::new(
                ErrorKind::UnsupportedParameterType,
                at.clone(),
                format!(
                    "Members '{previous}' and '{member}' of enum '{enum_type}' both encode as '{external}'."
                ),
            ));
        }
        entries.push(quote!((#ty::#variant, #external)));
    }

    Ok(quote! {
        const #table: &[(#ty, &str)] = &[#(#entries),*];
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::model::{ConstructorParam, RouteAnnotation, RouteDeclaration, TypeInfo};
    use crate::provider::TypeCatalog;
    use crate::tree::RouteTree;

    fn members(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_table_has_one_entry_per_member() {
        let tokens = enum_table(
            "Color",
            &members(&["Red", "Green", "DarkBlue"]),
            &SourceRef::declaration("HomeRoute"),
        )
        .unwrap();
        let code: String = tokens.to_string().split_whitespace().collect();
        assert_eq!(
            code,
            "constCOLOR_ENUM_MAP:&[(Color,&str)]=&[(Color::Red,\"red\"),(Color::Green,\"green\"),(Color::DarkBlue,\"dark-blue\")];"
        );
    }

    #[test]
    fn test_colliding_members_fail() {
        let err = enum_table(
            "Mode",
            &members(&["DarkMode", "Dark_Mode"]),
            &SourceRef::declaration("HomeRoute"),
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedParameterType);
        assert!(err.message.contains("dark-mode"));
    }

    #[test]
    fn test_referenced_enums_in_order_and_deduplicated() {
        let catalog = TypeCatalog::new()
            .with(TypeInfo::route_data(
                "PaintRoute",
                vec![
                    ConstructorParam::named("shade", TypeRef::named("Shade")),
                    ConstructorParam::named("tags", TypeRef::list(TypeRef::named("Color")))
                        .optional(),
                    ConstructorParam::named("color", TypeRef::named("Color").nullable())
                        .optional(),
                    ConstructorParam::named("extra", TypeRef::named("Color")),
                ],
            ))
            .with(TypeInfo::enumeration("Color", ["Red"]))
            .with(TypeInfo::enumeration("Shade", ["Light"]));
        let declaration = RouteDeclaration::new(
            "PaintRoute",
            RouteAnnotation::go_route("PaintRoute", "/paint/:shade"),
        );
        let tree = RouteTree::build(&declaration, &catalog, &GeneratorConfig::default()).unwrap();
        assert_eq!(
            referenced_enums(tree.root(), &catalog),
            vec!["Shade".to_string(), "Color".to_string()]
        );
    }
}
