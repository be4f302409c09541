//! Constructor parameter classification.
//!
//! Splits a route-data type's constructor parameters into path, query and
//! payload parameters and enforces the nullability rules each kind carries.

use tracing::trace;

use crate::errors::{ErrorKind, RouteGenError, SourceRef};
use crate::model::{ConstructorParam, TypeRef};
use crate::naming::is_identifier;
use crate::pattern::PathPattern;

/// Where a parameter's value travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Substituted into the path template.
    Path,
    /// Carried in the query string.
    Query,
    /// Passed through opaquely, never encoded.
    Payload,
}

/// A classified constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    /// Constructor parameter name, also the backing field name.
    pub name: String,
    /// Path, query or payload.
    pub kind: ParameterKind,
    /// Declared type, nullability included.
    pub ty: TypeRef,
    /// Passed by position rather than by name.
    pub positional: bool,
    /// The constructor cannot be called without it.
    pub is_required: bool,
    /// The type is wrapped in `Option`.
    pub is_nullable: bool,
    /// Shorthand for `default_value.is_some()`.
    pub has_default: bool,
    /// Default as a Rust expression, verbatim.
    pub default_value: Option<String>,
}

/// All parameters of one constructor, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedParameters {
    params: Vec<ParameterInfo>,
}

impl ClassifiedParameters {
    /// Every parameter in constructor order.
    pub fn all(&self) -> &[ParameterInfo] {
        &self.params
    }

    /// Path parameters in constructor order.
    pub fn path(&self) -> impl Iterator<Item = &ParameterInfo> {
        self.of_kind(ParameterKind::Path)
    }

    /// Query parameters in constructor order.
    pub fn query(&self) -> impl Iterator<Item = &ParameterInfo> {
        self.of_kind(ParameterKind::Query)
    }

    /// The payload parameter, if the constructor has one.
    pub fn payload(&self) -> Option<&ParameterInfo> {
        self.of_kind(ParameterKind::Payload).next()
    }

    /// Whether the constructor takes any positional parameter.
    pub fn has_positional(&self) -> bool {
        self.params.iter().any(|p| p.positional)
    }

    /// Whether there are no parameters at all.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    fn of_kind(&self, kind: ParameterKind) -> impl Iterator<Item = &ParameterInfo> {
        self.params.iter().filter(move |p| p.kind == kind)
    }
}

/// Classify `params` against the path parameters of `pattern`.
///
/// `location` identifies the owning route; errors narrow it to the offending
/// parameter.
pub fn classify(
    params: &[ConstructorParam],
    pattern: Option<&PathPattern>,
    payload_field: &str,
    location: &SourceRef,
) -> Result<ClassifiedParameters, RouteGenError> {
    let mut classified = Vec::with_capacity(params.len());

    for param in params {
        let at = location.clone().parameter(param.name.as_str());

        if param.positional == param.named {
            return Err(RouteGenError::new(
                ErrorKind::MalformedParameterRole,
                at,
                format!(
                    "Parameter '{}' must be either positional or named.",
                    param.name
                ),
            ));
        }

        if !is_identifier(&param.name) || syn::parse_str::<syn::Ident>(&param.name).is_err() {
            return Err(RouteGenError::new(
                ErrorKind::InvalidIdentifier,
                at,
                format!("Parameter name '{}' is not a usable identifier.", param.name),
            ));
        }

        let kind = if param.name == payload_field {
            ParameterKind::Payload
        } else if pattern.is_some_and(|p| p.has_parameter(&param.name)) {
            ParameterKind::Path
        } else {
            ParameterKind::Query
        };

        let info = ParameterInfo {
            name: param.name.clone(),
            kind,
            ty: param.ty.clone(),
            positional: param.positional,
            is_required: param.required,
            is_nullable: param.ty.nullable,
            has_default: param.default_value.is_some(),
            default_value: param.default_value.clone(),
        };

        validate(&info, at)?;
        trace!(parameter = %info.name, kind = ?info.kind, "classified parameter");
        classified.push(info);
    }

    Ok(ClassifiedParameters { params: classified })
}

fn validate(info: &ParameterInfo, at: SourceRef) -> Result<(), RouteGenError> {
    match info.kind {
        ParameterKind::Path => {
            if info.is_required && info.is_nullable {
                return Err(RouteGenError::new(
                    ErrorKind::NullablePathParameter,
                    at,
                    format!(
                        "Required path parameter '{}' cannot be nullable; a path always carries a value.",
                        info.name
                    ),
                ));
            }
            if info.ty.list_element().is_some() {
                return Err(RouteGenError::new(
                    ErrorKind::UnsupportedParameterType,
                    at,
                    format!(
                        "Path parameter '{}' has list type '{}'; only scalar values fit in a path segment.",
                        info.name, info.ty
                    ),
                ));
            }
        },
        ParameterKind::Query => {
            if info.has_default && info.is_nullable {
                return Err(RouteGenError::new(
                    ErrorKind::NullableDefaultValue,
                    at,
                    format!(
                        "Query parameter '{}' has a default value, so it cannot be nullable.",
                        info.name
                    ),
                ));
            }
            if let Some(element) = info.ty.list_element()
                && (element.nullable || !element.args.is_empty())
            {
                return Err(RouteGenError::new(
                    ErrorKind::UnsupportedParameterType,
                    at,
                    format!(
                        "Query parameter '{}' has type '{}'; list elements must be plain scalars.",
                        info.name, info.ty
                    ),
                ));
            }
        },
        ParameterKind::Payload => {},
    }

    if let Some(literal) = &info.default_value
        && syn::parse_str::<syn::Expr>(literal).is_err()
    {
        return Err(RouteGenError::new(
            ErrorKind::InvalidDefaultValue,
            at,
            format!(
                "Default value '{literal}' of '{}' is not a valid expression.",
                info.name
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(template: &str) -> PathPattern {
        PathPattern::parse(template).unwrap()
    }

    fn location() -> SourceRef {
        SourceRef::declaration("FamilyRoute")
    }

    // =========================================================================
    // Classification Tests
    // =========================================================================

    #[test]
    fn test_classify_path_query_payload() {
        let params = vec![
            ConstructorParam::named("fid", TypeRef::named("String")),
            ConstructorParam::named("color", TypeRef::named("Color").nullable()).optional(),
            ConstructorParam::named("extra", TypeRef::named("Payload")),
        ];
        let classified = classify(
            &params,
            Some(&pattern("/family/:fid")),
            "extra",
            &location(),
        )
        .unwrap();

        let kinds: Vec<_> = classified.all().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ParameterKind::Path,
                ParameterKind::Query,
                ParameterKind::Payload
            ]
        );
        assert_eq!(classified.payload().map(|p| p.name.as_str()), Some("extra"));
    }

    #[test]
    fn test_classify_preserves_declaration_order() {
        let params = vec![
            ConstructorParam::named("b", TypeRef::named("u32")),
            ConstructorParam::named("pid", TypeRef::named("String")),
            ConstructorParam::named("a", TypeRef::named("u32")),
            ConstructorParam::named("fid", TypeRef::named("String")),
        ];
        let classified = classify(
            &params,
            Some(&pattern("/:fid/:pid")),
            "extra",
            &location(),
        )
        .unwrap();

        let path: Vec<_> = classified.path().map(|p| p.name.as_str()).collect();
        let query: Vec<_> = classified.query().map(|p| p.name.as_str()).collect();
        assert_eq!(path, vec!["pid", "fid"]);
        assert_eq!(query, vec!["b", "a"]);
    }

    #[test]
    fn test_payload_excluded_from_path_set() {
        let params = vec![ConstructorParam::named("extra", TypeRef::named("String"))];
        let classified =
            classify(&params, Some(&pattern("/:extra")), "extra", &location()).unwrap();
        assert_eq!(classified.path().count(), 0);
        assert!(classified.payload().is_some());
    }

    #[test]
    fn test_no_pattern_means_all_query() {
        let params = vec![ConstructorParam::named("fid", TypeRef::named("String"))];
        let classified = classify(&params, None, "extra", &location()).unwrap();
        assert_eq!(classified.query().count(), 1);
    }

    // =========================================================================
    // Validation Tests
    // =========================================================================

    #[test]
    fn test_nullable_required_path_parameter_fails() {
        let params = vec![ConstructorParam::named("fid", TypeRef::named("String").nullable())];
        let err = classify(&params, Some(&pattern("/:fid")), "extra", &location()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NullablePathParameter);
        assert_eq!(err.location.parameter.as_deref(), Some("fid"));
    }

    #[test]
    fn test_nullable_required_query_parameter_is_fine() {
        let params = vec![ConstructorParam::named("fid", TypeRef::named("String").nullable())];
        assert!(classify(&params, Some(&pattern("/other")), "extra", &location()).is_ok());
    }

    #[test]
    fn test_nullable_default_query_parameter_fails() {
        let params = vec![
            ConstructorParam::named("limit", TypeRef::named("u32").nullable()).with_default("20"),
        ];
        let err = classify(&params, None, "extra", &location()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NullableDefaultValue);
    }

    #[test]
    fn test_malformed_role_fails() {
        let mut param = ConstructorParam::named("fid", TypeRef::named("String"));
        param.named = false;
        let err = classify(&[param], None, "extra", &location()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedParameterRole);
    }

    #[test]
    fn test_keyword_name_fails() {
        let params = vec![ConstructorParam::named("type", TypeRef::named("String"))];
        let err = classify(&params, None, "extra", &location()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidIdentifier);
    }

    #[test]
    fn test_list_path_parameter_fails() {
        let params = vec![ConstructorParam::named(
            "ids",
            TypeRef::list(TypeRef::named("u32")),
        )];
        let err = classify(&params, Some(&pattern("/:ids")), "extra", &location()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedParameterType);
    }

    #[test]
    fn test_nested_list_query_parameter_fails() {
        let params = vec![ConstructorParam::named(
            "ids",
            TypeRef::list(TypeRef::list(TypeRef::named("u32"))),
        )];
        let err = classify(&params, None, "extra", &location()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedParameterType);
    }

    #[test]
    fn test_invalid_default_literal_fails() {
        let params =
            vec![ConstructorParam::named("limit", TypeRef::named("u32")).with_default("20 +")];
        let err = classify(&params, None, "extra", &location()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDefaultValue);
    }
}
