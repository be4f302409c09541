//! Host-supplied input records.
//!
//! The host build pipeline discovers annotated types and hands them over as
//! plain data: the annotation tree of each top-level declaration and, through
//! a [`TypeInfoProvider`](crate::TypeInfoProvider), the constructor and field
//! lists of every type the annotations mention.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// TYPE DESCRIPTORS
// =============================================================================

/// A resolved type as seen by the host.
///
/// `name` is a Rust path (`String`, `i64`, `crate::Color`), `args` are its
/// generic arguments and `nullable` means the value is wrapped in `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Rust path of the type.
    pub name: String,
    /// Generic arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Self>,
    /// Wrapped in `Option`.
    #[serde(default)]
    pub nullable: bool,
}

impl TypeRef {
    /// A non-nullable type without generic arguments.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            nullable: false,
        }
    }

    /// `Vec<element>`.
    pub fn list(element: Self) -> Self {
        Self {
            name: "Vec".to_string(),
            args: vec![element],
            nullable: false,
        }
    }

    /// The same type wrapped in `Option`.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// The same type with `Option` stripped.
    #[must_use]
    pub fn non_nullable(&self) -> Self {
        Self {
            nullable: false,
            ..self.clone()
        }
    }

    /// Last path segment of the type name (`crate::Color` -> `Color`).
    pub fn simple_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }

    /// Element type when this is a single-argument `Vec`.
    pub fn list_element(&self) -> Option<&Self> {
        match self.args.as_slice() {
            [element] if self.simple_name() == "Vec" => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            f.write_str("Option<")?;
        }
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        if self.nullable {
            f.write_str(">")?;
        }
        Ok(())
    }
}

// =============================================================================
// CONSTRUCTORS AND FIELDS
// =============================================================================

/// One parameter of a route-data type's primary constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorParam {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Passed by position.
    #[serde(default)]
    pub positional: bool,
    /// Passed by name. Exactly one of the two roles must be set.
    #[serde(default)]
    pub named: bool,
    /// Must be supplied by the caller.
    #[serde(default)]
    pub required: bool,
    /// Default value as a Rust expression, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ConstructorParam {
    /// A required named parameter.
    pub fn named(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            positional: false,
            named: true,
            required: true,
            default_value: None,
        }
    }

    /// A required positional parameter.
    pub fn positional(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            positional: true,
            named: false,
            ..Self::named(name, ty)
        }
    }

    /// Mark the parameter optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Give the parameter a default value; defaulted parameters are optional.
    #[must_use]
    pub fn with_default(mut self, literal: impl Into<String>) -> Self {
        self.default_value = Some(literal.into());
        self.required = false;
        self
    }
}

/// An instance field or associated constant of a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// Field or constant name.
    pub name: String,
    /// Its type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl FieldInfo {
    /// Field of the given name and type.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Shape of a described type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    /// A route-data type with a primary constructor.
    Struct {
        /// Primary constructor parameters in declaration order.
        #[serde(default)]
        constructor: Vec<ConstructorParam>,
        /// Instance fields.
        #[serde(default)]
        fields: Vec<FieldInfo>,
        /// Associated constants.
        #[serde(default)]
        static_fields: Vec<FieldInfo>,
    },
    /// An enum usable as a path or query value.
    Enum {
        /// Variant names in declaration order.
        #[serde(default)]
        members: Vec<String>,
    },
}

/// Reflective description of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Name the type is looked up by.
    pub name: String,
    /// Struct or enum shape.
    #[serde(flatten)]
    pub kind: TypeKind,
}

impl TypeInfo {
    /// A struct whose fields mirror its named constructor parameters.
    pub fn route_data(name: impl Into<String>, constructor: Vec<ConstructorParam>) -> Self {
        let fields = constructor
            .iter()
            .map(|param| FieldInfo::new(param.name.clone(), param.ty.clone()))
            .collect();
        Self {
            name: name.into(),
            kind: TypeKind::Struct {
                constructor,
                fields,
                static_fields: Vec::new(),
            },
        }
    }

    /// An enum with the given members.
    pub fn enumeration<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: TypeKind::Enum {
                members: members.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Add an associated constant (used for navigator keys).
    #[must_use]
    pub fn with_static_field(mut self, field: FieldInfo) -> Self {
        if let TypeKind::Struct { static_fields, .. } = &mut self.kind {
            static_fields.push(field);
        }
        self
    }
}

// =============================================================================
// ROUTE ANNOTATIONS
// =============================================================================

/// Declarative route description, possibly nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteAnnotation {
    /// A navigable route contributing a path template.
    GoRoute {
        /// The annotation's type argument.
        #[serde(rename = "type")]
        type_name: String,
        /// Path template; required for a valid leaf.
        #[serde(default)]
        path: Option<String>,
        /// Optional route name.
        #[serde(default)]
        name: Option<String>,
        /// Nested routes.
        #[serde(default)]
        routes: Vec<Self>,
    },
    /// A layout route grouping its children under a navigator.
    ShellRoute {
        /// The annotation's type argument.
        #[serde(rename = "type")]
        type_name: String,
        /// Nested routes.
        #[serde(default)]
        routes: Vec<Self>,
    },
}

impl RouteAnnotation {
    /// A leaf route with a path and no children.
    pub fn go_route(type_name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::GoRoute {
            type_name: type_name.into(),
            path: Some(path.into()),
            name: None,
            routes: Vec::new(),
        }
    }

    /// A shell route with no children.
    pub fn shell_route(type_name: impl Into<String>) -> Self {
        Self::ShellRoute {
            type_name: type_name.into(),
            routes: Vec::new(),
        }
    }

    /// Attach a route name (leaf routes only).
    #[must_use]
    pub fn named(mut self, route_name: impl Into<String>) -> Self {
        if let Self::GoRoute { name, .. } = &mut self {
            *name = Some(route_name.into());
        }
        self
    }

    /// Append a nested route.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        match &mut self {
            Self::GoRoute { routes, .. } | Self::ShellRoute { routes, .. } => routes.push(child),
        }
        self
    }

    /// The annotation's type argument.
    pub fn type_name(&self) -> &str {
        match self {
            Self::GoRoute { type_name, .. } | Self::ShellRoute { type_name, .. } => type_name,
        }
    }

    /// Nested route descriptions in declaration order.
    pub fn routes(&self) -> &[Self] {
        match self {
            Self::GoRoute { routes, .. } | Self::ShellRoute { routes, .. } => routes,
        }
    }
}

/// One top-level annotated type handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDeclaration {
    /// The type the annotation is attached to.
    pub type_name: String,
    /// The annotation tree rooted at that type.
    pub annotation: RouteAnnotation,
}

impl RouteDeclaration {
    /// Pair an annotated type with its annotation.
    pub fn new(type_name: impl Into<String>, annotation: RouteAnnotation) -> Self {
        Self {
            type_name: type_name.into(),
            annotation,
        }
    }
}
