//! Route configuration tree.
//!
//! [`RouteTree::build`] walks one declaration's annotation recursively and
//! produces an arena of [`RouteConfig`] nodes stored in pre-order: the root
//! first, then each child subtree in declaration order. Parent links are
//! indices into the same arena and never change after construction.

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::errors::{ErrorKind, RouteGenError, SourceRef, unknown_name};
use crate::model::{ConstructorParam, FieldInfo, RouteAnnotation, RouteDeclaration};
use crate::params::{ClassifiedParameters, classify};
use crate::pattern::{PathPattern, join_paths};
use crate::provider::TypeInfoProvider;

// =============================================================================
// TYPES
// =============================================================================

/// Index of a node inside its [`RouteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in pre-order.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Where a navigator key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorKeyBinding {
    /// Type declaring the associated constant.
    pub owner: String,
    /// Name of the associated constant.
    pub field: String,
    /// True when the binding was taken from an ancestor.
    pub inherited: bool,
}

impl NavigatorKeyBinding {
    fn inherit(&self) -> Self {
        Self {
            inherited: true,
            ..self.clone()
        }
    }
}

/// A route contributing a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafRoute {
    /// The template exactly as annotated.
    pub path: String,
    /// Route name handed to the runtime, if any.
    pub name: Option<String>,
    /// Every ancestor leaf's template joined with this one.
    pub pattern: PathPattern,
    /// Navigator the route is pushed onto, own or inherited.
    pub parent_navigator_key: Option<NavigatorKeyBinding>,
}

/// A layout route: no path of its own, optionally its own navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRoute {
    /// Navigator the shell's children render into.
    pub navigator_key: Option<NavigatorKeyBinding>,
    /// Navigator the shell itself is placed on.
    pub parent_navigator_key: Option<NavigatorKeyBinding>,
}

/// The two route kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteKind {
    /// A `go_route` annotation.
    Leaf(LeafRoute),
    /// A `shell_route` annotation.
    Shell(ShellRoute),
}

/// One node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    /// Position in the pre-order arena.
    pub id: NodeId,
    /// `None` for the root.
    pub parent: Option<NodeId>,
    /// Direct children in annotation order.
    pub children: Vec<NodeId>,
    /// The type this route decodes into.
    pub route_data_type: String,
    /// Leaf or shell data.
    pub kind: RouteKind,
    /// Classified constructor parameters.
    pub parameters: ClassifiedParameters,
    /// Instance fields of the route-data type, used when encoding.
    pub fields: Vec<FieldInfo>,
}

impl RouteConfig {
    /// The parent navigator binding, whatever the kind.
    pub const fn parent_navigator_key(&self) -> Option<&NavigatorKeyBinding> {
        match &self.kind {
            RouteKind::Leaf(leaf) => leaf.parent_navigator_key.as_ref(),
            RouteKind::Shell(shell) => shell.parent_navigator_key.as_ref(),
        }
    }

    /// The joined path pattern for leaf routes.
    pub const fn pattern(&self) -> Option<&PathPattern> {
        match &self.kind {
            RouteKind::Leaf(leaf) => Some(&leaf.pattern),
            RouteKind::Shell(_) => None,
        }
    }

    /// Look up an instance field by name.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The validated tree built from one top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTree {
    declaration: String,
    nodes: Vec<RouteConfig>,
}

impl RouteTree {
    /// Build and validate the tree for `declaration`.
    pub fn build<P>(
        declaration: &RouteDeclaration,
        provider: &P,
        config: &GeneratorConfig,
    ) -> Result<Self, RouteGenError>
    where
        P: TypeInfoProvider + ?Sized,
    {
        let annotated = declaration.annotation.type_name();
        if annotated != declaration.type_name {
            return Err(RouteGenError::new(
                ErrorKind::AnnotationTypeMismatch,
                SourceRef::declaration(declaration.type_name.as_str()),
                format!(
                    "The annotation is declared for '{annotated}' but is attached to '{}'.",
                    declaration.type_name
                ),
            ));
        }

        let mut builder = TreeBuilder {
            provider,
            config,
            declaration: &declaration.type_name,
            nodes: Vec::new(),
        };
        builder.build_node(&declaration.annotation, None, "")?;

        Ok(Self {
            declaration: declaration.type_name.clone(),
            nodes: builder.nodes,
        })
    }

    /// Name of the top-level declaration.
    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    /// The root node.
    pub fn root(&self) -> &RouteConfig {
        // build() always pushes the root before returning Ok
        &self.nodes[0]
    }

    /// A node by id.
    pub fn node(&self, id: NodeId) -> &RouteConfig {
        &self.nodes[id.0]
    }

    /// Every node in pre-order.
    pub fn nodes(&self) -> &[RouteConfig] {
        &self.nodes
    }

    /// Children of a node in declaration order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &RouteConfig> {
        self.node(id).children.iter().map(|&child| self.node(child))
    }

    /// Ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &RouteConfig> {
        std::iter::successors(self.node(id).parent.map(|p| self.node(p)), |node| {
            node.parent.map(|p| self.node(p))
        })
    }

    /// Source reference for a node.
    pub fn source_of(&self, id: NodeId) -> SourceRef {
        SourceRef::declaration(self.declaration.as_str())
            .route(self.node(id).route_data_type.as_str())
    }
}

// =============================================================================
// BUILDER
// =============================================================================

struct TreeBuilder<'a, P: ?Sized> {
    provider: &'a P,
    config: &'a GeneratorConfig,
    declaration: &'a str,
    nodes: Vec<RouteConfig>,
}

impl<P> TreeBuilder<'_, P>
where
    P: TypeInfoProvider + ?Sized,
{
    /// Build `annotation` under `parent`, whose joined template is `parent_path`.
    fn build_node(
        &mut self,
        annotation: &RouteAnnotation,
        parent: Option<NodeId>,
        parent_path: &str,
    ) -> Result<NodeId, RouteGenError> {
        let type_name = annotation.type_name();
        let location = SourceRef::declaration(self.declaration).route(type_name);
        let (constructor, fields, static_fields) = describe(self.provider, type_name, &location)?;

        let inherited_key = parent
            .and_then(|p| self.inheritable_key(p))
            .map(NavigatorKeyBinding::inherit);
        let parent_navigator_key = find_navigator_key(
            type_name,
            static_fields,
            &self.config.parent_navigator_key_field,
            self.config,
        )
        .or(inherited_key);

        let parse = |template: &str| {
            PathPattern::parse(template)
                .map_err(|e| RouteGenError::new(ErrorKind::Pattern, location.clone(), e.to_string()))
        };

        // Shells decode against the nearest leaf ancestor's parameters.
        let (kind, joined, decode_pattern) = match annotation {
            RouteAnnotation::GoRoute { path, name, .. } => {
                let Some(path) = path else {
                    return Err(RouteGenError::new(
                        ErrorKind::MissingPath,
                        location.clone(),
                        format!("Route '{type_name}' is a go route but declares no path."),
                    ));
                };
                let joined = join_paths(parent_path, path);
                let pattern = parse(&joined)?;
                let leaf = LeafRoute {
                    path: path.clone(),
                    name: name.clone(),
                    pattern: pattern.clone(),
                    parent_navigator_key,
                };
                (RouteKind::Leaf(leaf), joined, Some(pattern))
            },
            RouteAnnotation::ShellRoute { .. } => {
                let shell = ShellRoute {
                    navigator_key: find_navigator_key(
                        type_name,
                        static_fields,
                        &self.config.navigator_key_field,
                        self.config,
                    ),
                    parent_navigator_key,
                };
                let inherited = if parent_path.is_empty() {
                    None
                } else {
                    Some(parse(parent_path)?)
                };
                (RouteKind::Shell(shell), parent_path.to_string(), inherited)
            },
        };

        let parameters = classify(
            constructor,
            decode_pattern.as_ref(),
            &self.config.payload_field,
            &location,
        )?;

        if let RouteKind::Leaf(leaf) = &kind {
            check_path_bindings(&leaf.pattern, &parameters, &location)?;
        }

        let id = NodeId(self.nodes.len());
        debug!(
            declaration = self.declaration,
            route = type_name,
            node = id.0,
            path = %joined,
            "built route node"
        );
        self.nodes.push(RouteConfig {
            id,
            parent,
            children: Vec::new(),
            route_data_type: type_name.to_string(),
            kind,
            parameters,
            fields: fields.to_vec(),
        });

        for child in annotation.routes() {
            let child_id = self.build_node(child, Some(id), &joined)?;
            self.nodes[id.0].children.push(child_id);
        }

        Ok(id)
    }

    /// The key a child of `parent` inherits when it declares none.
    fn inheritable_key(&self, parent: NodeId) -> Option<&NavigatorKeyBinding> {
        let node = &self.nodes[parent.0];
        match &node.kind {
            RouteKind::Shell(shell) => shell
                .navigator_key
                .as_ref()
                .or(shell.parent_navigator_key.as_ref()),
            RouteKind::Leaf(leaf) => leaf.parent_navigator_key.as_ref(),
        }
    }
}

/// Constructor, instance fields and static fields of a route-data type.
fn describe<'p, P>(
    provider: &'p P,
    type_name: &str,
    location: &SourceRef,
) -> Result<(&'p [ConstructorParam], &'p [FieldInfo], &'p [FieldInfo]), RouteGenError>
where
    P: TypeInfoProvider + ?Sized,
{
    match (
        provider.constructor(type_name),
        provider.instance_fields(type_name),
        provider.static_fields(type_name),
    ) {
        (Some(constructor), Some(fields), Some(static_fields)) => {
            Ok((constructor, fields, static_fields))
        },
        _ if provider.enum_members(type_name).is_some() => Err(RouteGenError::new(
            ErrorKind::UnknownRouteType,
            location.clone(),
            format!("'{type_name}' is an enum and cannot be a route-data type."),
        )),
        _ => Err(unknown_name(
            ErrorKind::UnknownRouteType,
            location.clone(),
            "route type",
            type_name,
            &provider.known_types(),
        )),
    }
}

/// Every parameter of a leaf's joined pattern needs a path constructor parameter.
fn check_path_bindings(
    pattern: &PathPattern,
    parameters: &ClassifiedParameters,
    location: &SourceRef,
) -> Result<(), RouteGenError> {
    for name in pattern.parameter_names() {
        if !parameters.path().any(|p| p.name == name) {
            return Err(RouteGenError::new(
                ErrorKind::MissingParameter,
                location.clone().parameter(name),
                format!(
                    "Path parameter '{name}' of '{}' has no matching constructor parameter.",
                    pattern.template()
                ),
            ));
        }
    }
    Ok(())
}

/// Find an associated constant named `field` whose type is a navigator key.
fn find_navigator_key(
    owner: &str,
    static_fields: &[FieldInfo],
    field: &str,
    config: &GeneratorConfig,
) -> Option<NavigatorKeyBinding> {
    static_fields
        .iter()
        .find(|f| f.name == field && config.is_navigator_key_type(f.ty.simple_name()))
        .map(|f| NavigatorKeyBinding {
            owner: owner.to_string(),
            field: f.name.clone(),
            inherited: false,
        })
}
