//! Typed route compiler.
//!
//! `routegen` turns declarative route annotations attached to route-data
//! types into a validated route tree and emits Rust glue for it:
//!
//! - a root getter building the runtime route tree,
//! - per-route `from_state` decoders, `location` builders and navigation
//!   wrappers,
//! - enum codec tables and the small set of shared helpers they reference.
//!
//! The host feeds one [`RouteDeclaration`] at a time together with a
//! [`TypeInfoProvider`] describing constructors and fields:
//!
//! ```
//! use routegen::{Generator, GeneratorConfig, RouteAnnotation, RouteDeclaration, TypeCatalog};
//!
//! let catalog: TypeCatalog = serde_json::from_str(r#"[
//!     {"name": "HomeRoute", "kind": "struct"}
//! ]"#).unwrap();
//!
//! let declaration = RouteDeclaration::new(
//!     "HomeRoute",
//!     RouteAnnotation::go_route("HomeRoute", "/"),
//! );
//!
//! let config = GeneratorConfig::default();
//! let output = Generator::new(&catalog, &config).generate(&declaration).unwrap();
//! assert!(output.text().contains("pub fn home_route()"));
//! ```

pub mod config;
pub mod constants;
pub mod emit;
pub mod errors;
pub mod generator;
pub mod helpers;
pub mod model;
pub mod naming;
pub mod params;
pub mod pattern;
pub mod provider;
pub mod tree;

pub use config::{ConfigError, GeneratorConfig, QueryKeyStyle};
pub use emit::{BlockKind, CodeEmitter, TextBlock};
pub use errors::{ErrorKind, RouteGenError, SourceRef};
pub use generator::{GeneratedOutput, Generator, assemble_library};
pub use helpers::{HelperRegistry, HelperTemplate};
pub use model::{
    ConstructorParam, FieldInfo, RouteAnnotation, RouteDeclaration, TypeInfo, TypeKind, TypeRef,
};
pub use params::{ClassifiedParameters, ParameterInfo, ParameterKind};
pub use pattern::{PathPattern, PatternError, Segment, join_paths};
pub use provider::{TypeCatalog, TypeInfoProvider};
pub use tree::{
    LeafRoute, NavigatorKeyBinding, NodeId, RouteConfig, RouteKind, RouteTree, ShellRoute,
};
