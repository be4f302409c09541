//! Centralized constants for the routegen crate.
//!
//! Reserved names, default runtime wiring and the identifiers shared between
//! the emitter and the helper catalog live here so both sides agree on them.

// ============================================================================
// RESERVED NAMES
// ============================================================================

/// Constructor parameter carrying the opaque navigation payload.
pub const DEFAULT_PAYLOAD_FIELD: &str = "extra";

/// Associated constant a shell route uses to expose its own navigator key.
pub const DEFAULT_NAVIGATOR_KEY_FIELD: &str = "NAVIGATOR_KEY";

/// Associated constant a route uses to pin itself to an ancestor navigator.
pub const DEFAULT_PARENT_NAVIGATOR_KEY_FIELD: &str = "PARENT_NAVIGATOR_KEY";

/// Type names recognized as navigator-context keys.
pub const DEFAULT_NAVIGATOR_KEY_TYPES: &[&str] = &["NavigatorKey"];

/// Path of the navigation runtime crate the emitted code calls into.
pub const DEFAULT_RUNTIME_PATH: &str = "::route_runtime";

/// Marker that starts a parameter inside a path template.
pub const PARAM_MARKER: char = ':';

// ============================================================================
// EMITTED IDENTIFIERS
// ============================================================================

/// Name of the emitted decode function on every route-data type.
pub const FROM_STATE_FN: &str = "from_state";

/// Suffix of emitted enum codec tables (`COLOR_ENUM_MAP`).
pub const ENUM_MAP_SUFFIX: &str = "_ENUM_MAP";

/// Helper converting an optional query value through a converter.
pub const HELPER_CONVERT_MAP_VALUE: &str = "__route_convert_map_value";

/// Helper parsing `"true"` / `"false"`.
pub const HELPER_BOOL_CONVERTER: &str = "__route_bool_converter";

/// Extension trait doing lookups over an enum codec table.
pub const HELPER_ENUM_CODEC: &str = "__RouteEnumCodec";

/// Navigation wrappers emitted for every leaf route, in emission order.
pub const NAVIGATION_METHODS: &[&str] = &["go", "push", "push_replacement", "replace"];

/// First line of every file written by a host.
pub const GENERATED_HEADER: &str = "// Code generated by routegen. DO NOT EDIT.";
