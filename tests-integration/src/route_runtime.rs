//! In-memory navigation runtime with the surface generated code calls into.
//!
//! [`RouteBase::decode`] plays the router: it walks the tree, joins templates,
//! matches a location and runs the factory of the deepest matching route.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Decoded parameters of the location being navigated to.
pub trait NavigationState {
    /// Value bound to `:name` in the matched template.
    fn path_parameter(&self, name: &str) -> Option<&str>;
    /// First value of each query key.
    fn query_parameters(&self) -> &HashMap<String, String>;
    /// Every value of each query key, in order.
    fn query_parameters_all(&self) -> &HashMap<String, Vec<String>>;
    /// Payload passed alongside the location.
    fn extra(&self) -> Option<&dyn Any>;
}

/// Why a state could not be decoded into route data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A required value is absent.
    Missing(String),
    /// A value is present but does not convert.
    Invalid {
        /// Path or query key.
        key: String,
        /// The raw text.
        raw: String,
    },
}

impl DecodeError {
    /// `key` has no value.
    pub fn missing(key: &str) -> Self {
        Self::Missing(key.to_string())
    }

    /// `raw` under `key` does not convert.
    pub fn invalid(key: &str, raw: &str) -> Self {
        Self::Invalid {
            key: key.to_string(),
            raw: raw.to_string(),
        }
    }
}

/// The four navigation primitives.
pub trait Navigator {
    /// Replace the whole stack.
    fn go(&self, location: &str, extra: Option<&dyn Any>);
    /// Push on top of the stack.
    fn push(&self, location: &str, extra: Option<&dyn Any>);
    /// Replace the top entry with a fresh page.
    fn push_replacement(&self, location: &str, extra: Option<&dyn Any>);
    /// Replace the top entry, keeping its page.
    fn replace(&self, location: &str, extra: Option<&dyn Any>);
}

/// Identifies a navigator a shell renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorKey(pub &'static str);

type Factory = Box<dyn Fn(&dyn NavigationState) -> Result<Box<dyn Any>, DecodeError>>;

fn factory<T, F>(decode: F) -> Factory
where
    T: Any,
    F: Fn(&dyn NavigationState) -> Result<T, DecodeError> + 'static,
{
    Box::new(move |state: &dyn NavigationState| {
        decode(state).map(|value| Box::new(value) as Box<dyn Any>)
    })
}

/// A navigable route.
pub struct GoRoute {
    /// Template as declared, relative to the parent.
    pub path: String,
    /// Route name.
    pub name: Option<String>,
    /// Navigator the route is pinned to.
    pub parent_navigator_key: Option<NavigatorKey>,
    /// Nested routes.
    pub routes: Vec<RouteBase>,
    factory: Factory,
}

impl GoRoute {
    /// A route decoding states with `decode`.
    pub fn new<T, F>(path: &str, decode: F) -> Self
    where
        T: Any,
        F: Fn(&dyn NavigationState) -> Result<T, DecodeError> + 'static,
    {
        Self {
            path: path.to_string(),
            name: None,
            parent_navigator_key: None,
            routes: Vec::new(),
            factory: factory(decode),
        }
    }

    /// Set the route name.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Pin to an ancestor navigator.
    #[must_use]
    pub const fn parent_navigator_key(mut self, key: NavigatorKey) -> Self {
        self.parent_navigator_key = Some(key);
        self
    }

    /// Attach nested routes.
    #[must_use]
    pub fn routes(mut self, routes: Vec<RouteBase>) -> Self {
        self.routes = routes;
        self
    }
}

/// A layout grouping routes under a navigator.
pub struct ShellRoute {
    /// Navigator the children render into.
    pub navigator_key: Option<NavigatorKey>,
    /// Navigator the shell is placed on.
    pub parent_navigator_key: Option<NavigatorKey>,
    /// Nested routes.
    pub routes: Vec<RouteBase>,
    factory: Factory,
}

impl ShellRoute {
    /// A shell decoding states with `decode`.
    pub fn new<T, F>(decode: F) -> Self
    where
        T: Any,
        F: Fn(&dyn NavigationState) -> Result<T, DecodeError> + 'static,
    {
        Self {
            navigator_key: None,
            parent_navigator_key: None,
            routes: Vec::new(),
            factory: factory(decode),
        }
    }

    /// Set the navigator children render into.
    #[must_use]
    pub const fn navigator_key(mut self, key: NavigatorKey) -> Self {
        self.navigator_key = Some(key);
        self
    }

    /// Pin to an ancestor navigator.
    #[must_use]
    pub const fn parent_navigator_key(mut self, key: NavigatorKey) -> Self {
        self.parent_navigator_key = Some(key);
        self
    }

    /// Attach nested routes.
    #[must_use]
    pub fn routes(mut self, routes: Vec<RouteBase>) -> Self {
        self.routes = routes;
        self
    }

    /// Run the shell's own factory.
    pub fn build(&self, state: &dyn NavigationState) -> Result<Box<dyn Any>, DecodeError> {
        (self.factory)(state)
    }
}

/// Either route kind.
pub enum RouteBase {
    /// A navigable route.
    Go(GoRoute),
    /// A layout route.
    Shell(ShellRoute),
}

impl From<GoRoute> for RouteBase {
    fn from(route: GoRoute) -> Self {
        Self::Go(route)
    }
}

impl From<ShellRoute> for RouteBase {
    fn from(route: ShellRoute) -> Self {
        Self::Shell(route)
    }
}

impl RouteBase {
    /// Decode `location` with the deepest route whose joined template matches.
    ///
    /// `None` when no route matches.
    pub fn decode(
        &self,
        location: &str,
        extra: Option<Box<dyn Any>>,
    ) -> Option<Result<Box<dyn Any>, DecodeError>> {
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        let (route, params) = self.find(path, "")?;
        let state = LocationState::new(params, query, extra);
        Some((route.factory)(&state))
    }

    fn find(&self, path: &str, parent: &str) -> Option<(&GoRoute, HashMap<String, String>)> {
        match self {
            Self::Go(route) => {
                let joined = join(parent, &route.path);
                route
                    .routes
                    .iter()
                    .find_map(|child| child.find(path, &joined))
                    .or_else(|| match_template(&joined, path).map(|params| (route, params)))
            },
            Self::Shell(shell) => shell.routes.iter().find_map(|child| child.find(path, parent)),
        }
    }
}

fn join(parent: &str, child: &str) -> String {
    if child.starts_with('/') || parent.is_empty() {
        format!("/{}", child.trim_start_matches('/'))
    } else {
        format!("{}/{child}", parent.trim_end_matches('/'))
    }
}

fn match_template(template: &str, path: &str) -> Option<HashMap<String, String>> {
    let expected: Vec<&str> = template.split('/').collect();
    let actual: Vec<&str> = path.split('/').collect();
    if expected.len() != actual.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (want, got) in expected.into_iter().zip(actual) {
        match want.strip_prefix(':') {
            Some(name) if !got.is_empty() => {
                params.insert(name.to_string(), decode_component(got)?);
            },
            Some(_) => return None,
            None if want == got => {},
            None => return None,
        }
    }
    Some(params)
}

/// State built from a matched location.
pub struct LocationState {
    path: HashMap<String, String>,
    query: HashMap<String, String>,
    query_all: HashMap<String, Vec<String>>,
    extra: Option<Box<dyn Any>>,
}

impl LocationState {
    fn new(path: HashMap<String, String>, query: &str, extra: Option<Box<dyn Any>>) -> Self {
        let mut first = HashMap::new();
        let mut all: HashMap<String, Vec<String>> = HashMap::new();
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let (Some(key), Some(value)) = (decode_component(key), decode_component(value)) else {
                continue;
            };
            first.entry(key.clone()).or_insert_with(|| value.clone());
            all.entry(key).or_default().push(value);
        }
        Self {
            path,
            query: first,
            query_all: all,
            extra,
        }
    }
}

impl NavigationState for LocationState {
    fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path.get(name).map(String::as_str)
    }

    fn query_parameters(&self) -> &HashMap<String, String> {
        &self.query
    }

    fn query_parameters_all(&self) -> &HashMap<String, Vec<String>> {
        &self.query_all
    }

    fn extra(&self) -> Option<&dyn Any> {
        self.extra.as_deref()
    }
}

/// Percent-encode everything but unreserved characters.
pub fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

fn decode_component(value: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(value.len());
    let mut rest = value.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        if byte == b'%' {
            let hex = tail.get(..2)?;
            let hex = std::str::from_utf8(hex).ok()?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
            rest = tail.get(2..)?;
        } else {
            bytes.push(byte);
            rest = tail;
        }
    }
    String::from_utf8(bytes).ok()
}

/// `path` followed by the encoded query, if any.
pub fn location(path: &str, query: &[(&str, String)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let query: Vec<String> = query
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect();
    format!("{path}?{}", query.join("&"))
}
