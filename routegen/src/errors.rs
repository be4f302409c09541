//! Structured, location-attributed generation errors.
//!
//! Every validation failure becomes a [`RouteGenError`]: an [`ErrorKind`], a
//! human-readable message and a [`SourceRef`] the host maps back to source.
//! There are no warnings; any error aborts the current declaration.

use std::fmt;

use thiserror::Error;

// =============================================================================
// ERROR KINDS
// =============================================================================

/// Category of a generation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed path template.
    Pattern,
    /// Substitution or encoding referenced a parameter with no binding.
    MissingParameter,
    /// A leaf route annotation has no `path`.
    MissingPath,
    /// The annotation's type argument differs from the annotated type.
    AnnotationTypeMismatch,
    /// A required path parameter has a nullable type.
    NullablePathParameter,
    /// A query parameter is both nullable and defaulted.
    NullableDefaultValue,
    /// No field on the route-data type backs a parameter being encoded.
    UnresolvedField,
    /// A constructor parameter is neither positional nor named.
    MalformedParameterRole,
    /// The annotation names a type the provider does not describe.
    UnknownRouteType,
    /// A parameter type cannot be carried in a path or query string.
    UnsupportedParameterType,
    /// A default value literal is not a valid expression.
    InvalidDefaultValue,
    /// A name cannot be used as an identifier in emitted code.
    InvalidIdentifier,
    /// Emitted tokens failed to re-parse.
    Render,
}

impl ErrorKind {
    /// Stable name used in diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pattern => "PatternError",
            Self::MissingParameter => "MissingParameterError",
            Self::MissingPath => "MissingPathError",
            Self::AnnotationTypeMismatch => "AnnotationTypeMismatchError",
            Self::NullablePathParameter => "NullablePathParameterError",
            Self::NullableDefaultValue => "NullableDefaultValueError",
            Self::UnresolvedField => "UnresolvedFieldError",
            Self::MalformedParameterRole => "MalformedParameterRoleError",
            Self::UnknownRouteType => "UnknownRouteTypeError",
            Self::UnsupportedParameterType => "UnsupportedParameterTypeError",
            Self::InvalidDefaultValue => "InvalidDefaultValueError",
            Self::InvalidIdentifier => "InvalidIdentifierError",
            Self::Render => "RenderError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SOURCE ATTRIBUTION
// =============================================================================

/// Points at the declaration, route type and parameter an error is about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRef {
    /// Top-level annotated type being generated.
    pub declaration: String,
    /// Route-data type of the offending node, when it differs or is known.
    pub route_type: Option<String>,
    /// Offending constructor parameter or field.
    pub parameter: Option<String>,
}

impl SourceRef {
    /// Reference to a whole declaration.
    pub fn declaration(name: impl Into<String>) -> Self {
        Self {
            declaration: name.into(),
            route_type: None,
            parameter: None,
        }
    }

    /// Narrow to one route-data type inside the declaration.
    #[must_use]
    pub fn route(mut self, route_type: impl Into<String>) -> Self {
        self.route_type = Some(route_type.into());
        self
    }

    /// Narrow to one parameter of the route-data type.
    #[must_use]
    pub fn parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.declaration)?;
        if let Some(route) = &self.route_type
            && route != &self.declaration
        {
            write!(f, " > {route}")?;
        }
        if let Some(parameter) = &self.parameter {
            write!(f, ".{parameter}")?;
        }
        Ok(())
    }
}

// =============================================================================
// ERROR
// =============================================================================

/// A fatal validation failure for one top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message} (at {location})")]
pub struct RouteGenError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Human-readable explanation.
    pub message: String,
    /// Where it went wrong.
    pub location: SourceRef,
}

impl RouteGenError {
    /// Build an error of the given kind.
    pub fn new(kind: ErrorKind, location: SourceRef, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }
}

// =============================================================================
// FUZZY MATCHING ("DID YOU MEAN?")
// =============================================================================

/// Calculate the Levenshtein edit distance between two strings.
/// Used for "did you mean?" suggestions.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev_row: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr_row = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_chars.len()]
}

/// Find the most similar option to the given input.
/// Returns `Some(suggestion)` if a close match is found (within threshold).
pub fn find_similar<'a>(input: &str, options: &[&'a str]) -> Option<&'a str> {
    if options.is_empty() {
        return None;
    }

    // Threshold: allow ~40% of chars to be wrong, minimum 2, maximum 4
    let threshold = (input.len() / 2).clamp(2, 4);

    options
        .iter()
        .map(|opt| (*opt, levenshtein_distance(input, opt)))
        .filter(|(_, dist)| *dist <= threshold && *dist > 0)
        .min_by_key(|(_, dist)| *dist)
        .map(|(opt, _)| opt)
}

/// Format a "did you mean?" suggestion if a similar option exists.
#[allow(clippy::option_if_let_else)] // match is more readable here
pub fn did_you_mean(input: &str, options: &[&str]) -> String {
    match find_similar(input, options) {
        Some(suggestion) => format!(" Did you mean '{suggestion}'?"),
        None => String::new(),
    }
}

/// Build an error for a name that matched none of the valid options.
pub fn unknown_name(
    kind: ErrorKind,
    location: SourceRef,
    what: &str,
    got: &str,
    valid: &[&str],
) -> RouteGenError {
    let suggestion = did_you_mean(got, valid);
    RouteGenError::new(kind, location, format!("Unknown {what} '{got}'.{suggestion}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Levenshtein Distance Tests
    // =========================================================================

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein_distance("route", "route"), 0);
    }

    #[test]
    fn test_levenshtein_case_insensitive() {
        assert_eq!(levenshtein_distance("HomeRoute", "homeroute"), 0);
    }

    #[test]
    fn test_levenshtein_one_char_diff() {
        assert_eq!(levenshtein_distance("fid", "fud"), 1); // substitution
        assert_eq!(levenshtein_distance("fid", "fids"), 1); // insertion
        assert_eq!(levenshtein_distance("fids", "fid"), 1); // deletion
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein_distance("", "hello"), 5);
        assert_eq!(levenshtein_distance("hello", ""), 5);
        assert_eq!(levenshtein_distance("", ""), 0);
    }

    // =========================================================================
    // Find Similar Tests
    // =========================================================================

    #[test]
    fn test_find_similar_exact_match_returns_none() {
        assert_eq!(find_similar("HomeRoute", &["HomeRoute"]), None);
    }

    #[test]
    fn test_find_similar_close_typo() {
        assert_eq!(
            find_similar("FamilyRoot", &["HomeRoute", "FamilyRoute"]),
            Some("FamilyRoute")
        );
    }

    #[test]
    fn test_find_similar_no_match_too_different() {
        assert_eq!(find_similar("Settings", &["HomeRoute", "FamilyRoute"]), None);
    }

    #[test]
    fn test_find_similar_empty_options() {
        assert_eq!(find_similar("test", &[]), None);
    }

    // =========================================================================
    // Error Formatting Tests
    // =========================================================================

    #[test]
    fn test_source_ref_display() {
        let location = SourceRef::declaration("HomeRoute")
            .route("FamilyRoute")
            .parameter("fid");
        assert_eq!(location.to_string(), "HomeRoute > FamilyRoute.fid");

        let location = SourceRef::declaration("HomeRoute").route("HomeRoute");
        assert_eq!(location.to_string(), "HomeRoute");
    }

    #[test]
    fn test_error_display_includes_kind_and_location() {
        let err = RouteGenError::new(
            ErrorKind::MissingPath,
            SourceRef::declaration("HomeRoute"),
            "route has no path",
        );
        let msg = err.to_string();
        assert!(msg.starts_with("MissingPathError"));
        assert!(msg.contains("route has no path"));
        assert!(msg.contains("HomeRoute"));
    }

    #[test]
    fn test_unknown_name_with_suggestion() {
        let err = unknown_name(
            ErrorKind::UnknownRouteType,
            SourceRef::declaration("HomeRoute"),
            "route type",
            "FamilyRoot",
            &["HomeRoute", "FamilyRoute"],
        );
        assert_eq!(err.kind, ErrorKind::UnknownRouteType);
        assert!(err.message.contains("Did you mean 'FamilyRoute'?"));
    }

    #[test]
    fn test_did_you_mean_helper() {
        assert_eq!(did_you_mean("fidd", &["fid", "pid"]), " Did you mean 'fid'?");
        assert_eq!(did_you_mean("xyz", &["HomeRoute"]), "");
    }
}
