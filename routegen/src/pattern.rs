//! Path template analysis.
//!
//! A template is a `/`-delimited string where `:name` introduces a parameter,
//! optionally followed by a parenthesized regex constraint (`:id(\d+)`).
//! Parameter names are identifiers and must be unique within one pattern.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::constants::PARAM_MARKER;

// =============================================================================
// ERRORS
// =============================================================================

/// Failure to parse or substitute a path template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// `:` with no name after it.
    #[error("parameter marker at byte {position} of '{template}' is not followed by a name")]
    EmptyParameterName {
        /// The offending template.
        template: String,
        /// Byte offset of the marker.
        position: usize,
    },

    /// A name starting with a digit or other non-identifier character.
    #[error("parameter name '{name}' in '{template}' must start with a letter or '_'")]
    InvalidParameterName {
        /// The offending template.
        template: String,
        /// The rejected name.
        name: String,
    },

    /// `(` without a matching `)`.
    #[error("constraint of parameter '{name}' in '{template}' is not closed")]
    UnclosedConstraint {
        /// The offending template.
        template: String,
        /// Parameter whose constraint is open.
        name: String,
    },

    /// The same name bound twice.
    #[error("parameter '{name}' appears more than once in '{template}'")]
    DuplicateParameter {
        /// The offending template.
        template: String,
        /// The repeated name.
        name: String,
    },

    /// Substitution without a value for some parameter.
    #[error("no value supplied for path parameter '{name}'")]
    MissingParameter {
        /// The unbound parameter.
        name: String,
    },
}

// =============================================================================
// PATTERN
// =============================================================================

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied as-is.
    Literal(String),
    /// A named parameter and its optional regex constraint.
    Parameter {
        /// Name after the marker.
        name: String,
        /// Regex between the parentheses, verbatim.
        constraint: Option<String>,
    },
}

/// A parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    template: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a template, validating parameter syntax and uniqueness.
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut seen = HashSet::new();
        let mut chars = template.char_indices().peekable();

        while let Some((position, c)) = chars.next() {
            if c != PARAM_MARKER {
                literal.push(c);
                continue;
            }

            let mut name = String::new();
            while let Some(&(_, next)) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    name.push(next);
                    chars.next();
                } else {
                    break;
                }
            }

            if name.is_empty() {
                return Err(PatternError::EmptyParameterName {
                    template: template.to_string(),
                    position,
                });
            }
            if name.starts_with(|c: char| c.is_ascii_digit()) {
                return Err(PatternError::InvalidParameterName {
                    template: template.to_string(),
                    name,
                });
            }

            let constraint = if chars.peek().is_some_and(|&(_, next)| next == '(') {
                chars.next();
                Some(read_constraint(&mut chars).ok_or_else(|| {
                    PatternError::UnclosedConstraint {
                        template: template.to_string(),
                        name: name.clone(),
                    }
                })?)
            } else {
                None
            };

            if !seen.insert(name.clone()) {
                return Err(PatternError::DuplicateParameter {
                    template: template.to_string(),
                    name,
                });
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Parameter { name, constraint });
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    /// The template this pattern was parsed from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parsed segments in template order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parameter names in template order.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Parameter { name, .. } => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Whether `name` is a parameter of this pattern.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter_names().contains(&name)
    }

    /// Produce a concrete path from already-encoded parameter values.
    pub fn substitute(&self, values: &HashMap<String, String>) -> Result<String, PatternError> {
        self.render(str::to_string, |name| {
            values
                .get(name)
                .cloned()
                .ok_or_else(|| PatternError::MissingParameter {
                    name: name.to_string(),
                })
        })
    }

    /// Walk the segments, mapping literals and parameters to text.
    ///
    /// Constraints are dropped; they only matter when matching.
    pub fn render<L, P, E>(&self, mut literal: L, mut parameter: P) -> Result<String, E>
    where
        L: FnMut(&str) -> String,
        P: FnMut(&str) -> Result<String, E>,
    {
        let mut out = String::with_capacity(self.template.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(&literal(text)),
                Segment::Parameter { name, .. } => out.push_str(&parameter(name)?),
            }
        }
        Ok(out)
    }
}

/// Read a constraint body up to its closing `)`, honoring `\` escapes and
/// nested groups. The opening `(` is already consumed.
fn read_constraint(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Option<String> {
    let mut body = String::new();
    let mut depth = 0usize;

    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => {
                body.push(c);
                body.push(chars.next()?.1);
            },
            '(' => {
                depth += 1;
                body.push(c);
            },
            ')' if depth == 0 => return Some(body),
            ')' => {
                depth -= 1;
                body.push(c);
            },
            _ => body.push(c),
        }
    }

    None
}

// =============================================================================
// JOINING
// =============================================================================

/// Join a parent template and a child template with exactly one `/`.
///
/// An empty side yields the other; a child made only of slashes yields the
/// parent unchanged.
pub fn join_paths(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        return child.to_string();
    }
    if child.is_empty() {
        return parent.to_string();
    }

    let tail = child.trim_start_matches('/');
    if tail.is_empty() {
        return parent.to_string();
    }

    let head = parent.trim_end_matches('/');
    format!("{head}/{tail}")
}
