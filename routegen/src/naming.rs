//! Canonical lexical forms for emitted names and external strings.
//!
//! Case conversion is `heck`'s: words split on `_`, `-`, whitespace,
//! lower-to-upper transitions and at the end of an acronym
//! (`HTTPServer` -> `http-server`). Digits stay with the word they follow.

use heck::{ToKebabCase, ToShoutySnakeCase, ToSnakeCase};

/// `darkBlue` -> `dark-blue`.
pub fn kebab_case(input: &str) -> String {
    input.to_kebab_case()
}

/// `HomeRoute` -> `home_route`.
pub fn snake_case(input: &str) -> String {
    input.to_snake_case()
}

/// `HomeRoute` -> `HOME_ROUTE`.
pub fn screaming_snake_case(input: &str) -> String {
    input.to_shouty_snake_case()
}

/// Whether `name` is a plain identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
