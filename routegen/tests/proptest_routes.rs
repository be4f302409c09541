//! Property-based tests for path templates and naming using proptest.

use std::collections::HashMap;

use proptest::prelude::*;
use routegen::naming::{kebab_case, snake_case};
use routegen::{PathPattern, join_paths};

// =============================================================================
// Templates
// =============================================================================

proptest! {
    /// Substituting every parameter leaves a path with no parameters left.
    #[test]
    fn substitution_is_complete(
        lead in "[a-z]{1,8}",
        first in "[a-z_][a-z0-9_]{0,6}",
        second in "[a-z_][a-z0-9_]{0,6}",
        first_value in "[a-zA-Z0-9%._~-]{1,12}",
        second_value in "[a-zA-Z0-9%._~-]{1,12}",
    ) {
        prop_assume!(first != second);
        let template = format!("/{lead}/:{first}/x/:{second}");
        let pattern = PathPattern::parse(&template).unwrap();

        let values: HashMap<String, String> = [
            (first.clone(), first_value.clone()),
            (second.clone(), second_value.clone()),
        ]
        .into_iter()
        .collect();
        let path = pattern.substitute(&values).unwrap();

        prop_assert_eq!(&path, &format!("/{lead}/{first_value}/x/{second_value}"));
        let reparsed = PathPattern::parse(&path).unwrap();
        prop_assert!(reparsed.parameter_names().is_empty());
        prop_assert_eq!(reparsed.substitute(&HashMap::new()).unwrap(), path);
    }

    /// Parameter names come back in template order.
    #[test]
    fn parameter_names_in_order(
        names in proptest::collection::hash_set("[a-z][a-z0-9_]{0,6}", 1..5)
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let template: String = names.iter().map(|n| format!("/:{n}")).collect();
        let pattern = PathPattern::parse(&template).unwrap();
        let parsed: Vec<&str> = pattern.parameter_names();
        let expected: Vec<&str> = names.iter().map(String::as_str).collect();
        prop_assert_eq!(parsed, expected);
    }

    /// A repeated name never parses.
    #[test]
    fn duplicate_names_rejected(name in "[a-z][a-z0-9_]{0,6}", gap in "[a-z]{0,6}") {
        let template = format!("/:{name}/{gap}/:{name}");
        prop_assert!(PathPattern::parse(&template).is_err());
    }
}

// =============================================================================
// Joining
// =============================================================================

proptest! {
    /// Exactly one slash separates the two sides.
    #[test]
    fn join_has_single_separator(
        parent in "/[a-z]{1,6}(/[a-z]{1,6}){0,2}",
        parent_slash in proptest::bool::ANY,
        child in "[a-z:]{1,6}(/[a-z]{1,6}){0,2}",
        child_slash in proptest::bool::ANY,
    ) {
        let parent_text = if parent_slash { format!("{parent}/") } else { parent.clone() };
        let child_text = if child_slash { format!("/{child}") } else { child.clone() };

        let joined = join_paths(&parent_text, &child_text);
        prop_assert_eq!(&joined, &format!("{parent}/{child}"));
        prop_assert!(!joined.contains("//"));
    }

    /// Joining three levels is the same as joining left to right.
    #[test]
    fn join_is_associative(
        a in "/[a-z]{1,6}",
        b in "[a-z]{1,6}",
        c in "[a-z]{1,6}",
    ) {
        let left = join_paths(&join_paths(&a, &b), &c);
        let right = join_paths(&a, &join_paths(&b, &c));
        prop_assert_eq!(left, right);
    }

    /// Empty sides are identities.
    #[test]
    fn join_empty_identity(path in "/?[a-z]{1,6}(/[a-z]{1,6}){0,2}") {
        prop_assert_eq!(join_paths("", &path), path.clone());
        prop_assert_eq!(join_paths(&path, ""), path);
    }
}

// =============================================================================
// Naming
// =============================================================================

proptest! {
    /// Kebab names are lowercase with no stray separators.
    #[test]
    fn kebab_shape(input in "[A-Za-z][A-Za-z0-9]{0,15}") {
        let kebab = kebab_case(&input);
        prop_assert!(!kebab.is_empty());
        prop_assert!(!kebab.starts_with('-') && !kebab.ends_with('-'));
        prop_assert!(!kebab.contains("--"));
        prop_assert_eq!(kebab.to_lowercase(), kebab.clone());
        prop_assert_eq!(kebab.replace('-', ""), input.to_lowercase());
    }

    /// Snake and kebab forms split on the same boundaries.
    #[test]
    fn snake_matches_kebab(input in "[A-Za-z][A-Za-z0-9]{0,15}") {
        prop_assert_eq!(snake_case(&input).replace('_', "-"), kebab_case(&input));
    }
}
