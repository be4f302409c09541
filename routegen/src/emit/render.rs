//! Token stream to formatted source text.

use proc_macro2::TokenStream;

use crate::errors::{ErrorKind, RouteGenError, SourceRef};

/// Parse `tokens` as a sequence of items and pretty-print them.
pub fn render_items(tokens: TokenStream, at: &SourceRef) -> Result<String, RouteGenError> {
    let file: syn::File = syn::parse2(tokens).map_err(|e| {
        RouteGenError::new(
            ErrorKind::Render,
            at.clone(),
            format!("Generated code does not parse as Rust items: {e}"),
        )
    })?;
    Ok(prettyplease::unparse(&file))
}
