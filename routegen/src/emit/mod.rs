//! Code emission.
//!
//! [`CodeEmitter::emit`] walks a [`RouteTree`] and produces an ordered list of
//! [`TextBlock`]s:
//!
//! 1. the root getter,
//! 2. for every node in pre-order, its `impl` block (decode, and for leaves
//!    `location` plus the navigation wrappers),
//! 3. right after that block, the codec tables of enums the node is the first
//!    to reference.
//!
//! Shared helpers are not emitted here; see [`HelperRegistry`](crate::HelperRegistry).

mod decode;
mod enum_codec;
mod location;
mod render;
mod route_tree;
mod types;

use std::collections::HashMap;

use proc_macro2::TokenStream;
use quote::quote;
use tracing::debug;

use crate::config::{ConfigError, GeneratorConfig};
use crate::errors::{ErrorKind, RouteGenError, SourceRef};
use crate::provider::TypeInfoProvider;
use crate::tree::{RouteKind, RouteTree};

pub(crate) use render::render_items;

// =============================================================================
// TEXT BLOCKS
// =============================================================================

/// What a block of emitted text declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    /// The root getter of one declaration.
    RouteTree,
    /// The `impl` block of one route-data type.
    RouteData,
    /// One enum codec table.
    EnumCodec,
    /// One shared helper.
    Helper,
}

/// A unit of emitted, formatted source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextBlock {
    /// What the block declares.
    pub kind: BlockKind,
    /// Name of the declared thing: type, enum or helper.
    pub key: String,
    /// Formatted source, newline-terminated.
    pub text: String,
}

impl TextBlock {
    /// A block of the given kind.
    pub fn new(kind: BlockKind, key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            text: text.into(),
        }
    }
}

// =============================================================================
// EMITTER
// =============================================================================

/// Shared inputs of the per-part emitters.
pub(crate) struct EmitContext<'a, P: ?Sized> {
    pub provider: &'a P,
    pub config: &'a GeneratorConfig,
    pub runtime: &'a syn::Path,
}

/// Renders a validated tree into text blocks.
pub struct CodeEmitter<'a, P: ?Sized> {
    provider: &'a P,
    config: &'a GeneratorConfig,
    runtime: syn::Path,
}

impl<'a, P> CodeEmitter<'a, P>
where
    P: TypeInfoProvider + ?Sized,
{
    /// Fails only when the configured runtime path does not parse.
    pub fn new(provider: &'a P, config: &'a GeneratorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            provider,
            config,
            runtime: config.runtime()?,
        })
    }

    /// The runtime crate path emitted code calls into.
    pub const fn runtime(&self) -> &syn::Path {
        &self.runtime
    }

    /// Emit every block of `tree`, in order.
    pub fn emit(&self, tree: &RouteTree) -> Result<Vec<TextBlock>, RouteGenError> {
        let ctx = EmitContext {
            provider: self.provider,
            config: self.config,
            runtime: &self.runtime,
        };

        let mut blocks = Vec::with_capacity(tree.nodes().len() + 1);
        let declaration_at = SourceRef::declaration(tree.declaration());
        let getter = route_tree::root_getter(tree, &ctx)?;
        blocks.push(TextBlock::new(
            BlockKind::RouteTree,
            tree.declaration(),
            render_items(getter, &declaration_at)?,
        ));

        // table name -> enum type
        let mut emitted_enums: HashMap<String, String> = HashMap::new();
        for node in tree.nodes() {
            let at = tree.source_of(node.id);
            let ty = types::type_path(&node.route_data_type, &at)?;
            let from_state = decode::from_state_fn(node, &ctx, &at)?;
            let leaf_methods = match &node.kind {
                RouteKind::Leaf(leaf) => location::leaf_methods(node, leaf, &ctx, &at)?,
                RouteKind::Shell(_) => TokenStream::new(),
            };
            let tokens = quote! {
                impl #ty {
                    #from_state
                    #leaf_methods
                }
            };
            blocks.push(TextBlock::new(
                BlockKind::RouteData,
                node.route_data_type.as_str(),
                render_items(tokens, &at)?,
            ));
            debug!(route = %node.route_data_type, "emitted route block");

            for enum_type in enum_codec::referenced_enums(node, self.provider) {
                let table_name = types::enum_table_ident(&enum_type, &at)?.to_string();
                match emitted_enums.get(&table_name) {
                    Some(owner) if *owner == enum_type => continue,
                    Some(owner) => {
                        return Err(RouteGenError::new(
                            ErrorKind::UnsupportedParameterType,
                            at,
                            format!(
                                "Enums '{owner}' and '{enum_type}' would both emit the codec table '{table_name}'."
                            ),
                        ));
                    },
                    None => {
                        emitted_enums.insert(table_name, enum_type.clone());
                    },
                }
                let members = self.provider.enum_members(&enum_type).unwrap_or_default();
                let table = enum_codec::enum_table(&enum_type, members, &at)?;
                blocks.push(TextBlock::new(
                    BlockKind::EnumCodec,
                    enum_type.as_str(),
                    render_items(table, &at)?,
                ));
                debug!(route = %node.route_data_type, enum_type = %enum_type, "emitted enum codec");
            }
        }

        Ok(blocks)
    }
}
