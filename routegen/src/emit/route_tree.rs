//! Root getter: the runtime route tree as one builder expression.

use proc_macro2::TokenStream;
use quote::quote;

use super::EmitContext;
use super::types::{ident, last_segment, type_path};
use crate::constants::FROM_STATE_FN;
use crate::errors::RouteGenError;
use crate::naming::snake_case;
use crate::provider::TypeInfoProvider;
use crate::tree::{NavigatorKeyBinding, NodeId, RouteKind, RouteTree};

/// `pub fn <declaration>() -> RouteBase`.
pub fn root_getter<P>(tree: &RouteTree, ctx: &EmitContext<'_, P>) -> Result<TokenStream, RouteGenError>
where
    P: TypeInfoProvider + ?Sized,
{
    let rt = ctx.runtime;
    let root = tree.root();
    let at = tree.source_of(root.id);
    let getter = ident(&snake_case(last_segment(tree.declaration())), &at)?;
    let body = node_expr(tree, root.id, ctx)?;

    Ok(quote! {
        pub fn #getter() -> #rt::RouteBase {
            #body
        }
    })
}

fn node_expr<P>(
    tree: &RouteTree,
    id: NodeId,
    ctx: &EmitContext<'_, P>,
) -> Result<TokenStream, RouteGenError>
where
    P: TypeInfoProvider + ?Sized,
{
    let rt = ctx.runtime;
    let node = tree.node(id);
    let at = tree.source_of(id);
    let ty = type_path(&node.route_data_type, &at)?;
    let factory = ident(FROM_STATE_FN, &at)?;

    let mut expr = match &node.kind {
        RouteKind::Leaf(leaf) => {
            let path = &leaf.path;
            let mut expr = quote!(#rt::GoRoute::new(#path, #ty::#factory));
            if let Some(name) = &leaf.name {
                expr = quote!(#expr.name(#name));
            }
            if let Some(key) = own_key(leaf.parent_navigator_key.as_ref(), tree, id)? {
                expr = quote!(#expr.parent_navigator_key(#key));
            }
            expr
        },
        RouteKind::Shell(shell) => {
            let mut expr = quote!(#rt::ShellRoute::new(#ty::#factory));
            if let Some(key) = own_key(shell.navigator_key.as_ref(), tree, id)? {
                expr = quote!(#expr.navigator_key(#key));
            }
            if let Some(key) = own_key(shell.parent_navigator_key.as_ref(), tree, id)? {
                expr = quote!(#expr.parent_navigator_key(#key));
            }
            expr
        },
    };

    if !node.children.is_empty() {
        let children = node
            .children
            .iter()
            .map(|&child| node_expr(tree, child, ctx))
            .collect::<Result<Vec<_>, _>>()?;
        expr = quote!(#expr.routes(::std::vec![#(#children),*]));
    }

    Ok(quote!(#expr.into()))
}

/// `Owner::FIELD` for bindings declared on the node itself.
fn own_key(
    binding: Option<&NavigatorKeyBinding>,
    tree: &RouteTree,
    id: NodeId,
) -> Result<Option<TokenStream>, RouteGenError> {
    let Some(binding) = binding.filter(|b| !b.inherited) else {
        return Ok(None);
    };
    let at = tree.source_of(id).parameter(binding.field.as_str());
    let owner = type_path(&binding.owner, &at)?;
    let field = ident(&binding.field, &at)?;
    Ok(Some(quote!(#owner::#field)))
}
