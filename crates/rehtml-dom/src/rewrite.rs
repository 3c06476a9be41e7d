//! Top-down tree rewriting.
//!
//! A rewrite function is offered every node, parents before children. When
//! it returns a substitute, the substitute takes the node's place in its
//! parent and the original subtree is not visited any further. Whether the
//! substitute's own children get rewritten is up to the function: it can call
//! [`rewrite`] on them before handing the substitute back.

use std::convert::Infallible;

use crate::node::Node;

/// Apply `f` to `node` and, unless it is replaced, to its descendants.
///
/// Returns the substitute for `node` itself, if `f` produced one. When
/// `node` has a parent the substitute has already been spliced in.
pub fn rewrite<F>(node: &Node, mut f: F) -> Option<Node>
where
    F: FnMut(&Node) -> Option<Node>,
{
    match rewrite_node(node, &mut |n: &Node| Ok::<_, Infallible>(f(n))) {
        Ok(substitute) => substitute,
        Err(never) => match never {},
    }
}

/// Fallible variant of [`rewrite`]. The first error stops the pass; any
/// substitutions made before it stay in place.
pub fn try_rewrite<F, E>(node: &Node, mut f: F) -> Result<Option<Node>, E>
where
    F: FnMut(&Node) -> Result<Option<Node>, E>,
{
    rewrite_node(node, &mut f)
}

fn rewrite_node<F, E>(node: &Node, f: &mut F) -> Result<Option<Node>, E>
where
    F: FnMut(&Node) -> Result<Option<Node>, E>,
{
    if let Some(substitute) = f(node)? {
        if let Some(parent) = node.parent() {
            parent.replace_child(node, substitute.clone());
        }
        return Ok(Some(substitute));
    }

    for child in node.children() {
        rewrite_node(&child, f)?;
    }

    Ok(None)
}
