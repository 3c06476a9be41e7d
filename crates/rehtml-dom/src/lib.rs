//! rehtml-dom - HTML document tree
//!
//! This crate provides the mutable document tree used by `rehtml`: node
//! construction, child-list mutation, ancestor/descendant queries,
//! serialization back to markup and a generic rewrite pass.
//!
//! # Example
//!
//! ```rust
//! use rehtml_dom::{rewrite, Node};
//!
//! let root = Node::root();
//! let b = Node::element("b");
//! b.add_text("bold");
//! root.append_child(b);
//!
//! rewrite(&root, |node| {
//!     (node.tag_name().as_deref() == Some("b")).then(|| {
//!         let strong = Node::element("strong");
//!         strong.append_children(node.children());
//!         strong
//!     })
//! });
//!
//! assert_eq!(root.outer_html(), "<strong>bold</strong>");
//! ```

mod node;
mod rewrite;
mod serialize;
mod utilities;

pub use node::{Attribute, Node, NodeType};
pub use rewrite::{rewrite, try_rewrite};
pub use serialize::serialize;
pub use utilities::{is_raw_text, is_void, RAW_TEXT_ELEMENTS, VOID_ELEMENTS};
