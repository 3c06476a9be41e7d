//! Mutable document tree.
//!
//! A [`Node`] is a cheap, clonable handle to a shared tree node. Ownership
//! flows strictly downwards: a parent owns its children through its child
//! list, while every node keeps a weak back-reference to its parent that is
//! only used for ancestor queries. Dropping the last handle to a detached
//! node releases its whole subtree.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Node kinds of the document tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Sentinel wrapper with no tag syntax of its own
    Root,
    /// Element with a name, attributes and children
    Element,
    /// Raw text
    Text,
    /// Comment (`<!--text-->`)
    Comment,
    /// Doctype declaration (`<!DOCTYPE text>`)
    Doctype,
}

/// A single `key="value"` pair on an element.
///
/// Keys are not deduplicated and values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug)]
pub(crate) enum NodeData {
    Root,
    Element {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    Text(String),
    Comment(String),
    Doctype(String),
}

#[derive(Debug)]
pub(crate) struct Inner {
    pub(crate) data: NodeData,
    parent: Weak<RefCell<Inner>>,
    pub(crate) children: Vec<Node>,
}

/// Handle to a node in a document tree.
///
/// Cloning a `Node` clones the handle, not the subtree. Two handles are the
/// same node when [`Node::ptr_eq`] returns true.
#[derive(Clone)]
pub struct Node(pub(crate) Rc<RefCell<Inner>>);

impl Node {
    fn new(data: NodeData) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            data,
            parent: Weak::new(),
            children: Vec::new(),
        })))
    }

    /// Create a document root
    pub fn root() -> Self {
        Self::new(NodeData::Root)
    }

    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self::new(NodeData::Element {
            name: tag_name.to_string(),
            attributes: Vec::new(),
            self_closing: false,
        })
    }

    /// Create a new self-closing element node (`<name/>`)
    pub fn element_self_closing(tag_name: &str) -> Self {
        Self::new(NodeData::Element {
            name: tag_name.to_string(),
            attributes: Vec::new(),
            self_closing: true,
        })
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        Self::new(NodeData::Element {
            name: tag_name.to_string(),
            attributes: attrs
                .into_iter()
                .map(|(k, v)| Attribute::new(k, v))
                .collect(),
            self_closing: false,
        })
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::new(NodeData::Text(content.to_string()))
    }

    /// Create a new comment node
    pub fn comment(content: &str) -> Self {
        Self::new(NodeData::Comment(content.to_string()))
    }

    /// Create a new doctype node
    pub fn doctype(content: &str) -> Self {
        Self::new(NodeData::Doctype(content.to_string()))
    }

    pub fn node_type(&self) -> NodeType {
        match self.0.borrow().data {
            NodeData::Root => NodeType::Root,
            NodeData::Element { .. } => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
            NodeData::Doctype(_) => NodeType::Doctype,
        }
    }

    pub fn is_root(&self) -> bool {
        self.node_type() == NodeType::Root
    }

    pub fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type() == NodeType::Text
    }

    /// Whether this element was written as `<name/>`
    pub fn is_self_closing(&self) -> bool {
        matches!(
            self.0.borrow().data,
            NodeData::Element {
                self_closing: true,
                ..
            }
        )
    }

    /// Element name as written, `None` for non-element nodes
    pub fn tag_name(&self) -> Option<String> {
        match &self.0.borrow().data {
            NodeData::Element { name, .. } => Some(name.clone()),
            _ => None,
        }
    }

    /// Payload of a text, comment or doctype node
    pub fn value(&self) -> Option<String> {
        match &self.0.borrow().data {
            NodeData::Text(s) | NodeData::Comment(s) | NodeData::Doctype(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Returns true if both handles point at the same node
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn parent(&self) -> Option<Node> {
        self.0.borrow().parent.upgrade().map(Node)
    }

    /// Snapshot of the child handles, in document order
    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    fn can_have_children(&self) -> bool {
        matches!(
            self.0.borrow().data,
            NodeData::Root | NodeData::Element { .. }
        )
    }

    /// Panics if attaching `child` under `self` would break the tree.
    fn validate_attach(&self, child: &Node) {
        assert!(
            self.can_have_children(),
            "{:?} nodes cannot have children",
            self.node_type()
        );
        assert!(!self.ptr_eq(child), "recursive dom dependencies");

        // Every ancestor of `self` has children, so a childless node cannot
        // be one of them
        if child.0.borrow().children.is_empty() {
            return;
        }

        let mut current = self.parent();
        while let Some(ancestor) = current {
            assert!(!ancestor.ptr_eq(child), "recursive dom dependencies");
            current = ancestor.parent();
        }
    }

    fn set_parent(&self, parent: Option<&Node>) {
        self.0.borrow_mut().parent = match parent {
            Some(p) => Rc::downgrade(&p.0),
            None => Weak::new(),
        };
    }

    /// Remove this node from its parent's child list, if it has one.
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent
                .0
                .borrow_mut()
                .children
                .retain(|c| !c.ptr_eq(self));
        }
        self.set_parent(None);
    }

    /// Append a single child
    ///
    /// # Panics
    ///
    /// Panics if `self` cannot hold children or `child` is `self` or one of
    /// its ancestors.
    pub fn append_child(&self, child: Node) {
        self.validate_attach(&child);
        child.detach();
        child.set_parent(Some(self));
        self.0.borrow_mut().children.push(child);
    }

    /// Append children in order. See [`Node::append_child`] for panics.
    pub fn append_children<I>(&self, children: I)
    where
        I: IntoIterator<Item = Node>,
    {
        for child in children {
            self.append_child(child);
        }
    }

    /// Insert a child before all existing children. See
    /// [`Node::append_child`] for panics.
    pub fn prepend_child(&self, child: Node) {
        self.validate_attach(&child);
        child.detach();
        child.set_parent(Some(self));
        self.0.borrow_mut().children.insert(0, child);
    }

    /// Swap `from` for `to`, keeping its position. Returns false if `from`
    /// is not a child of `self`. See [`Node::append_child`] for panics.
    pub fn replace_child(&self, from: &Node, to: Node) -> bool {
        if self.position_of(from).is_none() {
            return false;
        }
        if from.ptr_eq(&to) {
            return true;
        }
        self.validate_attach(&to);
        to.detach();
        // `to` may have been a sibling, so look `from` up again
        let Some(idx) = self.position_of(from) else {
            return false;
        };
        to.set_parent(Some(self));
        self.0.borrow_mut().children[idx] = to;
        from.set_parent(None);
        true
    }

    /// Detach `child` from `self`. Returns false if it was not a child.
    pub fn remove_child(&self, child: &Node) -> bool {
        if self.position_of(child).is_none() {
            return false;
        }
        child.detach();
        true
    }

    /// Replace the whole child list
    pub fn set_children(&self, children: Vec<Node>) {
        for old in self.children() {
            old.detach();
        }
        self.append_children(children);
    }

    fn position_of(&self, child: &Node) -> Option<usize> {
        self.0.borrow().children.iter().position(|c| c.ptr_eq(child))
    }

    /// All descendant elements named `tag_name` (ASCII case-insensitive),
    /// depth-first in document order. `self` is not included.
    pub fn find_descendants_by_name(&self, tag_name: &str) -> Vec<Node> {
        let mut found = Vec::new();
        self.collect_descendants(tag_name, &mut found);
        found
    }

    fn collect_descendants(&self, tag_name: &str, found: &mut Vec<Node>) {
        for child in self.children() {
            if child.has_name(tag_name) {
                found.push(child.clone());
            }
            child.collect_descendants(tag_name, found);
        }
    }

    /// Nearest ancestor element named `tag_name`
    pub fn find_ancestor_by_name(&self, tag_name: &str) -> Option<Node> {
        let mut current = self.parent();
        while let Some(node) = current {
            if node.has_name(tag_name) {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }

    fn has_name(&self, tag_name: &str) -> bool {
        match &self.0.borrow().data {
            NodeData::Element { name, .. } => name.eq_ignore_ascii_case(tag_name),
            _ => false,
        }
    }

    /// Attributes in insertion order; empty for non-element nodes
    pub fn attributes(&self) -> Vec<Attribute> {
        match &self.0.borrow().data {
            NodeData::Element { attributes, .. } => attributes.clone(),
            _ => Vec::new(),
        }
    }

    /// Has no effect on non-element nodes.
    pub fn set_attributes(&self, attrs: Vec<Attribute>) {
        if let NodeData::Element { attributes, .. } = &mut self.0.borrow_mut().data {
            *attributes = attrs;
        }
    }

    /// Append an attribute. Existing keys are not replaced.
    pub fn add_attr(&self, key: &str, value: &str) {
        if let NodeData::Element { attributes, .. } = &mut self.0.borrow_mut().data {
            attributes.push(Attribute::new(key, value));
        }
    }

    /// Value of the first attribute named `key`
    pub fn attr(&self, key: &str) -> Option<String> {
        match &self.0.borrow().data {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|a| a.key == key)
                .map(|a| a.value.clone()),
            _ => None,
        }
    }

    /// Remove every attribute named `key`
    pub fn remove_attr(&self, key: &str) {
        if let NodeData::Element { attributes, .. } = &mut self.0.borrow_mut().data {
            attributes.retain(|a| a.key != key);
        }
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attr(key).is_some()
    }

    pub fn has_attr_value(&self, key: &str, value: &str) -> bool {
        self.attr(key).is_some_and(|v| v == value)
    }

    pub fn has_attr_value_ignore_case(&self, key: &str, value: &str) -> bool {
        self.attr(key)
            .is_some_and(|v| v.to_lowercase() == value.to_lowercase())
    }

    pub fn add_text(&self, text: &str) {
        self.append_child(Node::text(text));
    }

    pub fn add_comment(&self, text: &str) {
        self.append_child(Node::comment(text));
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        match &self.0.borrow().data {
            NodeData::Text(s) => s.clone(),
            NodeData::Comment(_) | NodeData::Doctype(_) => String::new(),
            NodeData::Root | NodeData::Element { .. } => self
                .0
                .borrow()
                .children
                .iter()
                .map(|c| c.text_content())
                .collect(),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("Node")
            .field("data", &inner.data)
            .field("children", &inner.children)
            .finish()
    }
}
