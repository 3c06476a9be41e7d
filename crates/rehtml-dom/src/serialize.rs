//! HTML serialization
//!
//! Converts a document tree back into markup text. Attribute values and text
//! are written verbatim; nothing is escaped.

use std::fmt;

use crate::node::{Node, NodeData};
use crate::utilities::is_void;

/// Serialize a tree to an HTML string
pub fn serialize(node: &Node) -> String {
    let mut output = String::with_capacity(256);
    serialize_node(node, &mut output);
    output
}

fn serialize_node(node: &Node, out: &mut String) {
    let inner = node.0.borrow();
    match &inner.data {
        NodeData::Root => serialize_children(&inner.children, out),

        NodeData::Element {
            name,
            attributes,
            self_closing,
        } => {
            out.push('<');
            out.push_str(name);
            for attr in attributes {
                out.push(' ');
                out.push_str(&attr.key);
                if !attr.value.is_empty() {
                    out.push_str("=\"");
                    out.push_str(&attr.value);
                    out.push('"');
                }
            }

            // Self-closing elements drop their children
            if *self_closing {
                out.push_str("/>");
                return;
            }
            out.push('>');

            serialize_children(&inner.children, out);
            // Void elements never get a close tag, even with children attached
            if !is_void(name) {
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }

        NodeData::Text(text) => out.push_str(text),

        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }

        NodeData::Doctype(text) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(text);
            out.push('>');
        }
    }
}

fn serialize_children(children: &[Node], out: &mut String) {
    for child in children {
        serialize_node(child, out);
    }
}

impl Node {
    /// Append this node's markup to `out`
    pub fn write_html(&self, out: &mut String) {
        serialize_node(self, out);
    }

    /// Markup of this node including its own tags
    pub fn outer_html(&self) -> String {
        serialize(self)
    }

    /// Markup of this node's children
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        serialize_children(&self.0.borrow().children, &mut out);
        out
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.outer_html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_renders_only_children() {
        let root = Node::root();
        root.append_children([Node::doctype("html"), Node::text("Hi"), Node::comment(" c ")]);
        assert_eq!(serialize(&root), "<!DOCTYPE html>Hi<!-- c -->");
    }

    #[test]
    fn test_outer_html() {
        let a = Node::element_with_attrs("a", vec![("href", "https://example.com")]);
        a.add_text("Link");

        assert_eq!(a.outer_html(), "<a href=\"https://example.com\">Link</a>");
        assert_eq!(a.inner_html(), "Link");
        assert_eq!(a.to_string(), a.outer_html());
    }

    #[test]
    fn test_empty_attribute_is_bare() {
        let script = Node::element_with_attrs("script", vec![("async", ""), ("src", "v0.js")]);
        assert_eq!(script.outer_html(), "<script async src=\"v0.js\"></script>");
    }

    #[test]
    fn test_values_are_not_escaped() {
        let img = Node::element_with_attrs("img", vec![("alt", "a \"b\" & <c>")]);
        assert_eq!(img.outer_html(), "<img alt=\"a \"b\" & <c>\">");

        let p = Node::element("p");
        p.add_text("1 < 2 & 3");
        assert_eq!(p.outer_html(), "<p>1 < 2 & 3</p>");
    }

    #[test]
    fn test_empty_element_gets_close_tag() {
        assert_eq!(Node::element("div").outer_html(), "<div></div>");
    }

    #[test]
    fn test_void_element_html() {
        assert_eq!(Node::element("br").outer_html(), "<br>");

        let img = Node::element_with_attrs("img", vec![("src", "test.png"), ("alt", "Test")]);
        assert_eq!(img.outer_html(), "<img src=\"test.png\" alt=\"Test\">");
    }

    #[test]
    fn test_void_element_with_children_has_no_close_tag() {
        let br = Node::element("br");
        br.add_text("x");
        assert_eq!(br.outer_html(), "<br>x");
    }

    #[test]
    fn test_self_closing_drops_children() {
        let img = Node::element_self_closing("img");
        img.add_attr("src", "a.png");
        assert_eq!(img.outer_html(), "<img src=\"a.png\"/>");

        let custom = Node::element_self_closing("widget");
        custom.add_text("ignored");
        assert_eq!(custom.outer_html(), "<widget/>");
    }

    #[test]
    fn test_document() {
        let root = Node::root();
        root.append_child(Node::doctype("html"));
        let html = Node::element("html");
        html.add_attr("amp", "");
        html.add_attr("lang", "en");
        root.append_child(html.clone());

        let head = Node::element("head");
        html.append_child(head.clone());
        let meta = Node::element("meta");
        meta.add_attr("charset", "utf-8");
        head.append_child(meta);
        let title = Node::element("title");
        title.add_text("Hello");
        head.append_child(title);
        let noscript = Node::element("noscript");
        let style = Node::element("style");
        style.add_attr("amp-boilerplate", "");
        style.add_text("body{animation:none}");
        noscript.append_child(style);
        head.append_child(noscript);

        let body = Node::element("body");
        let h1 = Node::element("h1");
        h1.add_text("Welcome");
        body.append_child(h1);
        html.append_child(body);

        assert_eq!(
            serialize(&root),
            "<!DOCTYPE html><html amp lang=\"en\"><head><meta charset=\"utf-8\">\
             <title>Hello</title><noscript><style amp-boilerplate>body{animation:none}</style>\
             </noscript></head><body><h1>Welcome</h1></body></html>"
        );
    }
}
