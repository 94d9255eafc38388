//! HTML tree for include processing.
//!
//! Pages are parsed with `scraper` (html5ever), so raw-text elements such as
//! `<script>` and `<style>` stay opaque and implied end tags close the way a
//! browser closes them. Fragments are parsed on their own and grafted into
//! the page tree node by node.

use ego_tree::{NodeId, NodeRef};
use scraper::node::Element;
use scraper::{Html, Node};

use crate::include::IncludeTree;
use crate::utils::html::escape;

/// A parsed page.
///
/// Nodes removed from the tree stay in the arena, detached; they are simply
/// no longer reachable from the root.
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse a full page.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Serialize the document back to markup.
    pub fn to_html(&self) -> String {
        self.html.html()
    }

    /// Attached elements with the given tag name, in document order.
    pub fn query_tag(&self, name: &str) -> Vec<NodeId> {
        self.elements_where(|elem| elem.name().eq_ignore_ascii_case(name))
    }

    /// Snapshot of attached elements carrying `attribute`, in document order.
    pub fn query_attr(&self, attribute: &str) -> Vec<NodeId> {
        let attribute = attribute.to_ascii_lowercase();
        self.elements_where(|elem| elem.attr(&attribute).is_some())
    }

    fn elements_where(&self, matches: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .filter(|node| node.value().as_element().is_some_and(&matches))
            .map(|node| node.id())
            .collect()
    }

    /// Decoded value of an attribute on an element node.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.html
            .tree
            .get(id)?
            .value()
            .as_element()?
            .attr(&name.to_ascii_lowercase())
    }

    // ------------------------------------------------------------------------
    // Grafting
    // ------------------------------------------------------------------------

    fn has_parent(&self, id: NodeId) -> bool {
        self.html.tree.get(id).is_some_and(|node| node.parent().is_some())
    }

    /// Copy `source` and its subtree in front of `anchor`.
    fn insert_copy_before(&mut self, anchor: NodeId, source: NodeRef<'_, Node>) {
        let Some(mut anchor) = self.html.tree.get_mut(anchor) else {
            return;
        };
        let id = anchor.insert_before(source.value().clone()).id();
        self.copy_children(id, source);
    }

    /// Copy `source` and its subtree as the last child of `parent`.
    fn append_copy(&mut self, parent: NodeId, source: NodeRef<'_, Node>) {
        let Some(mut parent) = self.html.tree.get_mut(parent) else {
            return;
        };
        let id = parent.append(source.value().clone()).id();
        self.copy_children(id, source);
    }

    fn copy_children(&mut self, parent: NodeId, source: NodeRef<'_, Node>) {
        for child in source.children() {
            self.append_copy(parent, child);
        }
    }

    fn clear_children(&mut self, id: NodeId) {
        let Some(node) = self.html.tree.get(id) else {
            return;
        };
        let children: Vec<NodeId> = node.children().map(|child| child.id()).collect();
        for child in children {
            if let Some(mut child) = self.html.tree.get_mut(child) {
                child.detach();
            }
        }
    }

    #[cfg(test)]
    pub fn body_html(&self) -> String {
        let body = self.query_tag("body")[0];
        scraper::ElementRef::wrap(self.html.tree.get(body).unwrap())
            .unwrap()
            .inner_html()
    }
}

/// Top-level nodes of a parsed fragment.
fn fragment_nodes(fragment: &Html) -> Vec<NodeRef<'_, Node>> {
    fragment.root_element().children().collect()
}

impl IncludeTree for Document {
    type Node = NodeId;

    fn query_all(&self, attribute: &str) -> Vec<NodeId> {
        self.query_attr(attribute)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.attr(node, name).map(str::to_string)
    }

    /// A node without a parent has nowhere to splice into; nothing happens.
    fn replace_with_fragment(&mut self, node: NodeId, markup: &str) {
        if !self.has_parent(node) {
            return;
        }
        let fragment = Html::parse_fragment(markup);
        for source in fragment_nodes(&fragment) {
            self.insert_copy_before(node, source);
        }
        if let Some(mut node) = self.html.tree.get_mut(node) {
            node.detach();
        }
    }

    fn render_failure(&mut self, node: NodeId, class: &str, message: &str) {
        let markup = format!(r#"<pre class="{}">{}</pre>"#, escape(class), escape(message));
        let fragment = Html::parse_fragment(&markup);
        self.clear_children(node);
        for source in fragment_nodes(&fragment) {
            self.append_copy(node, source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_page_roundtrip_is_identical() {
        let html = r#"<!DOCTYPE html><html lang="en"><head><title>a &lt; b</title><style>p > a { color: red }</style></head><body><div class="a"><p>Hello &amp; <b>bye</b></p><br><input disabled=""></div></body></html>"#;
        assert_eq!(Document::parse(html).to_html(), html);
    }

    #[test]
    fn test_inline_script_is_opaque() {
        let html = r#"<!DOCTYPE html><html><head><script>if (a < b && c > d) { x = "<div data-include='p.html'></div>"; }</script></head><body><p>x</p></body></html>"#;
        let doc = Document::parse(html);

        assert_eq!(doc.to_html(), html);
        assert!(doc.query_attr("data-include").is_empty());
    }

    #[test]
    fn test_implied_end_tags_keep_structure() {
        let doc = Document::parse("<ul><li>a<li>b</ul><p>one<p>two");
        assert_eq!(
            doc.body_html(),
            "<ul><li>a</li><li>b</li></ul><p>one</p><p>two</p>"
        );
    }

    #[test]
    fn test_attribute_order_preserved() {
        let html = r#"<div a="1" b="2" c="3" d="4" e="5" f="6" g="7"></div>"#;
        assert_eq!(Document::parse(html).body_html(), html);
    }

    #[test]
    fn test_query_attr_document_order() {
        let doc = Document::parse(
            r#"<header data-include="a"></header><main><div data-include="b"></div></main><footer data-include="c"></footer>"#,
        );
        let found: Vec<_> = doc
            .query_attr("data-include")
            .into_iter()
            .map(|id| doc.attr(id, "data-include").unwrap())
            .collect();
        assert_eq!(found, ["a", "b", "c"]);
    }

    #[test]
    fn test_attr_is_decoded() {
        let doc = Document::parse(r#"<div data-include="a&amp;b.html"></div>"#);
        let id = doc.query_attr("data-include")[0];
        assert_eq!(doc.attr(id, "data-include"), Some("a&b.html"));
        assert_eq!(doc.attr(id, "DATA-INCLUDE"), Some("a&b.html"));
    }

    #[test]
    fn test_replace_splices_in_place() {
        let mut doc =
            Document::parse(r#"<main><i>1</i><div data-include="x">old</div><i>3</i></main>"#);
        let div = doc.query_attr("data-include")[0];
        doc.replace_with_fragment(div, "<nav>X</nav><hr>");

        assert_eq!(doc.body_html(), "<main><i>1</i><nav>X</nav><hr><i>3</i></main>");
        assert!(doc.query_attr("data-include").is_empty());
    }

    #[test]
    fn test_replace_detached_node_is_noop() {
        let mut doc = Document::parse(r#"<div data-include="a"><p data-include="b"></p></div>"#);
        let [outer, inner] = doc.query_attr("data-include")[..] else {
            panic!("expected two placeholders");
        };
        doc.replace_with_fragment(outer, "<nav></nav>");
        let after_outer = doc.to_html();

        // inner still hangs off the detached outer node
        doc.replace_with_fragment(inner, "<b>x</b>");
        doc.render_failure(inner, "include-error", "late");

        assert_eq!(doc.to_html(), after_outer);
        assert_eq!(doc.body_html(), "<nav></nav>");
    }

    #[test]
    fn test_render_failure_escapes_message() {
        let mut doc = Document::parse(r#"<div data-include="x"><em>loading</em> text</div>"#);
        let div = doc.query_attr("data-include")[0];
        doc.render_failure(div, "include-error", "Include failed: a<b>.html");

        assert_eq!(
            doc.body_html(),
            r#"<div data-include="x"><pre class="include-error">Include failed: a&lt;b&gt;.html</pre></div>"#
        );
    }

    #[test]
    fn test_replace_with_text_only_fragment() {
        let mut doc = Document::parse(r#"<p>a<span data-include="t"></span>c</p>"#);
        let span = doc.query_attr("data-include")[0];
        doc.replace_with_fragment(span, "b");
        assert_eq!(doc.body_html(), "<p>abc</p>");
    }
}
