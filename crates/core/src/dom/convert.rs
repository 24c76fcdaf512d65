// ABOUTME: Structural HTML-to-text converter for encyclopedia articles.
// ABOUTME: Emits heading markers and list prefixes, drops image galleries and dangling citation commas.

use ego_tree::NodeRef;
use scraper::{Html, Node};
use tracing::debug;

use crate::options::{ConvertOptions, HeadingMarker};

// Closing sequence of nested definition lists used for citations. Without a line
// break around it the citation block runs into the following paragraph.
const NESTED_CITATION_CLOSE: &str = "</dd></dl></dd></dl>";

// Below this nesting depth the walk stops recursing and keeps only the text.
const MAX_DEPTH: usize = 512;

/// Converts article HTML to flat text with the default options.
pub fn convert(html: &str) -> String {
    convert_with(html, &ConvertOptions::default())
}

/// Converts article HTML to flat text.
///
/// Headings are wrapped in `==` markers matching their level, list items are
/// prefixed with `- ` (and `n. ` inside ordered lists), image galleries are
/// dropped and the text nodes are concatenated in document order. Malformed
/// markup is accepted as recovered by the parser.
pub fn convert_with(html: &str, opts: &ConvertOptions) -> String {
    let fixed;
    let html = if opts.split_citation_lists && html.contains(NESTED_CITATION_CLOSE) {
        fixed = html.replace(NESTED_CITATION_CLOSE, &format!("\n{NESTED_CITATION_CLOSE}\n"));
        fixed.as_str()
    } else {
        html
    };

    let document = Html::parse_fragment(html);
    let mut walker = Walker {
        opts,
        output: String::with_capacity(html.len() / 2),
        ordered_counters: Vec::new(),
    };
    walker.walk(document.tree.root(), 0);

    debug!(
        input_len = html.len(),
        output_len = walker.output.len(),
        "converted html to text"
    );
    walker.output
}

struct Walker<'a> {
    opts: &'a ConvertOptions,
    output: String,
    // One counter per enclosing <ol>, outermost first.
    ordered_counters: Vec<usize>,
}

impl<'a> Walker<'a> {
    fn walk(&mut self, node: NodeRef<Node>, depth: usize) {
        if depth >= MAX_DEPTH {
            self.push_descendant_text(node);
            return;
        }
        match node.value() {
            Node::Text(text) => self.output.push_str(text),
            Node::Element(el) => {
                let tag = el.name();

                if tag == "ul" && el.classes().any(|c| c == self.opts.gallery_class) {
                    return;
                }

                let heading = self.heading_marker(tag);
                if let Some(marker) = heading {
                    self.output.push_str(&marker.open);
                }

                if tag == "li" {
                    self.output.push_str("- ");
                    // Every enclosing ordered list numbers its descendant items.
                    for counter in self.ordered_counters.iter_mut() {
                        *counter += 1;
                        self.output.push_str(&counter.to_string());
                        self.output.push_str(". ");
                    }
                }

                // Exact attribute text: scraper does not keep the class order.
                let cleared = tag == "sup"
                    && el.attr("class") == Some(self.opts.cleared_citation_class.as_str());
                if !cleared {
                    if tag == "ol" {
                        self.ordered_counters.push(0);
                        self.walk_children(node, depth);
                        self.ordered_counters.pop();
                    } else {
                        self.walk_children(node, depth);
                    }
                }

                if tag == "ul" {
                    self.output.push('\n');
                }

                if let Some(marker) = heading {
                    self.output.push_str(&marker.close);
                }
            }
            Node::Document | Node::Fragment => self.walk_children(node, depth),
            _ => {}
        }
    }

    fn walk_children(&mut self, node: NodeRef<Node>, depth: usize) {
        for child in node.children() {
            self.walk(child, depth + 1);
        }
    }

    fn push_descendant_text(&mut self, node: NodeRef<Node>) {
        for descendant in node.descendants() {
            if let Node::Text(text) = descendant.value() {
                self.output.push_str(text);
            }
        }
    }

    fn heading_marker(&self, tag: &str) -> Option<&'a HeadingMarker> {
        self.opts.headings.iter().find(|h| h.tag == tag)
    }
}
