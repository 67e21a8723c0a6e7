use ego_tree::NodeRef;
use harvester_core::{Document, Element, Node};
use scraper::Html;

/// Parse HTML into the owned page model. Comments, doctypes and processing
/// instructions are dropped; text is kept verbatim.
pub fn parse_document(html: &str) -> Document {
    let parsed = Html::parse_document(html);
    let mut root = Element::new("#document");
    for child in parsed.tree.root().children() {
        append_node(child, &mut root);
    }
    Document::new(root)
}

fn append_node(node: NodeRef<'_, scraper::Node>, parent: &mut Element) {
    match node.value() {
        scraper::Node::Text(text) => parent.push(Node::Text(String::from(&**text))),
        scraper::Node::Element(el) => {
            let mut element = Element::new(el.name());
            for (key, value) in el.attrs() {
                element = element.with_attr(key, value);
            }
            for child in node.children() {
                append_node(child, &mut element);
            }
            parent.push(Node::Element(element));
        }
        scraper::Node::Document | scraper::Node::Fragment => {
            for child in node.children() {
                append_node(child, parent);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvester_core::AttrFilter;

    #[test]
    fn builds_locatable_tree() {
        let doc = parse_document(
            r#"<!DOCTYPE html><html><body><!-- nav -->
            <section id="numerical-index"><table><tbody>
            <tr><td><abbr title="Standards Track, Final">SF</abbr></td></tr>
            </tbody></table></section></body></html>"#,
        );
        let section = doc
            .locate("section", &AttrFilter::any().exact("id", "numerical-index"))
            .unwrap();
        let abbr = section.locate("abbr", &AttrFilter::any()).unwrap();
        assert_eq!(abbr.text(), "SF");
        assert_eq!(abbr.attr("title"), Some("Standards Track, Final"));
        assert!(!doc.root().text().contains("nav"));
    }

    #[test]
    fn parser_inserts_implied_tbody() {
        let doc = parse_document("<table><tr><td>x</td></tr></table>");
        let tbody = doc.locate("tbody", &AttrFilter::any()).unwrap();
        assert_eq!(tbody.find_all("tr", &AttrFilter::any()).len(), 1);
    }
}
