//! XML widget manifest conversion.
//!
//! Elements become dictionaries: attributes under `@name`, direct text under
//! `#text`, child elements under their (prefixed) tag name. Repeated child
//! tags collapse into a list in document order.

use super::loader::TEXT_KEY;
use super::value::Document;
use std::collections::BTreeMap;

/// Parses XML text into a document rooted at the top-level element's name.
pub fn parse_document(text: &str) -> Result<Document, String> {
    let xml = roxmltree::Document::parse(text)
        .map_err(|err| format!("Manifest is not valid XML: {err}"))?;
    let root = xml.root_element();
    let key = qualified_name(root, root.tag_name().namespace(), root.tag_name().name());

    let mut entries = BTreeMap::new();
    entries.insert(key, element_to_document(root));
    Ok(Document::Dictionary(entries))
}

fn element_to_document(node: roxmltree::Node<'_, '_>) -> Document {
    let mut entries = BTreeMap::new();
    for attr in node.attributes() {
        let name = qualified_name(node, attr.namespace(), attr.name());
        entries.insert(format!("@{name}"), Document::scalar(attr.value()));
    }

    let text: String = node
        .children()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect();
    let text = text.trim();
    if !text.is_empty() {
        entries.insert(TEXT_KEY.to_string(), Document::scalar(text));
    }

    for child in node.children().filter(|child| child.is_element()) {
        let key = qualified_name(child, child.tag_name().namespace(), child.tag_name().name());
        let value = element_to_document(child);
        let merged = match entries.remove(&key) {
            None => value,
            Some(Document::List(mut items)) => {
                items.push(value);
                Document::List(items)
            }
            Some(existing) => Document::List(vec![existing, value]),
        };
        entries.insert(key, merged);
    }

    Document::Dictionary(entries)
}

fn qualified_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, name: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) => format!("{prefix}:{name}"),
        None => name.to_string(),
    }
}
