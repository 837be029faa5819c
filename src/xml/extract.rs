use roxmltree::{Document, Node};

use crate::core::FiskalError;

/// Parse XML text into a navigable tree.
pub fn parse_document(xml: &str) -> Result<Document<'_>, FiskalError> {
    Document::parse(xml).map_err(|e| FiskalError::Malformed(e.to_string()))
}

/// Find the first element matching `path`, in document order.
///
/// Supported paths:
/// - `//Name/Child`: `Name` anywhere in the tree, then child steps
/// - `/Root/Child`: absolute from the document root
///
/// Names are matched on their local part, so `soap:Body` matches `Body`.
pub fn find_element<'a, 'input>(
    doc: &'a Document<'input>,
    path: &str,
) -> Option<Node<'a, 'input>> {
    let (anywhere, rest) = match path.strip_prefix("//") {
        Some(rest) => (true, rest),
        None => (false, path.trim_start_matches('/')),
    };
    let steps: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    let (first, tail) = steps.split_first()?;

    if anywhere {
        doc.descendants()
            .filter(|n| is_named(n, first))
            .find_map(|n| descend(n, tail))
    } else {
        doc.root()
            .children()
            .filter(|n| is_named(n, first))
            .find_map(|n| descend(n, tail))
    }
}

fn is_named(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn descend<'a, 'input>(node: Node<'a, 'input>, steps: &[&str]) -> Option<Node<'a, 'input>> {
    let Some((next, tail)) = steps.split_first() else {
        return Some(node);
    };
    node.children()
        .filter(|n| is_named(n, next))
        .find_map(|n| descend(n, tail))
}

/// Read `attribute` from the first element matching `path`.
pub fn attribute_value(path: &str, attribute: &str, doc: &Document<'_>) -> Result<String, FiskalError> {
    let elem = find_element(doc, path).ok_or_else(|| FiskalError::ElementNotFound {
        path: path.to_string(),
    })?;
    elem.attribute(attribute)
        .map(str::to_string)
        .ok_or_else(|| FiskalError::AttributeNotFound {
            element: path.to_string(),
            attribute: attribute.to_string(),
        })
}

/// Decoded text content of the first element matching `path`.
pub fn element_text(path: &str, doc: &Document<'_>) -> Result<String, FiskalError> {
    let elem = find_element(doc, path).ok_or_else(|| FiskalError::ElementNotFound {
        path: path.to_string(),
    })?;
    Ok(elem
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect())
}
