//! Named-page extraction from multi-page diagram documents.

use crate::consts::{PAGE_TAG, ROOT_CONTAINER_TAG};
use crate::document::{XmlElement, serialize_element};
use crate::error::ExtractError;

/// Extract the page named `selector` from a parsed diagram document.
///
/// With no selector the whole document is serialized unchanged. Otherwise
/// the first `<mxfile>` container in document order is located and a new
/// container is built around the matching `<diagram>` page, keeping the
/// original container's attributes:
///
/// - no page matches: the entire container is serialized and a warning is
///   logged (the viewer then shows the first page);
/// - several pages share the name: the first one wins, with a warning.
///
/// Page names match by exact, case-sensitive string comparison.
pub fn extract(document: &XmlElement, selector: Option<&str>) -> Result<String, ExtractError> {
    let Some(page_name) = selector.filter(|name| !name.is_empty()) else {
        return Ok(serialize_element(document));
    };

    let container = find_container(document).ok_or(ExtractError::MissingRoot)?;

    let pages: Vec<&XmlElement> = container
        .children
        .iter()
        .filter(|child| child.tag == PAGE_TAG && child.attr("name") == Some(page_name))
        .collect();

    let Some(first) = pages.first() else {
        tracing::warn!(page = %page_name, "No page with this name; embedding all pages");
        return Ok(serialize_element(container));
    };

    if pages.len() > 1 {
        tracing::warn!(
            page = %page_name,
            count = pages.len(),
            "Multiple pages share this name; using the first"
        );
    }

    let mut page = (*first).clone();
    page.tail.clear();

    let subset = XmlElement {
        tag: container.tag.clone(),
        attrs: container.attrs.clone(),
        children: vec![page],
        ..XmlElement::default()
    };
    Ok(serialize_element(&subset))
}

/// First `<mxfile>` element in document order, if any.
fn find_container(element: &XmlElement) -> Option<&XmlElement> {
    if element.tag == ROOT_CONTAINER_TAG {
        return Some(element);
    }
    element.children.iter().find_map(find_container)
}
