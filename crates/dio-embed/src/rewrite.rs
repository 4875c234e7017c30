//! Rewriting of diagram references into viewer containers.
//!
//! A page is processed against an immutable snapshot: references are
//! collected first, the replacement markup for each is computed (including
//! any file access and page extraction), and a second streaming pass
//! splices the replacements in. Everything outside the replaced elements
//! is preserved byte-for-byte.

use std::cell::RefCell;
use std::path::Path;

use lol_html::{RewriteStrSettings, element, rewrite_str};

use crate::consts::{CONTAINER_CLASS, CONTAINER_STYLE, PLACEHOLDER_DOCUMENT};
use crate::document::{XmlElement, parse_document};
use crate::extract::extract;
use crate::payload::{EmbedOptions, EmbedPayload};
use crate::scanner::{
    DiagramReference, PageAttribute, PageSelector, contains_diagram_extension, is_diagram_src,
    scan,
};

/// Rewrite every diagram reference in `html` into an embedded viewer
/// container. `dest_dir` is the output directory of the page being
/// processed; local diagram sources resolve against it.
///
/// Pages without any diagram reference come back unchanged.
pub(crate) fn rewrite_page(
    options: &EmbedOptions,
    page_attribute: PageAttribute,
    html: &str,
    dest_dir: &Path,
) -> String {
    if !contains_diagram_extension(html) {
        return html.to_owned();
    }

    let references = scan(html, page_attribute);
    if references.is_empty() {
        return html.to_owned();
    }

    let replacements: Vec<String> = references
        .iter()
        .map(|reference| container_div(&build_payload(options, reference, dest_dir)))
        .collect();

    splice(html, &replacements).unwrap_or_else(|error| {
        tracing::error!(error = %error, "HTML rewrite failed; page left unprocessed");
        html.to_owned()
    })
}

/// Build the embed payload for one reference.
///
/// Remote sources are forwarded to the viewer verbatim; page selection is
/// only defined for local files.
fn build_payload(
    options: &EmbedOptions,
    reference: &DiagramReference,
    dest_dir: &Path,
) -> EmbedPayload {
    if reference.is_remote() {
        return EmbedPayload::remote(options, reference.src.clone());
    }

    let document = load_local_document(&reference.src, dest_dir);

    match &reference.selector {
        Some(PageSelector::Index(index)) => {
            // The full document is embedded and the viewer switches pages.
            let xml = extract(&document, None).unwrap_or_default();
            EmbedPayload::local(options, xml, Some(*index))
        }
        Some(PageSelector::Name(name)) => {
            let xml = extract(&document, Some(name)).unwrap_or_else(|error| {
                tracing::error!(
                    file = %reference.src,
                    path = %dest_dir.display(),
                    error = %error,
                    "Cannot extract page from diagram file"
                );
                String::new()
            });
            EmbedPayload::local(options, xml, None)
        }
        None => {
            let xml = extract(&document, None).unwrap_or_default();
            EmbedPayload::local(options, xml, None)
        }
    }
}

/// Read and parse a local diagram file, substituting a placeholder
/// document on read or parse failure so the page build continues.
fn load_local_document(src: &str, dest_dir: &Path) -> XmlElement {
    // The scanner admits query strings; they are not part of the file name.
    let file_part = src.split_once('?').map_or(src, |(path, _)| path);
    let path = dest_dir.join(file_part);

    let placeholder =
        || parse_document(PLACEHOLDER_DOCUMENT).expect("placeholder document parses");

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::error!(
                file = %src,
                path = %dest_dir.display(),
                error = %error,
                "Could not read diagram file"
            );
            return placeholder();
        }
    };

    match parse_document(&raw) {
        Ok(document) => document,
        Err(error) => {
            tracing::error!(
                file = %src,
                path = %dest_dir.display(),
                error = %error,
                "Diagram file is not valid XML"
            );
            placeholder()
        }
    }
}

/// The viewer container replacing a matched `<img>` element.
fn container_div(payload: &EmbedPayload) -> String {
    format!(
        r#"<div class="{CONTAINER_CLASS}" style="{CONTAINER_STYLE}" data-mxgraph="{}"></div>"#,
        escape_html(&payload.to_json())
    )
}

/// Splice replacement markup over the n-th matching `<img>` element.
fn splice(html: &str, replacements: &[String]) -> Result<String, lol_html::errors::RewritingError> {
    let next = RefCell::new(0_usize);

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("img[src]", |el| {
                let is_match = el
                    .get_attribute("src")
                    .is_some_and(|src| is_diagram_src(&src));
                if is_match {
                    let mut index = next.borrow_mut();
                    if let Some(replacement) = replacements.get(*index) {
                        el.replace(replacement, lol_html::html_content::ContentType::Html);
                    }
                    *index += 1;
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )
}

/// Escape a string for use inside a double-quoted HTML attribute value.
fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
