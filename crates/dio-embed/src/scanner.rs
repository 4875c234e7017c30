//! Diagram reference scanning over rendered HTML.

use std::cell::RefCell;
use std::sync::LazyLock;

use lol_html::{RewriteStrSettings, element, rewrite_str};
use regex::Regex;

use crate::consts::DIAGRAM_EXTENSION;

/// Source attribute pattern: the diagram extension, an optional rendered
/// `.svg` suffix, then end of string or a query string. Case-insensitive.
static DIAGRAM_SRC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.drawio(?:\.svg)?(?:$|\?)").expect("invalid diagram source regex")
});

/// Which `<img>` attribute carries the page selector.
///
/// Selected once per build; the other attribute is ignored entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAttribute {
    /// A semantic `page="..."` attribute.
    Page,
    /// The image alt text, written through attribute-block syntax.
    Alt,
}

impl PageAttribute {
    fn attr_name(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Alt => "alt",
        }
    }
}

/// Which page of a multi-page diagram file to embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelector {
    /// Zero-based page index, forwarded to the viewer without extraction.
    Index(usize),
    /// Page name, resolved by extraction.
    Name(String),
}

impl PageSelector {
    /// Normalize a raw attribute value: index-like values select by
    /// position, anything else by name.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<usize>()
            .map_or_else(|_| Self::Name(raw.to_owned()), Self::Index)
    }
}

/// One diagram reference found in a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramReference {
    /// The reference's source locator: a site-relative path or absolute URL.
    pub src: String,
    /// Page selector, when the configured attribute carried one.
    pub selector: Option<PageSelector>,
}

impl DiagramReference {
    /// Whether the source points at a remotely hosted diagram.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.src.starts_with("http://") || self.src.starts_with("https://")
    }
}

/// Scan a rendered HTML document for diagram references, in document order.
///
/// Matches `<img>` elements whose `src` ends in the diagram extension
/// (optionally `.drawio.svg`, optionally with a query string), matched
/// case-insensitively. The document is not modified.
#[must_use]
pub fn scan(html: &str, page_attribute: PageAttribute) -> Vec<DiagramReference> {
    let references = RefCell::new(Vec::new());

    let result = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("img[src]", |el| {
                if let Some(reference) = reference_from_element(el, page_attribute) {
                    references.borrow_mut().push(reference);
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    );

    if let Err(error) = result {
        tracing::error!(error = %error, "HTML scan failed; page left unprocessed");
        return Vec::new();
    }

    references.into_inner()
}

fn reference_from_element(
    el: &lol_html::html_content::Element<'_, '_>,
    page_attribute: PageAttribute,
) -> Option<DiagramReference> {
    let src = el.get_attribute("src")?;
    if !is_diagram_src(&src) {
        return None;
    }

    let selector = el
        .get_attribute(page_attribute.attr_name())
        .filter(|value| !value.trim().is_empty())
        .map(|value| PageSelector::parse(&value));

    Some(DiagramReference { src, selector })
}

pub(crate) fn is_diagram_src(src: &str) -> bool {
    DIAGRAM_SRC_PATTERN.is_match(src)
}

/// Cheap pre-check: does the raw HTML mention the diagram extension at all?
pub(crate) fn contains_diagram_extension(html: &str) -> bool {
    html.as_bytes()
        .windows(DIAGRAM_EXTENSION.len())
        .any(|window| window.eq_ignore_ascii_case(DIAGRAM_EXTENSION.as_bytes()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_scan_finds_references_in_document_order() {
        let html = r#"<p><img src="a.drawio"></p><img src="skip.png"><img src="b.drawio.svg">"#;
        let refs = scan(html, PageAttribute::Alt);

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].src, "a.drawio");
        assert_eq!(refs[1].src, "b.drawio.svg");
    }

    #[test]
    fn test_scan_extension_is_case_insensitive() {
        let refs = scan(r#"<img src="Arch.DRAWIO">"#, PageAttribute::Alt);
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn test_scan_allows_query_string() {
        let refs = scan(r#"<img src="a.drawio?v=3">"#, PageAttribute::Alt);
        assert_eq!(refs[0].src, "a.drawio?v=3");
    }

    #[test]
    fn test_scan_rejects_extension_in_the_middle() {
        let refs = scan(r#"<img src="a.drawio.png">"#, PageAttribute::Alt);
        assert!(refs.is_empty());
    }

    #[test]
    fn test_scan_ignores_images_without_src() {
        let refs = scan(r#"<img alt="a.drawio">"#, PageAttribute::Alt);
        assert!(refs.is_empty());
    }

    #[test]
    fn test_selector_from_alt_attribute() {
        let refs = scan(
            r#"<img src="a.drawio" alt="Network" page="2">"#,
            PageAttribute::Alt,
        );
        assert_eq!(
            refs[0].selector,
            Some(PageSelector::Name("Network".to_owned()))
        );
    }

    #[test]
    fn test_selector_from_page_attribute() {
        let refs = scan(
            r#"<img src="a.drawio" alt="Network" page="2">"#,
            PageAttribute::Page,
        );
        assert_eq!(refs[0].selector, Some(PageSelector::Index(2)));
    }

    #[test]
    fn test_empty_selector_attribute_means_none() {
        let refs = scan(r#"<img src="a.drawio" alt="">"#, PageAttribute::Alt);
        assert_eq!(refs[0].selector, None);
    }

    #[test]
    fn test_selector_parse_numeric_vs_name() {
        assert_eq!(PageSelector::parse("3"), PageSelector::Index(3));
        assert_eq!(PageSelector::parse(" 0 "), PageSelector::Index(0));
        assert_eq!(
            PageSelector::parse("Page 3"),
            PageSelector::Name("Page 3".to_owned())
        );
    }

    #[test]
    fn test_remote_detection() {
        let remote = DiagramReference {
            src: "https://example.com/d.drawio".to_owned(),
            selector: None,
        };
        let local = DiagramReference {
            src: "d.drawio".to_owned(),
            selector: None,
        };

        assert!(remote.is_remote());
        assert!(!local.is_remote());
    }

    #[test]
    fn test_contains_diagram_extension_is_ascii_case_insensitive() {
        assert!(contains_diagram_extension("x.DrawIO y"));
        assert!(!contains_diagram_extension("<p>plain page</p>"));
    }
}
