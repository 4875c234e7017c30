//! Error types for the embed pipeline.

/// Error produced while validating build configuration.
///
/// Configuration problems are fatal: they abort the build before any page
/// is processed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Page selectors come from image alt text, which only reaches the
    /// rendered HTML through attribute-block syntax.
    #[error(
        "page selection via alt text requires attribute-block syntax; \
         enable `markdown.attr_blocks` or set `pages.use_page_attribute = true`"
    )]
    AltSelectorWithoutAttrBlocks,
}

/// Error while parsing a diagram file into a [`crate::document::XmlElement`] tree.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DocumentError {
    /// XML parsing error.
    #[error("XML parse error")]
    Parse(#[from] quick_xml::Error),

    /// Encoding error during XML parsing.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// The input contained no root element.
    #[error("document has no root element")]
    NoRoot,
}

/// Error while extracting a named page from a diagram document.
///
/// Callers substitute an empty embed payload and log the offending file;
/// a single bad diagram never fails the page build.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// The document has no `<mxfile>` root container anywhere in its tree.
    #[error("no <mxfile> root container")]
    MissingRoot,
}
