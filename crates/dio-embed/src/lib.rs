//! Drawio diagram embedding for rendered documentation pages.
//!
//! This crate turns `<img>` references to `.drawio` files in rendered HTML
//! into client-side-rendered diagram widgets:
//! - [`scan`] finds diagram references in a rendered page
//! - [`extract`] subsets a multi-page diagram file to one named page
//! - [`BuildSession::rewrite_page`] replaces references with viewer
//!   containers carrying a JSON embed payload
//! - [`tag_diagram_images`] is a Markdown pre-pass excluding diagram
//!   images from lightbox handling
//!
//! # Example
//!
//! ```
//! use dio_embed::{BuildSession, Settings};
//!
//! let session = BuildSession::new(Settings::default()).unwrap();
//! let html = r#"<p>No diagrams here.</p>"#;
//!
//! // Pages without diagram references come back unchanged.
//! assert_eq!(session.rewrite_page(html, std::path::Path::new(".")), html);
//! ```

mod consts;
mod document;
mod error;
mod extract;
mod markdown;
mod payload;
mod rewrite;
mod scanner;
mod session;

pub use consts::{DEFAULT_VIEWER_URL, VIEWER_LOCAL_PATH};
pub use document::{XmlElement, parse_document, serialize_element};
pub use error::{ConfigError, DocumentError, ExtractError};
pub use extract::extract;
pub use markdown::{LIGHTBOX_OPT_OUT_CLASS, tag_diagram_images};
pub use payload::{EmbedOptions, EmbedPayload};
pub use scanner::{DiagramReference, PageAttribute, PageSelector, scan};
pub use session::{BuildSession, Settings, ViewerSource};
