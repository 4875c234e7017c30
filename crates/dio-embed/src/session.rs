//! Per-build session context.
//!
//! All build-wide state is validated and captured once, up front; the
//! session is read-only afterwards, so concurrent page rewrites against
//! one session are safe.

use std::path::Path;

use crate::consts::{DEFAULT_VIEWER_URL, VIEWER_LOCAL_PATH};
use crate::error::ConfigError;
use crate::markdown::tag_diagram_images;
use crate::payload::EmbedOptions;
use crate::rewrite::rewrite_page;
use crate::scanner::PageAttribute;

/// Build configuration, as supplied by the host or a configuration file.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Viewer script: an `http(s)` URL to download, or a site-relative
    /// path to a local copy.
    pub viewer_js: String,
    /// Hovering toolbar option string; empty disables the toolbar.
    pub toolbar: String,
    /// Show tooltips when hovering over diagram elements.
    pub tooltips: bool,
    /// Border width around the diagram in pixels.
    pub border: u32,
    /// Offer an edit link opening the diagram in a new tab.
    pub edit: bool,
    /// Install dark-mode stylesheet and script so diagrams follow the
    /// site color scheme.
    pub darkmode: bool,
    /// Read page selectors from a `page` attribute instead of alt text.
    pub use_page_attribute: bool,
    /// Whether the Markdown pipeline supports `{...}` attribute blocks.
    pub attr_blocks: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewer_js: DEFAULT_VIEWER_URL.to_owned(),
            toolbar: String::new(),
            tooltips: false,
            border: 5,
            edit: false,
            darkmode: true,
            use_page_attribute: false,
            attr_blocks: true,
        }
    }
}

/// Where the viewer script comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerSource {
    /// Downloaded once per build to [`VIEWER_LOCAL_PATH`].
    Remote(String),
    /// A site-relative path provided by the user; installed as-is.
    Local(String),
}

/// Validated per-build context: embed options, selector attribute choice,
/// viewer source and the asset manifest.
#[derive(Debug)]
pub struct BuildSession {
    options: EmbedOptions,
    page_attribute: PageAttribute,
    viewer: ViewerSource,
    attr_blocks: bool,
    stylesheets: Vec<String>,
    scripts: Vec<String>,
}

impl BuildSession {
    /// Validate settings and assemble the session.
    ///
    /// Fails fast — before any page is processed — when page selection is
    /// configured to come from alt text while attribute-block syntax is
    /// disabled, since selectors could then never reach the rendered HTML.
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        if !settings.use_page_attribute && !settings.attr_blocks {
            return Err(ConfigError::AltSelectorWithoutAttrBlocks);
        }

        let mut stylesheets = Vec::new();
        let mut scripts = Vec::new();

        let viewer = if settings.viewer_js.starts_with("http://")
            || settings.viewer_js.starts_with("https://")
        {
            scripts.push(VIEWER_LOCAL_PATH.to_owned());
            ViewerSource::Remote(settings.viewer_js)
        } else {
            scripts.push(settings.viewer_js.clone());
            ViewerSource::Local(settings.viewer_js)
        };

        // The reload script must come after the viewer so re-rendering on
        // client-side navigation finds it loaded.
        scripts.push("js/drawio-reload.js".to_owned());

        if settings.darkmode {
            stylesheets.push("css/drawio-darkmode.css".to_owned());
            scripts.push("js/drawio-darkmode.js".to_owned());
        }

        Ok(Self {
            options: EmbedOptions {
                toolbar: settings.toolbar,
                tooltips: settings.tooltips,
                border: settings.border,
                edit: settings.edit,
            },
            page_attribute: if settings.use_page_attribute {
                PageAttribute::Page
            } else {
                PageAttribute::Alt
            },
            viewer,
            attr_blocks: settings.attr_blocks,
            stylesheets,
            scripts,
        })
    }

    /// Rewrite one rendered page; `dest_dir` is its output directory.
    #[must_use]
    pub fn rewrite_page(&self, html: &str, dest_dir: &Path) -> String {
        rewrite_page(&self.options, self.page_attribute, html, dest_dir)
    }

    /// Apply the Markdown lightbox pre-pass to one source file.
    #[must_use]
    pub fn tag_markdown(&self, markdown: &str) -> String {
        tag_diagram_images(markdown)
    }

    /// Whether the Markdown pre-pass applies to this build at all.
    #[must_use]
    pub fn markdown_tagging_enabled(&self) -> bool {
        self.attr_blocks
    }

    /// The viewer source decided for this build.
    #[must_use]
    pub fn viewer(&self) -> &ViewerSource {
        &self.viewer
    }

    /// Stylesheets to install, in inclusion order.
    #[must_use]
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    /// Scripts to install, in inclusion order.
    #[must_use]
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// All asset paths (stylesheets, then scripts) for installation.
    pub fn assets(&self) -> impl Iterator<Item = &str> {
        self.stylesheets
            .iter()
            .chain(self.scripts.iter())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_settings_produce_remote_viewer() {
        let session = BuildSession::new(Settings::default()).unwrap();
        assert_eq!(
            session.viewer(),
            &ViewerSource::Remote(DEFAULT_VIEWER_URL.to_owned())
        );
    }

    #[test]
    fn test_alt_selector_without_attr_blocks_is_rejected() {
        let settings = Settings {
            use_page_attribute: false,
            attr_blocks: false,
            ..Settings::default()
        };
        assert!(matches!(
            BuildSession::new(settings),
            Err(ConfigError::AltSelectorWithoutAttrBlocks)
        ));
    }

    #[test]
    fn test_page_attribute_without_attr_blocks_is_accepted() {
        let settings = Settings {
            use_page_attribute: true,
            attr_blocks: false,
            ..Settings::default()
        };
        let session = BuildSession::new(settings).unwrap();
        assert!(!session.markdown_tagging_enabled());
    }

    #[test]
    fn test_script_order_viewer_then_reload_then_darkmode() {
        let session = BuildSession::new(Settings::default()).unwrap();
        assert_eq!(
            session.scripts(),
            &[
                "js/viewer-static.min.js".to_owned(),
                "js/drawio-reload.js".to_owned(),
                "js/drawio-darkmode.js".to_owned(),
            ]
        );
        assert_eq!(session.stylesheets(), &["css/drawio-darkmode.css".to_owned()]);
    }

    #[test]
    fn test_darkmode_off_drops_darkmode_assets() {
        let settings = Settings {
            darkmode: false,
            ..Settings::default()
        };
        let session = BuildSession::new(settings).unwrap();

        assert!(session.stylesheets().is_empty());
        assert_eq!(
            session.scripts(),
            &[
                "js/viewer-static.min.js".to_owned(),
                "js/drawio-reload.js".to_owned(),
            ]
        );
    }

    #[test]
    fn test_local_viewer_path_used_verbatim() {
        let settings = Settings {
            viewer_js: "js/my-viewer.js".to_owned(),
            ..Settings::default()
        };
        let session = BuildSession::new(settings).unwrap();

        assert_eq!(
            session.viewer(),
            &ViewerSource::Local("js/my-viewer.js".to_owned())
        );
        assert_eq!(session.scripts()[0], "js/my-viewer.js");
    }

    #[test]
    fn test_assets_chains_stylesheets_then_scripts() {
        let session = BuildSession::new(Settings::default()).unwrap();
        let assets: Vec<&str> = session.assets().collect();

        assert_eq!(assets[0], "css/drawio-darkmode.css");
        assert_eq!(assets.len(), 4);
    }
}
