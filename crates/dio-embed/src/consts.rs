//! Shared constants for the embed pipeline.

/// File-suffix convention identifying an embeddable diagram reference.
pub(crate) const DIAGRAM_EXTENSION: &str = ".drawio";

/// Class of the container element the client-side viewer looks for.
pub(crate) const CONTAINER_CLASS: &str = "mxgraph";

/// Inline style applied to every container element.
pub(crate) const CONTAINER_STYLE: &str = "max-width:100%;border:1px solid transparent;";

/// Working document substituted for diagram files that cannot be read or parsed.
pub(crate) const PLACEHOLDER_DOCUMENT: &str = "<invalid/>";

/// Tag of the top-level element grouping a diagram file's pages.
pub(crate) const ROOT_CONTAINER_TAG: &str = "mxfile";

/// Tag of a single page inside the root container.
pub(crate) const PAGE_TAG: &str = "diagram";

/// Default viewer script. The online viewer tracks the current drawio
/// release; override with a local copy when version drift is a concern.
pub const DEFAULT_VIEWER_URL: &str = "https://viewer.diagrams.net/js/viewer-static.min.js";

/// Site-relative path where a downloaded viewer script is saved.
pub const VIEWER_LOCAL_PATH: &str = "js/viewer-static.min.js";
