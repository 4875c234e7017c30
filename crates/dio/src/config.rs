//! Configuration loading for the dio CLI.
//!
//! Parses `dio.toml` files with serde and discovers them in the target
//! directory or its ancestors. Every section and field is optional;
//! omitted values fall back to the library defaults.
//!
//! ```toml
//! [viewer]
//! js = "https://viewer.diagrams.net/js/viewer-static.min.js"
//!
//! [embed]
//! toolbar = "pages zoom layers lightbox"
//! tooltips = false
//! border = 5
//! edit = false
//! darkmode = true
//!
//! [pages]
//! use_page_attribute = false
//!
//! [markdown]
//! attr_blocks = true
//! ```

use std::path::{Path, PathBuf};

use dio_embed::Settings;
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dio.toml";

/// Error reading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigFileError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Raw configuration file contents.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    viewer: ViewerSection,
    embed: EmbedSection,
    pages: PagesSection,
    markdown: MarkdownSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViewerSection {
    js: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EmbedSection {
    toolbar: Option<String>,
    tooltips: Option<bool>,
    border: Option<u32>,
    edit: Option<bool>,
    darkmode: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PagesSection {
    use_page_attribute: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MarkdownSection {
    attr_blocks: Option<bool>,
}

impl ConfigFile {
    fn into_settings(self) -> Settings {
        let defaults = Settings::default();
        Settings {
            viewer_js: self.viewer.js.unwrap_or(defaults.viewer_js),
            toolbar: self.embed.toolbar.unwrap_or(defaults.toolbar),
            tooltips: self.embed.tooltips.unwrap_or(defaults.tooltips),
            border: self.embed.border.unwrap_or(defaults.border),
            edit: self.embed.edit.unwrap_or(defaults.edit),
            darkmode: self.embed.darkmode.unwrap_or(defaults.darkmode),
            use_page_attribute: self
                .pages
                .use_page_attribute
                .unwrap_or(defaults.use_page_attribute),
            attr_blocks: self.markdown.attr_blocks.unwrap_or(defaults.attr_blocks),
        }
    }
}

/// Load settings from an explicit file, or discover `dio.toml` in
/// `start_dir` and its ancestors. No file at all yields the defaults.
pub(crate) fn load(
    explicit: Option<&Path>,
    start_dir: &Path,
) -> Result<Settings, ConfigFileError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover(start_dir),
    };

    let Some(path) = path else {
        return Ok(Settings::default());
    };

    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigFileError::Read {
        path: path.clone(),
        source,
    })?;
    let file: ConfigFile =
        toml::from_str(&raw).map_err(|source| ConfigFileError::Parse { path, source })?;

    Ok(file.into_settings())
}

/// Find the nearest `dio.toml`, walking up from `start_dir`.
fn discover(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}
