//! Static asset installation for the drawio embed pipeline.
//!
//! Bundled CSS/JS support files are compiled into the binary with
//! `rust-embed` and written into the build output directory. The viewer
//! script itself is either a user-provided local file (nothing to install)
//! or downloaded once per build; when the download fails for network
//! reasons a small loader stub is written instead, so the published site
//! still renders diagrams by fetching the viewer from its original URL at
//! page load.
//!
//! Failure policy: a failed download degrades to the stub with a logged
//! warning; any filesystem error is fatal and aborts the build.

use std::path::Path;
use std::time::Duration;

use ureq::Agent;

/// Support files bundled with the crate.
#[derive(rust_embed::RustEmbed)]
#[folder = "assets"]
struct BundledAssets;

/// Timeout for the one-time viewer download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(20);

/// Some CDNs reject requests without a browser-like agent string.
const USER_AGENT: &str = "Mozilla/5.0 (dio diagram embedder)";

/// Error during asset installation. Always fatal for the build.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum InstallError {
    /// Filesystem error writing an asset.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How the viewer script ended up in the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerInstall {
    /// The remote viewer was downloaded and saved.
    Downloaded,
    /// The download failed; a runtime fallback stub was written.
    FallbackStub,
}

/// Write bundled assets into `site_dir`, returning how many were written.
///
/// Paths with no bundled counterpart are skipped: they refer to
/// user-provided files (a local viewer copy, a downloaded viewer) that are
/// installed through other means.
pub fn install_bundled<'a, I>(paths: I, site_dir: &Path) -> Result<usize, InstallError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut written = 0;
    for path in paths {
        let Some(asset) = BundledAssets::get(path) else {
            tracing::debug!(path = %path, "No bundled asset for path; skipping");
            continue;
        };

        let dest = site_dir.join(path);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&dest, asset.data.as_ref())?;
        written += 1;
    }
    Ok(written)
}

/// Install the viewer script from `url` at `dest`.
///
/// Network, timeout and HTTP errors degrade to a fallback loader stub;
/// filesystem errors propagate and abort the build.
pub fn install_viewer(url: &str, dest: &Path) -> Result<ViewerInstall, InstallError> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }

    match fetch(url) {
        Ok(data) => {
            std::fs::write(dest, data)?;
            tracing::info!(path = %dest.display(), "Downloaded diagram viewer");
            Ok(ViewerInstall::Downloaded)
        }
        Err(error) => {
            tracing::warn!(
                url = %url,
                error = %error,
                "Could not download viewer; writing runtime fallback stub"
            );
            std::fs::write(dest, fallback_stub(url))?;
            Ok(ViewerInstall::FallbackStub)
        }
    }
}

/// Loader stub written in place of a viewer that could not be downloaded.
/// At page load it appends a script tag pointing at the original URL.
#[must_use]
pub fn fallback_stub(url: &str) -> String {
    let url_literal = serde_json::to_string(url).expect("URL serializes to a JSON string");
    format!(
        "/*! drawio viewer fallback stub */\n\
         (function(){{var s=document.createElement('script');\
         s.src={url_literal};\
         document.head.appendChild(s);}})();\n"
    )
}

fn fetch(url: &str) -> Result<Vec<u8>, ureq::Error> {
    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(DOWNLOAD_TIMEOUT))
        .build()
        .into();

    agent
        .get(url)
        .header("User-Agent", USER_AGENT)
        .call()?
        .into_body()
        .read_to_vec()
}
