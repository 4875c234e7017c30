//! `dio process` - rewrite a rendered site and install assets.

use std::path::{Path, PathBuf};

use clap::Args;
use dio_assets::ViewerInstall;
use dio_embed::{BuildSession, VIEWER_LOCAL_PATH, ViewerSource};

use crate::config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the `process` command.
#[derive(Args)]
pub(crate) struct ProcessArgs {
    /// Rendered site directory to post-process in place.
    #[arg(long, value_name = "DIR")]
    site_dir: PathBuf,

    /// Configuration file (default: discover dio.toml near the site).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(long, short)]
    pub(crate) verbose: bool,
}

impl ProcessArgs {
    pub(crate) fn execute(&self, output: &Output) -> Result<(), CliError> {
        let settings = config::load(self.config.as_deref(), &self.site_dir)?;
        let session = BuildSession::new(settings)?;

        let (pages, rewritten) = rewrite_site(&session, &self.site_dir)?;
        output.info(&format!("Processed {pages} pages, rewrote {rewritten}"));

        let installed = dio_assets::install_bundled(session.assets(), &self.site_dir)?;
        tracing::info!(count = installed, "Installed bundled assets");

        if let ViewerSource::Remote(url) = session.viewer() {
            let dest = self.site_dir.join(VIEWER_LOCAL_PATH);
            match dio_assets::install_viewer(url, &dest)? {
                ViewerInstall::Downloaded => output.info("Viewer downloaded"),
                ViewerInstall::FallbackStub => {
                    output.warning("Viewer download failed; wrote runtime fallback stub");
                }
            }
        }

        output.success("Site processed");
        Ok(())
    }
}

/// Rewrite every HTML page under `site_dir` in place.
///
/// Returns (pages seen, pages rewritten). Pages without diagram
/// references are left untouched on disk.
fn rewrite_site(session: &BuildSession, site_dir: &Path) -> Result<(usize, usize), CliError> {
    let pattern = site_dir.join("**/*.html");
    let pattern = pattern.to_string_lossy();

    let mut pages = 0;
    let mut rewritten = 0;
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        let html = std::fs::read_to_string(&path)?;
        let dest_dir = path.parent().unwrap_or(site_dir);

        let processed = session.rewrite_page(&html, dest_dir);
        if processed != html {
            std::fs::write(&path, processed)?;
            rewritten += 1;
        }
        pages += 1;
    }
    Ok((pages, rewritten))
}
