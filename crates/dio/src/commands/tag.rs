//! `dio tag` - Markdown lightbox pre-pass over a docs source tree.

use std::path::{Path, PathBuf};

use clap::Args;
use dio_embed::BuildSession;

use crate::config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the `tag` command.
#[derive(Args)]
pub(crate) struct TagArgs {
    /// Markdown source directory to tag in place.
    #[arg(long, value_name = "DIR")]
    docs_dir: PathBuf,

    /// Configuration file (default: discover dio.toml near the sources).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(long, short)]
    pub(crate) verbose: bool,
}

impl TagArgs {
    pub(crate) fn execute(&self, output: &Output) -> Result<(), CliError> {
        let settings = config::load(self.config.as_deref(), &self.docs_dir)?;
        let session = BuildSession::new(settings)?;

        if !session.markdown_tagging_enabled() {
            output.warning("Attribute-block syntax is disabled; nothing to tag");
            return Ok(());
        }

        let (files, tagged) = tag_tree(&session, &self.docs_dir)?;
        output.success(&format!("Scanned {files} files, tagged {tagged}"));
        Ok(())
    }
}

/// Tag every Markdown file under `docs_dir` in place.
///
/// Returns (files seen, files changed).
fn tag_tree(session: &BuildSession, docs_dir: &Path) -> Result<(usize, usize), CliError> {
    let pattern = docs_dir.join("**/*.md");
    let pattern = pattern.to_string_lossy();

    let mut files = 0;
    let mut tagged = 0;
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        let markdown = std::fs::read_to_string(&path)?;

        let processed = session.tag_markdown(&markdown);
        if processed != markdown {
            std::fs::write(&path, processed)?;
            tagged += 1;
        }
        files += 1;
    }
    Ok((files, tagged))
}

#[cfg(test)]
mod tests {
    use dio_embed::Settings;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_tag_tree_rewrites_only_diagram_references() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("arch.md"),
            "# Arch\n\n![overview](arch.drawio)\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("intro.md"), "# Intro\n\nNo diagrams.\n").unwrap();

        let session = BuildSession::new(Settings::default()).unwrap();
        let (files, tagged) = tag_tree(&session, dir.path()).unwrap();

        assert_eq!((files, tagged), (2, 1));
        let arch = std::fs::read_to_string(dir.path().join("arch.md")).unwrap();
        assert!(arch.contains("![overview](arch.drawio){ .off-glb }"));
    }
}
