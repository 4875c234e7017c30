//! CLI error types.

use dio_assets::InstallError;
use dio_embed::ConfigError;

use crate::config::ConfigFileError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    ConfigFile(#[from] ConfigFileError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Install(#[from] InstallError),

    #[error("{0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{0}")]
    Walk(#[from] glob::GlobError),
}
