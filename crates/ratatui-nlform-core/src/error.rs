use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A theme was requested while no [`crate::theme::ThemeProvider`] scope was active.
    #[error("theme requested outside of a theme provider scope")]
    NoThemeScope,

    #[error("invalid theme configuration: {0}")]
    ThemeParse(#[from] toml::de::Error),

    #[error("failed to read theme file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
