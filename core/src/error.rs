use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A file or directory could not be read or written.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Input was readable but structurally invalid.
    #[error("parse error in {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    /// The language model could not be located or loaded.
    #[error("model setup failed: {0}")]
    Setup(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Io { path: path.as_ref().to_path_buf(), source }
    }

    pub(crate) fn parse(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Error::Parse { path: path.as_ref().to_path_buf(), message: message.into() }
    }
}
