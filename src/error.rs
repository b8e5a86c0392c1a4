use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(
        "{} not found and no environment variables set!\n\n\
         Please create a .env file:\n  \
         1. Copy .env.example to .env\n  \
         2. Add your Ably API key to the .env file\n\n\
         Example:\n  \
         cp .env.example .env\n  \
         # Then edit .env and add your API key",
        .path.display()
    )]
    MissingEnvFile { path: PathBuf },
    #[error("{key} not found in environment or .env file")]
    MissingKey { key: &'static str },
    #[error("{key} is still set to its example value; put your actual key in .env")]
    PlaceholderValue { key: &'static str },
    #[error("{key} is set in the environment but is not valid UTF-8")]
    NotUnicode { key: &'static str },
    #[error("{key} is set but empty")]
    EmptyValue { key: &'static str },
    #[error("template file not found: {}", .path.display())]
    TemplateNotFound { path: PathBuf },
    #[error("failed to access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| BuildError::Io { path, source }
    }
}
