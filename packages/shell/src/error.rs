use crate::io::IoError;

/// Errors that end a shell session.
#[derive(thiserror::Error, Debug)]
pub enum ShellError {
    #[error("failed to start the terminal: {0}")]
    Terminal(#[from] std::io::Error),

    #[error(transparent)]
    Io(#[from] IoError),
}
