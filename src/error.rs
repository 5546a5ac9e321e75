use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration could not be loaded; the session never starts.
    #[display("could not load configuration")]
    Config,
    /// The log subscriber could not be installed.
    #[display("could not initialize logging")]
    Logging,
    /// Reading commands or writing replies failed.
    #[display("terminal i/o failed")]
    Io,
    /// A line that isn't a well-formed command. The session carries on.
    #[display("{_0}")]
    Command(#[error(not(source))] String),
    /// A well-formed command the store refused. The session carries on.
    #[display("{_0}")]
    Refused(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if the session can continue after reporting this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Command(_) | Self::Refused(_))
    }
}

/// Re-raise a library error under `wrap`, keeping the library's message as
/// the user-facing text.
pub(crate) fn explain<T, K>(result: std::result::Result<T, exn::Exn<K>>, wrap: fn(String) -> ErrorKind) -> Result<T>
where
    K: std::error::Error + Send + Sync + 'static,
{
    use exn::ResultExt;
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            let message = (*err).to_string();
            Err(err).or_raise(|| wrap(message))
        },
    }
}
