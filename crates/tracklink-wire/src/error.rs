/// Errors that can occur while encoding or decoding wire primitives.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The stream ended before a complete value could be read.
    #[error("truncated read (stream ended mid-value)")]
    TruncatedRead,

    /// A declared string length exceeds the allowed maximum.
    ///
    /// The length prefix comes straight off the wire, so it is
    /// bounds-checked before any allocation happens.
    #[error("string too long ({len} bytes, max {max})")]
    StringTooLong { len: usize, max: usize },

    /// A string payload was not valid UTF-8.
    #[error("invalid UTF-8 in string payload: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// An I/O error occurred while reading or writing.
    #[error("wire I/O error: {0}")]
    Io(std::io::Error),
}

impl From<std::io::Error> for WireError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            WireError::TruncatedRead
        } else {
            WireError::Io(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, WireError>;
