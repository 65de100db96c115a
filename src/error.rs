use std::fmt;

/// The kind of context error.
///
/// Construction-time violations (`InvalidArgument`) fail fast since they
/// indicate a wiring bug; write-path failures (`Precondition`, `Io`,
/// `Timeout`) always propagate to the caller. Read-path degradation is
/// deliberately *not* an error kind - parameter lookups fall back to
/// absent/empty instead (see the adapter modules).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A host object had the wrong type or a required object was absent
    /// at construction time
    InvalidArgument,
    /// A write operation was attempted without a required response side
    Precondition,
    /// The underlying transport failed during a write or redirect
    Io,
    /// A bounded wait on a host completion signal expired
    Timeout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "invalid argument"),
            ErrorKind::Precondition => write!(f, "precondition violation"),
            ErrorKind::Io => write!(f, "I/O error"),
            ErrorKind::Timeout => write!(f, "timeout"),
        }
    }
}

/// An error raised by a context adapter or factory.
///
/// Carries a kind for programmatic matching, a human-readable message, and
/// optionally the underlying host failure as a source.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Creates a construction-time invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidArgument,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a precondition-violation error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Precondition,
            message: message.into(),
            source: None,
        }
    }

    /// Creates an I/O error without an underlying cause.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Io,
            message: message.into(),
            source: None,
        }
    }

    /// Creates an I/O error preserving the underlying host failure.
    pub fn io_caused_by(
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind: ErrorKind::Io,
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }

    /// Creates a bounded-wait timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            message: message.into(),
            source: None,
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::io_caused_by("write to host stream failed", e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_includes_kind_and_message() {
        let err = Error::precondition("response side is absent");
        assert_eq!(
            err.to_string(),
            "precondition violation: response side is absent"
        );
    }

    #[test]
    fn io_error_preserves_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = Error::io_caused_by("redirect failed", cause);
        assert_eq!(err.kind(), ErrorKind::Io);
        let source = err.source().expect("cause preserved");
        assert!(source.to_string().contains("pipe closed"));
    }

    #[test]
    fn timeout_has_no_source() {
        let err = Error::timeout("host never signalled");
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.source().is_none());
    }

    #[test]
    fn std_io_error_converts_to_io_kind() {
        let err: Error = std::io::Error::other("boom").into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
