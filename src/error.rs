use core::fmt;

/// Classifies the failure modes of font loading.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A read past the end of the font data, or a bad table offset.
    Io,
    /// The container is malformed: wrong magic number, missing required
    /// table, or an unsupported sfnt version or cmap subtable.
    Container,
    /// A simple or composite glyph description could not be decoded.
    Glyph,
    /// A code point is not in the character map, or a glyph index is out of
    /// range.
    NotFound,
}

/// The error type returned by the font decoder.
///
/// Carries one [`ErrorKind`] plus a static human-readable message. The
/// geometry pipeline never returns errors; it produces an empty edge list
/// for degenerate input instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
}

impl Error {
    pub const fn new(kind: ErrorKind, message: &'static str) -> Error {
        Error {
            kind,
            message,
        }
    }

    pub const fn io(message: &'static str) -> Error {
        Error::new(ErrorKind::Io, message)
    }

    pub const fn container(message: &'static str) -> Error {
        Error::new(ErrorKind::Container, message)
    }

    pub const fn glyph(message: &'static str) -> Error {
        Error::new(ErrorKind::Glyph, message)
    }

    pub const fn not_found(message: &'static str) -> Error {
        Error::new(ErrorKind::NotFound, message)
    }

    /// The kind of failure this error represents.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable message attached to this error.
    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Io => "io",
            ErrorKind::Container => "container",
            ErrorKind::Glyph => "glyph",
            ErrorKind::NotFound => "not found",
        };
        write!(f, "{}: {}", kind, self.message)
    }
}

impl std::error::Error for Error {}
