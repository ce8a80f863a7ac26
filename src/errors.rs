use std::{error, fmt, io};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A value, or a map key, that has no representation in the wire format.
pub struct TypeError(pub String);

impl TypeError {
    /// Creates a new `TypeError`
    ///
    /// # Arguments
    ///
    /// * `s: & str` - The message associated with the error.
    pub fn new(s: &str) -> Self { TypeError(s.to_string()) }

    pub(crate) fn value<D: fmt::Display>(what: D) -> Self {
        TypeError(format!("can't serialize {}", what))
    }

    pub(crate) fn key<D: fmt::Display>(what: D) -> Self {
        TypeError(format!("can't serialize {} as key", what))
    }
}

impl error::Error for TypeError {}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(&self.0) }
}

/// Everything that can abort an encode.
///
/// Nothing is retried, and no partially encoded output is handed back alongside an
/// error.
#[derive(Debug)]
pub enum Error {
    /// An unsupported value or map key.
    Type(TypeError),
    /// The sink given to [`Encoder`](crate::encoding::Encoder) failed.
    Io(io::Error),
    /// A [`Marshaler`](crate::Marshaler) failed; its error is passed through as is.
    Marshal(failure::Error),
}

impl Error {
    /// The [`TypeError`], if this is one.
    pub fn as_type_error(&self) -> Option<&TypeError> {
        match self {
            Error::Type(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Type(e) => write!(f, "type error: {}", e),
            Error::Io(e) => write!(f, "i/o error: {}", e),
            Error::Marshal(e) => write!(f, "marshaler failed: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Type(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::Marshal(_) => None,
        }
    }
}

impl From<TypeError> for Error {
    fn from(e: TypeError) -> Error { Error::Type(e) }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error { Error::Io(e) }
}
