use core::{
    error,
    fmt,
};
use std::io;

#[derive(Debug)]
pub enum EncodeError {
    Context {
        context: String,
        error: Box<EncodeError>,
    },
    Io(io::Error),
    /// A length that does not fit the VarInt prefix in front of it.
    LengthOverflow(usize),
}

impl EncodeError {
    #[must_use]
    pub fn context(
        self,
        context: impl Into<String>,
    ) -> Self {
        EncodeError::Context {
            context: context.into(),
            error: Box::new(self),
        }
    }

    /// Strips every layer of context and returns the underlying error.
    #[must_use]
    pub fn root(&self) -> &EncodeError {
        match self {
            EncodeError::Context {
                error, ..
            } => error.root(),
            other => other,
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            EncodeError::Context {
                context,
                error,
            } => write!(f, "{context}: {error}"),
            EncodeError::Io(err) => write!(f, "IO error: {err}"),
            EncodeError::LengthOverflow(len) => {
                write!(f, "Length {len} does not fit in a VarInt prefix")
            }
        }
    }
}

impl error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            EncodeError::Context {
                error, ..
            } => Some(error.as_ref()),
            EncodeError::Io(err) => Some(err),
            EncodeError::LengthOverflow(_) => None,
        }
    }
}

impl From<io::Error> for EncodeError {
    fn from(err: io::Error) -> Self { EncodeError::Io(err) }
}

pub trait EncodeErrorContext {
    #[must_use]
    fn err_context(
        self,
        context: impl Into<String>,
    ) -> Self;
}

impl<T> EncodeErrorContext for Result<T, EncodeError> {
    fn err_context(
        self,
        context: impl Into<String>,
    ) -> Self {
        self.map_err(|err| err.context(context))
    }
}
