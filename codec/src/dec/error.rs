use alloc::string;
use core::{
    error,
    fmt,
    str,
};
use std::io;

#[derive(Debug)]
pub enum DecodeError {
    Context {
        context: String,
        error: Box<DecodeError>,
    },
    Io(io::Error),
    UnexpectedEnd,
    InvalidUtf8(str::Utf8Error),
    InvalidVarInt,
    InvalidJson(json::Error),
    NegativeLength(i32),
    StringTooLong {
        length: usize,
        max: usize,
    },
    /// A frame announcing more bytes than a packet may hold.
    PacketTooLong {
        length: usize,
        max: usize,
    },
}

impl DecodeError {
    #[must_use]
    pub fn context(
        self,
        context: impl Into<String>,
    ) -> Self {
        DecodeError::Context {
            context: context.into(),
            error: Box::new(self),
        }
    }

    /// Strips every layer of context and returns the underlying error.
    #[must_use]
    pub fn root(&self) -> &DecodeError {
        match self {
            DecodeError::Context {
                error, ..
            } => error.root(),
            other => other,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            DecodeError::Context {
                context,
                error,
            } => write!(f, "{context}: {error}"),
            DecodeError::Io(err) => write!(f, "IO error: {err}"),
            DecodeError::UnexpectedEnd => write!(f, "Unexpected end of file"),
            DecodeError::InvalidUtf8(err) => write!(f, "Invalid UTF-8 sequence: {err}"),
            DecodeError::InvalidVarInt => write!(f, "Invalid VarInt"),
            DecodeError::InvalidJson(err) => write!(f, "Invalid JSON: {err}"),
            DecodeError::NegativeLength(len) => write!(f, "Negative length prefix: {len}"),
            DecodeError::StringTooLong {
                length,
                max,
            } => write!(f, "String too long (got {length} bytes, max {max})"),
            DecodeError::PacketTooLong {
                length,
                max,
            } => write!(f, "Packet too long (got {length} bytes, max {max})"),
        }
    }
}

impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DecodeError::Context {
                error, ..
            } => Some(error.as_ref()),
            DecodeError::Io(err) => Some(err),
            DecodeError::InvalidUtf8(err) => Some(err),
            DecodeError::InvalidJson(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => DecodeError::UnexpectedEnd,
            _ => DecodeError::Io(err),
        }
    }
}

impl From<str::Utf8Error> for DecodeError {
    fn from(err: str::Utf8Error) -> Self { DecodeError::InvalidUtf8(err) }
}

impl From<string::FromUtf8Error> for DecodeError {
    fn from(err: string::FromUtf8Error) -> Self { DecodeError::InvalidUtf8(err.utf8_error()) }
}

impl From<json::Error> for DecodeError {
    fn from(err: json::Error) -> Self { DecodeError::InvalidJson(err) }
}

pub trait DecodeErrorContext {
    #[must_use]
    fn err_context(
        self,
        context: impl Into<String>,
    ) -> Self;
}

impl<T> DecodeErrorContext for Result<T, DecodeError> {
    fn err_context(
        self,
        context: impl Into<String>,
    ) -> Self {
        self.map_err(|err| err.context(context))
    }
}
