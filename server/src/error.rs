use core::{
    error,
    fmt,
};
use std::io;

use codec::dec::DecodeError;
use codec::enc::EncodeError;
use data::error::HandshakeError;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Decode(DecodeError),
    Encode(EncodeError),
    Handshake(HandshakeError),
    /// The handshake lacked forwarding data or carried the wrong secret.
    UntrustedForwarding,
    UnexpectedPacketId(i32),
    InvalidPacketData { context: String },
}

impl fmt::Display for Error {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::Decode(err) => write!(f, "Decode error: {err}"),
            Self::Encode(err) => write!(f, "Encode error: {err}"),
            Self::Handshake(err) => write!(f, "Handshake error: {err}"),
            Self::UntrustedForwarding => write!(f, "Forwarding secret missing or invalid"),
            Self::UnexpectedPacketId(id) => write!(f, "Unexpected packet ID: {id:#04x}"),
            Self::InvalidPacketData {
                context,
            } => write!(f, "Invalid packet data: {context}"),
        }
    }
}

impl error::Error for Error {}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self { Self::Decode(err) }
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self { Self::Encode(err) }
}

impl From<HandshakeError> for Error {
    fn from(err: HandshakeError) -> Self { Self::Handshake(err) }
}
