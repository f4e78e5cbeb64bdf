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
    Config(String),
    Io(io::Error),
    BackendConnect(io::Error),
    TcpStreamClone(io::Error),
    Decode(DecodeError),
    Encode(EncodeError),
    Handshake(HandshakeError),
    UnexpectedPacketId(i32),
    Refused(Refusal),
}

/// Why the session layer turned a handshake down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// Forwarded without the configured secret.
    UntrustedForwarding,
    /// Login attempted without forwarding data while direct connections are
    /// disabled.
    DirectConnection,
    /// Login attempted with a protocol version the proxy cannot read.
    UnsupportedVersion(i32),
}

impl fmt::Display for Refusal {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::UntrustedForwarding => write!(f, "forwarding secret missing or invalid"),
            Self::DirectConnection => write!(f, "direct connections are not accepted"),
            Self::UnsupportedVersion(protocol) => {
                write!(f, "unsupported protocol version {protocol}")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Config(message) => write!(f, "Configuration error: {message}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::BackendConnect(err) => write!(f, "Failed to connect to server: {err}"),
            Self::TcpStreamClone(err) => write!(f, "TCP stream clone error: {err}"),
            Self::Decode(err) => write!(f, "Decode error: {err}"),
            Self::Encode(err) => write!(f, "Encode error: {err}"),
            Self::Handshake(err) => write!(f, "Handshake error: {err}"),
            Self::UnexpectedPacketId(id) => write!(f, "Unexpected packet ID: {id:#04x}"),
            Self::Refused(refusal) => write!(f, "Handshake refused: {refusal}"),
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
