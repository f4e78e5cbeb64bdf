use core::{
    error,
    fmt,
};

use codec::UuidParseError;
use codec::dec::DecodeError;

/// Why a handshake was refused.
///
/// Every variant is terminal for the connection attempt. An unknown protocol
/// version is not an error: it is carried as
/// [`ProtocolVersion::Unknown`](crate::ProtocolVersion::Unknown).
#[derive(Debug)]
pub enum HandshakeError {
    /// Truncated input, an invalid VarInt or invalid UTF-8.
    Decode(DecodeError),
    OversizedField {
        field: &'static str,
        length: usize,
        max: usize,
    },
    UnsupportedIntent(i32),
    /// The address looked like a legacy forwarding payload but did not parse.
    MalformedForwardingPayload(ForwardingError),
    UnexpectedPacketId(i32),
}

impl HandshakeError {
    /// Turns a string read failure into [`HandshakeError::OversizedField`]
    /// when the string exceeded its bound.
    pub(crate) fn from_string_error(
        field: &'static str,
        err: DecodeError,
    ) -> Self {
        if let DecodeError::StringTooLong {
            length,
            max,
        } = *err.root()
        {
            return HandshakeError::OversizedField {
                field,
                length,
                max,
            };
        }

        HandshakeError::Decode(err.context(format!("Failed to decode {field}")))
    }
}

impl fmt::Display for HandshakeError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "Decode error: {err}"),
            Self::OversizedField {
                field,
                length,
                max,
            } => write!(f, "Got a too-long {field} (got {length} bytes, max {max})"),
            Self::UnsupportedIntent(id) => write!(f, "Unsupported handshake intent: {id}"),
            Self::MalformedForwardingPayload(err) => {
                write!(f, "Malformed legacy forwarding payload: {err}")
            }
            Self::UnexpectedPacketId(id) => {
                write!(f, "Expected a handshake packet, got id {id:#04x}")
            }
        }
    }
}

impl error::Error for HandshakeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            Self::MalformedForwardingPayload(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DecodeError> for HandshakeError {
    fn from(err: DecodeError) -> Self { Self::Decode(err) }
}

impl From<ForwardingError> for HandshakeError {
    fn from(err: ForwardingError) -> Self { Self::MalformedForwardingPayload(err) }
}

/// The NUL-separated fields of a legacy forwarding payload, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardingField {
    ServerHostname,
    PlatformPlayerData,
    SocketAddressHostname,
    UniqueId,
    Properties,
}

impl fmt::Display for ForwardingField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            Self::ServerHostname => "server hostname",
            Self::PlatformPlayerData => "platform player data",
            Self::SocketAddressHostname => "socket address hostname",
            Self::UniqueId => "unique id",
            Self::Properties => "properties",
        })
    }
}

#[derive(Debug)]
pub struct ForwardingError {
    pub field: ForwardingField,
    /// Position of the field among the NUL-separated parts.
    pub index: usize,
    pub reason: ForwardingErrorReason,
}

#[derive(Debug)]
pub enum ForwardingErrorReason {
    Missing,
    InvalidUuid(UuidParseError),
    InvalidJson(json::Error),
    NotAnArray,
    /// Property `entry` of the array is not an object.
    NotAnObject {
        entry: usize,
    },
    /// Property `entry` lacks `key` or its value is not a string.
    MissingKey {
        entry: usize,
        key: &'static str,
    },
}

impl fmt::Display for ForwardingError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} (field {}): ", self.field, self.index)?;

        match &self.reason {
            ForwardingErrorReason::Missing => f.write_str("missing"),
            ForwardingErrorReason::InvalidUuid(err) => write!(f, "invalid uuid: {err}"),
            ForwardingErrorReason::InvalidJson(err) => write!(f, "invalid json: {err}"),
            ForwardingErrorReason::NotAnArray => f.write_str("expected a json array"),
            ForwardingErrorReason::NotAnObject {
                entry,
            } => write!(f, "entry {entry} is not an object"),
            ForwardingErrorReason::MissingKey {
                entry,
                key,
            } => write!(f, "entry {entry} has no string {key:?}"),
        }
    }
}

impl error::Error for ForwardingError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.reason {
            ForwardingErrorReason::InvalidUuid(err) => Some(err),
            ForwardingErrorReason::InvalidJson(err) => Some(err),
            _ => None,
        }
    }
}
