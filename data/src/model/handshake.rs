use core::fmt;
use std::io;

use codec::VarInt;
use codec::dec::{
    Decode,
    DecodeErrorContext as _,
    decode_bounded_string,
};
use codec::enc::{
    Encode,
    EncodeError,
    EncodeErrorContext as _,
};

use super::forwarding::{
    LegacyForwardingCodec,
    LegacyForwardingData,
};
use crate::ProtocolVersion;
use crate::error::HandshakeError;
use crate::json_codec::{
    JsonCodec,
    StandardJson,
};
use crate::packet::{
    Packet,
    PacketContext,
};

pub const HANDSHAKE_PACKET_ID: i32 = 0x00;

/// Token legacy Forge clients append to the server address.
pub const FORGE_HOSTNAME_TOKEN: &str = "\0FML\0";

/// Longest hostname accepted, leaving room for the Forge token on top of a
/// 255 byte DNS name.
pub const MAXIMUM_HOSTNAME_LENGTH: usize = 255 + FORGE_HOSTNAME_TOKEN.len() + 1;

/// Longest raw server address accepted. Forwarding payloads carry signed
/// properties and are far longer than a hostname.
pub const MAXIMUM_ADDRESS_LENGTH: usize = 32_767;

/// What the client wants to do after the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Status,
    Login,
    Transfer,
}

impl Intent {
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Status => 1,
            Self::Login => 2,
            Self::Transfer => 3,
        }
    }

    #[must_use]
    pub const fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Self::Status),
            2 => Some(Self::Login),
            3 => Some(Self::Transfer),
            _ => None,
        }
    }

    /// Whether the connection proceeds to the login phase.
    #[must_use]
    pub const fn is_login(self) -> bool { matches!(self, Self::Login | Self::Transfer) }
}

impl fmt::Display for Intent {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            Self::Status => "status",
            Self::Login => "login",
            Self::Transfer => "transfer",
        })
    }
}

/// The first packet of every connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    protocol_version: ProtocolVersion,
    server_address: String,
    port: u16,
    intent: Intent,
    forwarding: Option<LegacyForwardingData>,
}

impl Handshake {
    #[must_use]
    pub fn new(
        protocol_version: ProtocolVersion,
        server_address: impl Into<String>,
        port: u16,
        intent: Intent,
    ) -> Self {
        Handshake {
            protocol_version,
            server_address: server_address.into(),
            port,
            intent,
            forwarding: None,
        }
    }

    #[must_use]
    pub fn protocol_version(&self) -> ProtocolVersion { self.protocol_version }

    /// The address the client dialled. For a forwarded connection this is
    /// the forwarded hostname, not the raw payload.
    #[must_use]
    pub fn server_address(&self) -> &str { &self.server_address }

    #[must_use]
    pub fn port(&self) -> u16 { self.port }

    #[must_use]
    pub fn intent(&self) -> Intent { self.intent }

    /// The raw next state sent on the wire.
    #[must_use]
    pub fn next_status(&self) -> i32 { self.intent.id() }

    /// Identity forwarded by an upstream proxy, `None` for direct clients.
    #[must_use]
    pub fn forwarding(&self) -> Option<&LegacyForwardingData> { self.forwarding.as_ref() }

    /// Hands the handshake to the session layer.
    ///
    /// Returns whether the handler consumed it.
    pub fn handle(
        &self,
        handler: &mut dyn SessionHandler,
    ) -> bool {
        handler.handle_handshake(self)
    }
}

/// The session layer's view of a decoded handshake.
pub trait SessionHandler {
    /// Returns `true` if the handshake was consumed.
    fn handle_handshake(
        &mut self,
        handshake: &Handshake,
    ) -> bool;
}

/// Size bounds applied while decoding a handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeLimits {
    /// Bound of the hostname, raw or forwarded.
    pub max_hostname_length: usize,
    /// Bound of the raw address string, checked before it is read.
    pub max_address_length: usize,
}

impl Default for HandshakeLimits {
    fn default() -> Self {
        HandshakeLimits {
            max_hostname_length: MAXIMUM_HOSTNAME_LENGTH,
            max_address_length: MAXIMUM_ADDRESS_LENGTH,
        }
    }
}

/// Reads and writes handshake packet bodies.
#[derive(Debug, Clone)]
pub struct HandshakeCodec<J = StandardJson> {
    limits: HandshakeLimits,
    forwarding: LegacyForwardingCodec<J>,
}

impl HandshakeCodec<StandardJson> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_forwarding(HandshakeLimits::default(), LegacyForwardingCodec::new())
    }
}

impl Default for HandshakeCodec<StandardJson> {
    fn default() -> Self { Self::new() }
}

impl<J: JsonCodec> HandshakeCodec<J> {
    #[must_use]
    pub fn with_forwarding(
        limits: HandshakeLimits,
        forwarding: LegacyForwardingCodec<J>,
    ) -> Self {
        HandshakeCodec {
            limits,
            forwarding,
        }
    }

    #[must_use]
    pub fn limits(&self) -> HandshakeLimits { self.limits }

    #[must_use]
    pub fn forwarding(&self) -> &LegacyForwardingCodec<J> { &self.forwarding }

    /// Decodes a handshake body.
    ///
    /// The handshake announces its own protocol version, so `_context` is not
    /// consulted.
    ///
    /// # Errors
    ///
    /// - [`HandshakeError::OversizedField`] if the address or hostname is
    ///   longer than the configured limits;
    /// - [`HandshakeError::MalformedForwardingPayload`] if the address looks
    ///   like a forwarding payload but does not parse;
    /// - [`HandshakeError::UnsupportedIntent`] for an unknown next state;
    /// - [`HandshakeError::Decode`] for truncated or invalid framing.
    pub fn decode<R: io::Read>(
        &self,
        reader: &mut R,
        _context: PacketContext,
    ) -> Result<Handshake, HandshakeError> {
        let protocol_version = VarInt::decode(reader)
            .err_context("Failed to decode protocol version")?
            .value();

        let address = decode_bounded_string(reader, self.limits.max_address_length)
            .map_err(|err| HandshakeError::from_string_error("server address", err))?;

        let forwarding = self.forwarding.decode(&address)?;
        let server_address = match &forwarding {
            Some(data) => data.server_hostname().to_owned(),
            None => address,
        };

        if server_address.len() > self.limits.max_hostname_length {
            return Err(HandshakeError::OversizedField {
                field: "server hostname",
                length: server_address.len(),
                max: self.limits.max_hostname_length,
            });
        }

        let port = u16::decode(reader).err_context("Failed to decode port")?;

        let next_status = VarInt::decode(reader)
            .err_context("Failed to decode next status")?
            .value();
        let intent =
            Intent::from_id(next_status).ok_or(HandshakeError::UnsupportedIntent(next_status))?;

        Ok(Handshake {
            protocol_version: ProtocolVersion::from_protocol(protocol_version),
            server_address,
            port,
            intent,
            forwarding,
        })
    }

    /// Decodes a framed handshake packet.
    ///
    /// # Errors
    ///
    /// Returns [`HandshakeError::UnexpectedPacketId`] if `packet` is not a
    /// handshake, otherwise see [`HandshakeCodec::decode`].
    pub fn decode_packet(
        &self,
        packet: &Packet,
        context: PacketContext,
    ) -> Result<Handshake, HandshakeError> {
        if packet.id != HANDSHAKE_PACKET_ID {
            return Err(HandshakeError::UnexpectedPacketId(packet.id));
        }

        self.decode(&mut packet.data.as_slice(), context)
    }

    /// Encodes a handshake body.
    ///
    /// Forwarding data is not re-encoded: to forward an identity, build the
    /// handshake with [`LegacyForwardingCodec::encode`] as its address.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if writing fails.
    pub fn encode<W: io::Write>(
        &self,
        handshake: &Handshake,
        writer: &mut W,
        _context: PacketContext,
    ) -> Result<usize, EncodeError> {
        let mut written_bytes = VarInt::new(handshake.protocol_version.protocol())
            .encode(writer)
            .err_context("Failed to encode protocol version")?;
        written_bytes += handshake
            .server_address
            .encode(writer)
            .err_context("Failed to encode server address")?;
        written_bytes += handshake
            .port
            .encode(writer)
            .err_context("Failed to encode port")?;
        written_bytes += VarInt::new(handshake.next_status())
            .encode(writer)
            .err_context("Failed to encode next status")?;

        Ok(written_bytes)
    }

    /// Encodes a framed handshake packet.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if the body could not be encoded.
    pub fn encode_packet(
        &self,
        handshake: &Handshake,
        context: PacketContext,
    ) -> Result<Packet, EncodeError> {
        let mut data = Vec::new();
        self.encode(handshake, &mut data, context)?;
        Ok(Packet::new(HANDSHAKE_PACKET_ID, data))
    }
}
