use std::io;
use std::net::TcpStream;

use codec::VarInt;
use codec::dec::{
    Decode,
    DecodeError,
    DecodeErrorContext as _,
    decode_length,
};
use codec::enc::{
    Encode,
    EncodeError,
    EncodeErrorContext as _,
};

use crate::ProtocolVersion;

/// Largest frame a client may announce: the biggest length a 3-byte VarInt
/// can carry.
pub const MAX_PACKET_LENGTH: usize = (1 << 21) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Serverbound,
    Clientbound,
}

/// What the packet layer knows when a packet body is decoded or encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketContext {
    pub direction: Direction,
    pub protocol_version: ProtocolVersion,
}

impl PacketContext {
    #[must_use]
    pub const fn serverbound(protocol_version: ProtocolVersion) -> Self {
        PacketContext {
            direction: Direction::Serverbound,
            protocol_version,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: i32,
    pub data: Vec<u8>,
}

impl Packet {
    #[must_use]
    pub fn new(
        id: i32,
        data: Vec<u8>,
    ) -> Self {
        Packet {
            id,
            data,
        }
    }

    /// Encodes `body` into a fresh buffer and wraps it with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if the body could not be encoded.
    pub fn from_body<T: Encode>(
        id: i32,
        body: &T,
    ) -> Result<Self, EncodeError> {
        let mut data = Vec::new();
        body.encode(&mut data)
            .err_context("Failed to encode packet body")?;
        Ok(Packet::new(id, data))
    }

    /// Decodes the body as `T`, ignoring the id.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the body could not be decoded.
    pub fn body<T: Decode>(&self) -> Result<T, DecodeError> {
        T::decode(&mut self.data.as_slice()).err_context("Failed to decode packet body")
    }
}

impl Decode for Packet {
    fn decode<R: io::Read>(reader: &mut R) -> Result<Self, DecodeError> {
        let len = decode_length(reader).err_context("Failed to decode packet length")?;

        if len > MAX_PACKET_LENGTH {
            return Err(DecodeError::PacketTooLong {
                length: len,
                max: MAX_PACKET_LENGTH,
            });
        }

        let mut data = vec![0; len];
        reader.read_exact(&mut data)?;
        let mut data = data.as_slice();

        Ok(Packet {
            id: VarInt::decode(&mut data)
                .err_context("Failed to decode packet id")?
                .value(),
            data: data.to_vec(),
        })
    }
}

impl Encode for Packet {
    fn encode<W: io::Write>(
        &self,
        writer: &mut W,
    ) -> Result<usize, EncodeError> {
        let id = VarInt::new(self.id);
        let data = &self.data;

        let packet_len = VarInt::from_len(id.len() + data.len())?;

        let mut written_bytes = 0;

        written_bytes += packet_len.encode(writer)?;
        written_bytes += id.encode(writer)?;

        writer.write_all(data)?;

        Ok(written_bytes + data.len())
    }
}

pub trait ReadPacket {
    /// Reads a packet from the given reader.
    ///
    /// # Returns
    ///
    /// The decoded packet.
    ///
    /// # Errors
    ///
    /// If the packet could not be decoded.
    fn read_packet(&mut self) -> Result<Packet, DecodeError>;
}

impl ReadPacket for TcpStream {
    fn read_packet(&mut self) -> Result<Packet, DecodeError> {
        Packet::decode(self).err_context("Failed to decode packet")
    }
}

pub trait WritePacket {
    /// Writes a packet to the given writer.
    ///
    /// # Returns
    ///
    /// The number of bytes written.
    ///
    /// # Errors
    ///
    /// If the packet could not be encoded.
    fn write_packet(
        &mut self,
        packet: &Packet,
    ) -> Result<usize, EncodeError>;
}

impl WritePacket for TcpStream {
    fn write_packet(
        &mut self,
        packet: &Packet,
    ) -> Result<usize, EncodeError> {
        packet.encode(self).err_context("Failed to encode packet")
    }
}
