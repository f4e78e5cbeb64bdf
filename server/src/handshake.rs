use std::net::TcpStream;

use data::ProtocolVersion;
use data::model::{
    Handshake,
    HandshakeCodec,
};
use data::packet::{
    PacketContext,
    ReadPacket as _,
};

use crate::config::ServerConfig;
use crate::error::Error;

pub fn process(
    stream: &mut TcpStream,
    codec: &HandshakeCodec,
    config: &ServerConfig,
) -> Result<Handshake, Error> {
    let handshake = handle_intention(stream, codec)?;
    verify_forwarding(&handshake, config)?;
    Ok(handshake)
}

fn handle_intention(
    stream: &mut TcpStream,
    codec: &HandshakeCodec,
) -> Result<Handshake, Error> {
    let packet = stream.read_packet()?;

    let handshake =
        codec.decode_packet(&packet, PacketContext::serverbound(ProtocolVersion::LATEST))?;

    Ok(handshake)
}

/// With a secret configured, only a proxy holding it may connect.
fn verify_forwarding(
    handshake: &Handshake,
    config: &ServerConfig,
) -> Result<(), Error> {
    let Some(secret) = config.forwarding_secret.as_deref() else {
        return Ok(());
    };

    match handshake.forwarding() {
        Some(forwarding) if forwarding.is_trusted(secret) => Ok(()),
        _ => Err(Error::UntrustedForwarding),
    }
}
