use std::net::TcpStream;

use codec::Uuid;
use data::ProtocolVersion;
use data::packet::{
    Packet,
    ReadPacket as _,
    WritePacket as _,
};
use json::JsonValue;

use crate::error::Error;

const STATUS_PACKET_ID: i32 = 0x00;

pub fn process(
    stream: &mut TcpStream,
    protocol_version: ProtocolVersion,
) -> Result<(), Error> {
    handle_status_request(stream, protocol_version)?;
    handle_ping_request(stream)?;
    Ok(())
}

fn handle_status_request(
    stream: &mut TcpStream,
    protocol_version: ProtocolVersion,
) -> Result<(), Error> {
    let packet = stream.read_packet()?;

    if packet.id != STATUS_PACKET_ID || !packet.data.is_empty() {
        return Err(Error::InvalidPacketData {
            context: "status_request packet data should be empty".to_owned(),
        });
    }

    let packet = Packet::from_body(STATUS_PACKET_ID, &status_payload(protocol_version))?;
    stream.write_packet(&packet)?;

    Ok(())
}

/// Advertises the client's own version when it is one we know, so the
/// client shows the server as compatible.
fn status_payload(protocol_version: ProtocolVersion) -> JsonValue {
    let version = if protocol_version.is_known() {
        protocol_version
    } else {
        ProtocolVersion::LATEST
    };
    let name = version.name().unwrap_or_default();
    let protocol = version.protocol();

    json::object! {
        version: {
            name: name,
            protocol: protocol,
        },
        players: {
            max: 20,
            online: 0,
            sample: [
                {
                    id: Uuid::null().to_string(),
                    name: "Anonymous Player",
                },
            ],
        },
        description: {
            text: "minecraft-rs forwarding backend",
            color: "#d34516",
        },
    }
}

fn handle_ping_request(stream: &mut TcpStream) -> Result<(), Error> {
    let packet = stream.read_packet()?;

    // The pong shares the ping's id and payload.
    stream.write_packet(&packet)?;

    Ok(())
}
