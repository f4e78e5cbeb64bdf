use std::net::TcpStream;

use data::model::{
    GameProfile,
    Handshake,
    Hello,
    LOGIN_ACKNOWLEDGED_PACKET_ID,
    LOGIN_START_PACKET_ID,
    LOGIN_SUCCESS_PACKET_ID,
    LoginSuccess,
};
use data::packet::{
    Packet,
    ReadPacket as _,
    WritePacket as _,
};

use crate::error::Error;

pub fn process(
    stream: &mut TcpStream,
    handshake: &Handshake,
) -> Result<GameProfile, Error> {
    let profile = handle_hello(stream, handshake)?;
    handle_login_acknowledged(stream)?;
    Ok(profile)
}

fn handle_hello(
    stream: &mut TcpStream,
    handshake: &Handshake,
) -> Result<GameProfile, Error> {
    let packet = stream.read_packet()?;
    if packet.id != LOGIN_START_PACKET_ID {
        return Err(Error::UnexpectedPacketId(packet.id));
    }

    let hello = packet.body::<Hello>()?;
    let profile = login_profile(handshake, hello);

    let packet = Packet::from_body(LOGIN_SUCCESS_PACKET_ID, &LoginSuccess::from(&profile))?;
    stream.write_packet(&packet)?;

    Ok(profile)
}

/// The forwarded identity wins over what the client claims.
fn login_profile(
    handshake: &Handshake,
    hello: Hello,
) -> GameProfile {
    match handshake.forwarding() {
        Some(forwarding) => forwarding.game_profile(hello.name),
        None => GameProfile::new(hello.uuid, hello.name, Vec::new()),
    }
}

fn handle_login_acknowledged(stream: &mut TcpStream) -> Result<(), Error> {
    let packet = stream.read_packet()?;

    if packet.id != LOGIN_ACKNOWLEDGED_PACKET_ID {
        return Err(Error::UnexpectedPacketId(packet.id));
    }

    if !packet.data.is_empty() {
        return Err(Error::InvalidPacketData {
            context: "login_acknowledged packet data should be empty".to_owned(),
        });
    }

    Ok(())
}
