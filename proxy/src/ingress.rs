use std::io;
use std::net::{
    Shutdown,
    SocketAddr,
    TcpStream,
};
use std::thread;

use data::ProtocolVersion;
use data::error::HandshakeError;
use data::model::{
    GameProfile,
    Handshake,
    HandshakeCodec,
    Hello,
    LOGIN_START_PACKET_ID,
    LegacyForwardingData,
    SessionHandler,
};
use data::packet::{
    Packet,
    PacketContext,
    ReadPacket as _,
    WritePacket as _,
};

use crate::config::ProxyConfig;
use crate::error::{
    Error,
    Refusal,
};

/// Oldest version whose Login Start carries a mandatory UUID.
const MIN_LOGIN_VERSION: ProtocolVersion = ProtocolVersion::V1_20_2;

/// Accepts client connections and hands them to the backend server.
pub struct Ingress {
    config: ProxyConfig,
    codec: HandshakeCodec,
}

impl Ingress {
    pub fn new(
        config: ProxyConfig,
        codec: HandshakeCodec,
    ) -> Self {
        Ingress {
            config,
            codec,
        }
    }

    pub fn process(
        &self,
        mut client: TcpStream,
    ) -> Result<(), Error> {
        let peer = client.peer_addr().map_err(Error::Io)?;

        let packet = client.read_packet()?;
        let handshake = self
            .codec
            .decode_packet(&packet, PacketContext::serverbound(ProtocolVersion::LATEST))
            .inspect_err(|err| {
                if let HandshakeError::MalformedForwardingPayload(err) = err {
                    log::warn!(
                        "Malformed forwarding payload from {peer}: {} (field {})",
                        err.field,
                        err.index
                    );
                }
            })?;

        let mut session = IngressSession::new(&self.config, peer);
        if !handshake.handle(&mut session) {
            return Err(Error::Refused(
                session.refusal.unwrap_or(Refusal::UntrustedForwarding),
            ));
        }

        let mut server = TcpStream::connect(&self.config.server_addr).map_err(Error::BackendConnect)?;

        if handshake.intent().is_login() {
            self.forward_login(&handshake, peer, &mut client, &mut server)?;
        } else {
            let packet = self.codec.encode_packet(
                &handshake,
                PacketContext::serverbound(handshake.protocol_version()),
            )?;
            server.write_packet(&packet)?;
        }

        relay_both(client, server)
    }

    /// Reads Login Start from the client and replays the handshake and Login
    /// Start to the server, with the player's identity forwarded.
    fn forward_login(
        &self,
        handshake: &Handshake,
        peer: SocketAddr,
        client: &mut TcpStream,
        server: &mut TcpStream,
    ) -> Result<(), Error> {
        let packet = client.read_packet()?;
        if packet.id != LOGIN_START_PACKET_ID {
            return Err(Error::UnexpectedPacketId(packet.id));
        }
        let hello = packet.body::<Hello>()?;

        let profile = match handshake.forwarding() {
            Some(forwarding) => forwarding.game_profile(hello.name),
            None => GameProfile::new(hello.uuid, hello.name, Vec::new()),
        };
        log::info!("{} ({}) logging in from {peer}", profile.name, profile.id);

        let forwarded = forwarded_identity(handshake, peer, &profile);
        let address = self
            .codec
            .forwarding()
            .encode(&forwarded, self.config.backend_forwarding_secret.as_deref());

        let context = PacketContext::serverbound(handshake.protocol_version());
        let backend_handshake = Handshake::new(
            handshake.protocol_version(),
            address,
            handshake.port(),
            handshake.intent(),
        );
        server.write_packet(&self.codec.encode_packet(&backend_handshake, context)?)?;

        let hello = Hello {
            name: profile.name,
            uuid: profile.id,
        };
        server.write_packet(&Packet::from_body(LOGIN_START_PACKET_ID, &hello)?)?;

        Ok(())
    }
}

/// The identity the server receives: the upstream one when the client came
/// through another proxy, else the client's own address.
fn forwarded_identity(
    handshake: &Handshake,
    peer: SocketAddr,
    profile: &GameProfile,
) -> LegacyForwardingData {
    let socket_address_hostname = handshake
        .forwarding()
        .map_or_else(|| peer.ip().to_string(), |forwarding| {
            forwarding.socket_address_hostname().to_owned()
        });

    let forwarded = LegacyForwardingData::new(
        handshake.server_address(),
        socket_address_hostname,
        profile.id,
        profile.properties.clone(),
    );

    match handshake
        .forwarding()
        .and_then(LegacyForwardingData::platform_player_data)
    {
        Some(platform_player_data) => forwarded.with_platform_player_data(platform_player_data),
        None => forwarded,
    }
}

/// Decides whether a handshake may go through to the server.
struct IngressSession<'a> {
    config: &'a ProxyConfig,
    peer: SocketAddr,
    refusal: Option<Refusal>,
}

impl<'a> IngressSession<'a> {
    fn new(
        config: &'a ProxyConfig,
        peer: SocketAddr,
    ) -> Self {
        IngressSession {
            config,
            peer,
            refusal: None,
        }
    }

    fn check(
        &self,
        handshake: &Handshake,
    ) -> Result<(), Refusal> {
        match handshake.forwarding() {
            Some(forwarding) => {
                let trusted = self
                    .config
                    .forwarding_secret
                    .as_deref()
                    .is_none_or(|secret| forwarding.is_trusted(secret));
                if !trusted {
                    return Err(Refusal::UntrustedForwarding);
                }
            }
            None => {
                log::debug!("Direct connection from {}", self.peer);
                if handshake.intent().is_login() && !self.config.accept_direct_connections {
                    return Err(Refusal::DirectConnection);
                }
            }
        }

        let protocol = handshake.protocol_version().protocol();
        if handshake.intent().is_login()
            && (!handshake.protocol_version().is_known() || protocol < MIN_LOGIN_VERSION.protocol())
        {
            return Err(Refusal::UnsupportedVersion(protocol));
        }

        Ok(())
    }
}

impl SessionHandler for IngressSession<'_> {
    fn handle_handshake(
        &mut self,
        handshake: &Handshake,
    ) -> bool {
        self.refusal = self.check(handshake).err();
        self.refusal.is_none()
    }
}

fn relay_both(
    client: TcpStream,
    server: TcpStream,
) -> Result<(), Error> {
    let client_read = client.try_clone().map_err(Error::TcpStreamClone)?;
    let server_read = server.try_clone().map_err(Error::TcpStreamClone)?;

    let upstream = thread::spawn(move || relay(client_read, server));
    relay(server_read, client);
    _ = upstream.join();

    Ok(())
}

fn relay(
    mut from: TcpStream,
    mut to: TcpStream,
) {
    _ = io::copy(&mut from, &mut to);
    _ = to.shutdown(Shutdown::Write);
}

#[allow(clippy::unwrap_used, reason = "tests")]
#[cfg(test)]
mod tests {
    use codec::Uuid;
    use data::model::{
        HandshakeLimits,
        Intent,
        LegacyForwardingCodec,
        Property,
    };

    use super::*;

    const UUID: &str = "069a79f444e94726a5befca90e38aaf5";

    fn config(
        forwarding_secret: Option<&str>,
        accept_direct_connections: bool,
    ) -> ProxyConfig {
        ProxyConfig {
            proxy_addr: "0.0.0.0:35565".to_owned(),
            server_addr: "127.0.0.1:25565".to_owned(),
            forwarding_secret: forwarding_secret.map(str::to_owned),
            secret_aliases: Vec::new(),
            backend_forwarding_secret: None,
            accept_direct_connections,
            limits: HandshakeLimits::default(),
        }
    }

    fn peer() -> SocketAddr { "10.0.0.5:51234".parse().unwrap() }

    fn decode(address: &str) -> Handshake {
        let handshake = Handshake::new(ProtocolVersion::LATEST, address, 25565, Intent::Login);
        let context = PacketContext::serverbound(ProtocolVersion::LATEST);
        let codec = HandshakeCodec::new();
        let packet = codec.encode_packet(&handshake, context).unwrap();
        codec.decode_packet(&packet, context).unwrap()
    }

    fn forwarded(secret: Option<&str>) -> Handshake {
        let data = LegacyForwardingData::new(
            "mc.example.com",
            "203.0.113.7",
            Uuid::parse_undashed(UUID).unwrap(),
            vec![Property::new("textures", "v", "s")],
        )
        .with_platform_player_data("bedrock");
        decode(&LegacyForwardingCodec::new().encode(&data, secret))
    }

    fn check(
        config: &ProxyConfig,
        handshake: &Handshake,
    ) -> Option<Refusal> {
        let mut session = IngressSession::new(config, peer());
        let consumed = handshake.handle(&mut session);
        assert_eq!(consumed, session.refusal.is_none());
        session.refusal
    }

    #[test]
    fn accept_trusted_forwarding() {
        let config = config(Some("s3cret"), false);
        assert_eq!(check(&config, &forwarded(Some("s3cret"))), None);
    }

    #[test]
    fn refuse_untrusted_forwarding() {
        let config = config(Some("s3cret"), true);
        assert_eq!(
            check(&config, &forwarded(Some("wrong"))),
            Some(Refusal::UntrustedForwarding)
        );
        assert_eq!(check(&config, &forwarded(None)), Some(Refusal::UntrustedForwarding));
    }

    #[test]
    fn direct_connections() {
        let handshake = decode("mc.example.com");
        assert_eq!(check(&config(None, true), &handshake), None);
        assert_eq!(
            check(&config(None, false), &handshake),
            Some(Refusal::DirectConnection)
        );

        let status = Handshake::new(ProtocolVersion::LATEST, "mc.example.com", 25565, Intent::Status);
        assert_eq!(check(&config(None, false), &status), None);
    }

    #[test]
    fn refuse_old_login() {
        let config = config(None, true);

        let handshake = Handshake::new(ProtocolVersion::V1_20, "mc.example.com", 25565, Intent::Login);
        assert_eq!(check(&config, &handshake), Some(Refusal::UnsupportedVersion(763)));

        let handshake = Handshake::new(ProtocolVersion::Unknown(9999), "mc.example.com", 25565, Intent::Login);
        assert_eq!(check(&config, &handshake), Some(Refusal::UnsupportedVersion(9999)));

        let handshake = Handshake::new(ProtocolVersion::V1_20, "mc.example.com", 25565, Intent::Status);
        assert_eq!(check(&config, &handshake), None);
    }

    #[test]
    fn forward_upstream_identity() {
        let handshake = forwarded(None);
        let profile = handshake.forwarding().unwrap().game_profile("Notch");

        let forwarded = forwarded_identity(&handshake, peer(), &profile);
        assert_eq!(forwarded.server_hostname(), "mc.example.com");
        assert_eq!(forwarded.socket_address_hostname(), "203.0.113.7");
        assert_eq!(forwarded.unique_id(), profile.id);
        assert_eq!(forwarded.properties(), profile.properties.as_slice());
        assert_eq!(forwarded.platform_player_data(), Some("bedrock"));
        assert_eq!(forwarded.forwarding_secret(), None);
    }

    #[test]
    fn forward_direct_identity() {
        let handshake = decode("mc.example.com");
        let profile = GameProfile::new(Uuid::parse_undashed(UUID).unwrap(), "Notch", Vec::new());

        let forwarded = forwarded_identity(&handshake, peer(), &profile);
        assert_eq!(forwarded.socket_address_hostname(), "10.0.0.5");
        assert_eq!(forwarded.platform_player_data(), None);

        let address = LegacyForwardingCodec::new().encode(&forwarded, Some("backend"));
        let decoded = LegacyForwardingCodec::new().decode(&address).unwrap().unwrap();
        assert!(decoded.is_trusted("backend"));
        assert_eq!(decoded.unique_id(), profile.id);
    }
}
