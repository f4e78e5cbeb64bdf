extern crate alloc;

mod config;
mod error;
mod event;
mod ingress;

use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

use data::model::{
    HandshakeCodec,
    LegacyForwardingCodec,
};

use crate::config::ProxyConfig;
use crate::error::Error;
use crate::event::{
    ListenerBoundEvent,
    ListenerType,
};
use crate::ingress::Ingress;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ProxyConfig::from_env()?;

    let listener = TcpListener::bind(&config.proxy_addr).map_err(Error::Io)?;
    let event = ListenerBoundEvent::new(
        listener.local_addr().map_err(Error::Io)?,
        ListenerType::Minecraft,
    );
    log::info!("{event}");
    log::info!("Forwarding players to {}", config.server_addr);

    let codec = HandshakeCodec::with_forwarding(
        config.limits,
        LegacyForwardingCodec::new().with_secret_aliases(&config.secret_aliases),
    );
    let ingress = Arc::new(Ingress::new(config, codec));

    for client in listener.incoming() {
        let client = match client {
            Ok(client) => client,
            Err(err) => {
                log::error!("Failed to accept client connection: {err}");
                continue;
            }
        };

        let ingress = Arc::clone(&ingress);
        thread::spawn(move || {
            let peer = client.peer_addr().ok();
            if let Err(err) = ingress.process(client) {
                match peer {
                    Some(peer) => log::warn!("Closing connection from {peer}: {err}"),
                    None => log::warn!("Closing connection: {err}"),
                }
            }
        });
    }

    Ok(())
}
