extern crate alloc;

mod config;
mod error;

mod handshake;
mod login;
mod status;

use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

use data::model::{
    HandshakeCodec,
    Intent,
};

use crate::config::ServerConfig;
use crate::error::Error;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Arc::new(ServerConfig::from_env());

    let listener = TcpListener::bind(&config.server_addr).map_err(Error::Io)?;
    log::info!("Listening on {}", listener.local_addr().map_err(Error::Io)?);
    if config.forwarding_secret.is_none() {
        log::warn!("FORWARDING_SECRET is unset, accepting unauthenticated connections");
    }

    for stream in listener.incoming() {
        let mut stream = match stream {
            Ok(stream) => stream,
            Err(err) => {
                log::error!("Failed to accept connection: {err}");
                continue;
            }
        };

        let config = Arc::clone(&config);
        thread::spawn(move || {
            let codec = HandshakeCodec::new();

            let handshake = match handshake::process(&mut stream, &codec, &config) {
                Ok(handshake) => handshake,
                Err(err) => {
                    log::warn!("Error handling handshake: {err}");
                    return;
                }
            };

            match handshake.intent() {
                Intent::Status => {
                    if let Err(err) = status::process(&mut stream, handshake.protocol_version()) {
                        log::warn!("Error handling status: {err}");
                    }
                }
                Intent::Login | Intent::Transfer => match login::process(&mut stream, &handshake) {
                    Ok(profile) => log::info!("{} ({}) logged in", profile.name, profile.id),
                    Err(err) => log::warn!("Error handling login: {err}"),
                },
            }
        });
    }

    Ok(())
}
