use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub server_addr: String,
    /// Secret every forwarded handshake must carry. When unset, direct
    /// connections are accepted too.
    pub forwarding_secret: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self { Self::from_lookup(|key| env::var(key).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let server_host = "0.0.0.0";
        let server_port = lookup("SERVER_PORT").unwrap_or("25565".to_owned());

        ServerConfig {
            server_addr: format!("{server_host}:{server_port}"),
            forwarding_secret: lookup("FORWARDING_SECRET").filter(|secret| !secret.is_empty()),
        }
    }
}
