use std::env;

use data::model::{
    HandshakeLimits,
    MAXIMUM_HOSTNAME_LENGTH,
};

use crate::error::Error;

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub proxy_addr: String,
    pub server_addr: String,
    /// Secret upstream proxies must forward; unchecked when unset.
    pub forwarding_secret: Option<String>,
    /// Extra property names read as the forwarding secret.
    pub secret_aliases: Vec<String>,
    /// Secret appended when re-emitting a handshake to the server.
    pub backend_forwarding_secret: Option<String>,
    pub accept_direct_connections: bool,
    pub limits: HandshakeLimits,
}

impl ProxyConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> { Self::from_lookup(|key| env::var(key).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let proxy_host = "0.0.0.0";
        let proxy_port = lookup("PROXY_PORT").unwrap_or("35565".to_owned());

        let server_host = lookup("SERVER_HOST").unwrap_or("127.0.0.1".to_owned());
        let server_port = lookup("SERVER_PORT").unwrap_or("25565".to_owned());

        let accept_direct_connections = match lookup("ACCEPT_DIRECT_CONNECTIONS") {
            Some(value) => parse_bool("ACCEPT_DIRECT_CONNECTIONS", &value)?,
            None => true,
        };

        let max_hostname_length = match lookup("MAX_HOSTNAME_LENGTH") {
            Some(value) => value.parse().map_err(|_| {
                Error::Config(format!("MAX_HOSTNAME_LENGTH is not a length: {value:?}"))
            })?,
            None => MAXIMUM_HOSTNAME_LENGTH,
        };

        let secret_aliases = lookup("FORWARDING_SECRET_ALIASES")
            .map(|aliases| {
                aliases
                    .split(',')
                    .map(str::trim)
                    .filter(|alias| !alias.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Ok(ProxyConfig {
            proxy_addr: format!("{proxy_host}:{proxy_port}"),
            server_addr: format!("{server_host}:{server_port}"),
            forwarding_secret: lookup("FORWARDING_SECRET").filter(|secret| !secret.is_empty()),
            secret_aliases,
            backend_forwarding_secret: lookup("BACKEND_FORWARDING_SECRET")
                .filter(|secret| !secret.is_empty()),
            accept_direct_connections,
            limits: HandshakeLimits {
                max_hostname_length,
                ..HandshakeLimits::default()
            },
        })
    }
}

fn parse_bool(
    key: &str,
    value: &str,
) -> Result<bool, Error> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(Error::Config(format!("{key} is not a boolean: {value:?}"))),
    }
}

#[allow(clippy::unwrap_used, reason = "tests")]
#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ProxyConfig, Error> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        ProxyConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.proxy_addr, "0.0.0.0:35565");
        assert_eq!(config.server_addr, "127.0.0.1:25565");
        assert_eq!(config.forwarding_secret, None);
        assert!(config.accept_direct_connections);
        assert_eq!(config.limits, HandshakeLimits::default());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("PROXY_PORT", "25577"),
            ("SERVER_HOST", "backend"),
            ("FORWARDING_SECRET", "s3cret"),
            ("FORWARDING_SECRET_ALIASES", "forwarding-secret, ,other"),
            ("ACCEPT_DIRECT_CONNECTIONS", "false"),
            ("MAX_HOSTNAME_LENGTH", "64"),
        ])
        .unwrap();
        assert_eq!(config.proxy_addr, "0.0.0.0:25577");
        assert_eq!(config.server_addr, "backend:25565");
        assert_eq!(config.forwarding_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.secret_aliases, vec!["forwarding-secret", "other"]);
        assert!(!config.accept_direct_connections);
        assert_eq!(config.limits.max_hostname_length, 64);
    }

    #[test]
    fn reject_invalid_values() {
        assert!(matches!(
            config(&[("ACCEPT_DIRECT_CONNECTIONS", "maybe")]),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            config(&[("MAX_HOSTNAME_LENGTH", "-1")]),
            Err(Error::Config(_))
        ));
    }
}
