//! Legacy player-data forwarding.
//!
//! An upstream proxy that cannot use a dedicated forwarding channel appends
//! the player's identity to the handshake's server address, NUL-separated:
//!
//! ```text
//! hostname \0 [^Floodgate^... \0] socket hostname \0 undashed uuid \0 json properties
//! ```
//!
//! The forwarding secret travels as a profile property with a reserved name.

use core::fmt;
use core::iter::Peekable;
use core::str::Split;

use codec::Uuid;
use json::JsonValue;

use super::profile::{
    GameProfile,
    Property,
};
use crate::error::{
    ForwardingError,
    ForwardingErrorReason,
    ForwardingField,
};
use crate::json_codec::{
    JsonCodec,
    StandardJson,
};

pub const LEGACY_SEPARATOR: char = '\0';

/// Prefix of the player data blob injected by the Floodgate extension.
pub const FLOODGATE_MARKER: &str = "^Floodgate^";

/// Name of the property that carries the forwarding secret.
pub const FORWARDING_SECRET_PROPERTY: &str = "bungeeguard-token";

/// Fewest parts an address needs before it is read as a forwarding payload.
const MIN_FORWARDED_PARTS: usize = 4;

/// Identity forwarded by an upstream proxy.
#[derive(Clone, PartialEq, Eq)]
pub struct LegacyForwardingData {
    server_hostname: String,
    socket_address_hostname: String,
    unique_id: Uuid,
    properties: Vec<Property>,
    platform_player_data: Option<String>,
    forwarding_secret: Option<String>,
}

impl LegacyForwardingData {
    #[must_use]
    pub fn new(
        server_hostname: impl Into<String>,
        socket_address_hostname: impl Into<String>,
        unique_id: Uuid,
        properties: Vec<Property>,
    ) -> Self {
        LegacyForwardingData {
            server_hostname: server_hostname.into(),
            socket_address_hostname: socket_address_hostname.into(),
            unique_id,
            properties,
            platform_player_data: None,
            forwarding_secret: None,
        }
    }

    #[must_use]
    pub fn with_platform_player_data(
        mut self,
        data: impl Into<String>,
    ) -> Self {
        self.platform_player_data = Some(data.into());
        self
    }

    #[must_use]
    pub fn with_forwarding_secret(
        mut self,
        secret: impl Into<String>,
    ) -> Self {
        self.forwarding_secret = Some(secret.into());
        self
    }

    /// The hostname the client dialled.
    #[must_use]
    pub fn server_hostname(&self) -> &str { &self.server_hostname }

    /// The client address as seen by the upstream proxy.
    #[must_use]
    pub fn socket_address_hostname(&self) -> &str { &self.socket_address_hostname }

    #[must_use]
    pub fn unique_id(&self) -> Uuid { self.unique_id }

    /// Profile properties, without the forwarding secret.
    #[must_use]
    pub fn properties(&self) -> &[Property] { &self.properties }

    #[must_use]
    pub fn platform_player_data(&self) -> Option<&str> { self.platform_player_data.as_deref() }

    #[must_use]
    pub fn forwarding_secret(&self) -> Option<&str> { self.forwarding_secret.as_deref() }

    /// Whether the payload carried `expected` as its forwarding secret.
    ///
    /// Runs in time independent of where the secrets first differ.
    #[must_use]
    pub fn is_trusted(
        &self,
        expected: &str,
    ) -> bool {
        let Some(secret) = self.forwarding_secret.as_deref() else {
            return false;
        };

        secret.len() == expected.len()
            && secret
                .bytes()
                .zip(expected.bytes())
                .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
                == 0
    }

    /// Builds the login profile of the forwarded player.
    #[must_use]
    pub fn game_profile(
        &self,
        name: impl Into<String>,
    ) -> GameProfile {
        GameProfile::new(self.unique_id, name, self.properties.clone())
    }
}

impl fmt::Debug for LegacyForwardingData {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("LegacyForwardingData")
            .field("server_hostname", &self.server_hostname)
            .field("socket_address_hostname", &self.socket_address_hostname)
            .field("unique_id", &format_args!("{}", self.unique_id))
            .field("properties", &self.properties)
            .field("platform_player_data", &self.platform_player_data)
            .field(
                "forwarding_secret",
                &self.forwarding_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Reads and writes the forwarding payload embedded in a server address.
#[derive(Debug, Clone)]
pub struct LegacyForwardingCodec<J = StandardJson> {
    json: J,
    secret_aliases: Vec<String>,
}

impl LegacyForwardingCodec<StandardJson> {
    #[must_use]
    pub fn new() -> Self { Self::with_json(StandardJson) }
}

impl Default for LegacyForwardingCodec<StandardJson> {
    fn default() -> Self { Self::new() }
}

impl<J: JsonCodec> LegacyForwardingCodec<J> {
    #[must_use]
    pub fn with_json(json: J) -> Self {
        LegacyForwardingCodec {
            json,
            secret_aliases: Vec::new(),
        }
    }

    /// Also treats properties named `aliases` as the forwarding secret when
    /// decoding. Encoding always uses [`FORWARDING_SECRET_PROPERTY`].
    #[must_use]
    pub fn with_secret_aliases<I, S>(
        mut self,
        aliases: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secret_aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    fn is_secret_property(
        &self,
        name: &str,
    ) -> bool {
        name == FORWARDING_SECRET_PROPERTY || self.secret_aliases.iter().any(|alias| alias == name)
    }

    /// Decodes the forwarding payload of `address`.
    ///
    /// Returns `Ok(None)` when the address has fewer than four parts, i.e.
    /// the client connected directly.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardingError`] when the address has four or more parts but
    /// one of them is missing or malformed.
    pub fn decode(
        &self,
        address: &str,
    ) -> Result<Option<LegacyForwardingData>, ForwardingError> {
        if !is_forwarding_payload(address) {
            return Ok(None);
        }

        let mut cursor = FieldCursor::new(address);

        let server_hostname = cursor.next(ForwardingField::ServerHostname)?;
        let platform_player_data = cursor.next_if(ForwardingField::PlatformPlayerData, |value| {
            value.starts_with(FLOODGATE_MARKER)
        });
        let socket_address_hostname = cursor.next(ForwardingField::SocketAddressHostname)?;

        let unique_id = cursor.next(ForwardingField::UniqueId)?;
        let unique_id = Uuid::parse_undashed(unique_id.value)
            .map_err(|err| unique_id.error(ForwardingErrorReason::InvalidUuid(err)))?;

        let properties = cursor.next(ForwardingField::Properties)?;
        let (properties, forwarding_secret) = self
            .decode_properties(properties.value)
            .map_err(|reason| properties.error(reason))?;

        Ok(Some(LegacyForwardingData {
            server_hostname: server_hostname.value.to_owned(),
            socket_address_hostname: socket_address_hostname.value.to_owned(),
            unique_id,
            properties,
            platform_player_data: platform_player_data.map(|field| field.value.to_owned()),
            forwarding_secret,
        }))
    }

    /// Splits the property array into profile properties and the secret.
    ///
    /// The first property with a reserved name supplies the secret; every
    /// property with a reserved name is dropped from the profile.
    fn decode_properties(
        &self,
        raw: &str,
    ) -> Result<(Vec<Property>, Option<String>), ForwardingErrorReason> {
        let parsed = self
            .json
            .parse(raw)
            .map_err(ForwardingErrorReason::InvalidJson)?;

        let JsonValue::Array(entries) = parsed else {
            return Err(ForwardingErrorReason::NotAnArray);
        };

        let mut properties = Vec::with_capacity(entries.len());
        let mut forwarding_secret = None;

        for (entry, object) in entries.iter().enumerate() {
            let property = Property::from_json(entry, object)?;

            if self.is_secret_property(&property.name) {
                forwarding_secret.get_or_insert(property.value);
                continue;
            }

            properties.push(property);
        }

        Ok((properties, forwarding_secret))
    }

    /// Encodes `data` into a server address.
    ///
    /// `secret` overrides the stored secret; when either is present it is
    /// appended to the property array under [`FORWARDING_SECRET_PROPERTY`]
    /// with an empty signature.
    #[must_use]
    pub fn encode(
        &self,
        data: &LegacyForwardingData,
        secret: Option<&str>,
    ) -> String {
        let mut encoded = String::new();

        encoded.push_str(&data.server_hostname);
        encoded.push(LEGACY_SEPARATOR);

        if let Some(platform_player_data) = &data.platform_player_data {
            encoded.push_str(platform_player_data);
            encoded.push(LEGACY_SEPARATOR);
        }

        encoded.push_str(&data.socket_address_hostname);
        encoded.push(LEGACY_SEPARATOR);
        encoded.push_str(&data.unique_id.undashed().to_string());
        encoded.push(LEGACY_SEPARATOR);

        let secret = secret
            .or(data.forwarding_secret.as_deref())
            .map(|secret| Property::new(FORWARDING_SECRET_PROPERTY, secret, ""));

        let properties = data
            .properties
            .iter()
            .chain(secret.as_ref())
            .map(Property::to_json)
            .collect();

        encoded.push_str(&self.json.stringify(&JsonValue::Array(properties)));
        encoded
    }
}

/// Whether `address` has enough parts to be read as a forwarding payload.
#[must_use]
pub fn is_forwarding_payload(address: &str) -> bool {
    payload_parts(address).count() >= MIN_FORWARDED_PARTS
}

/// Parts of `address`, with trailing empty parts dropped.
fn payload_parts(address: &str) -> Split<'_, char> {
    address
        .trim_end_matches(LEGACY_SEPARATOR)
        .split(LEGACY_SEPARATOR)
}

/// Walks the parts of a forwarding payload left to right.
struct FieldCursor<'a> {
    parts: Peekable<Split<'a, char>>,
    index: usize,
}

/// A part consumed by a [`FieldCursor`].
struct CursorField<'a> {
    field: ForwardingField,
    index: usize,
    value: &'a str,
}

impl CursorField<'_> {
    fn error(
        &self,
        reason: ForwardingErrorReason,
    ) -> ForwardingError {
        ForwardingError {
            field: self.field,
            index: self.index,
            reason,
        }
    }
}

impl<'a> FieldCursor<'a> {
    fn new(address: &'a str) -> Self {
        FieldCursor {
            parts: payload_parts(address).peekable(),
            index: 0,
        }
    }

    fn next(
        &mut self,
        field: ForwardingField,
    ) -> Result<CursorField<'a>, ForwardingError> {
        let index = self.index;
        let value = self.parts.next().ok_or(ForwardingError {
            field,
            index,
            reason: ForwardingErrorReason::Missing,
        })?;

        self.index += 1;

        Ok(CursorField {
            field,
            index,
            value,
        })
    }

    /// Consumes the next part only if `predicate` accepts it.
    fn next_if(
        &mut self,
        field: ForwardingField,
        predicate: impl FnOnce(&str) -> bool,
    ) -> Option<CursorField<'a>> {
        let value = self.parts.next_if(|value| predicate(value))?;
        let index = self.index;
        self.index += 1;

        Some(CursorField {
            field,
            index,
            value,
        })
    }
}

#[allow(clippy::unwrap_used, reason = "tests")]
#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const TEXTURES: &str = r#"[{"name":"textures","value":"v","signature":"s"}]"#;

    fn codec() -> LegacyForwardingCodec { LegacyForwardingCodec::new() }

    fn sample() -> LegacyForwardingData {
        LegacyForwardingData::new(
            "play.example.com",
            "127.0.0.1",
            Uuid::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff),
            vec![Property::new("textures", "v", "s")],
        )
    }

    #[test]
    fn decode_forwarded_address() {
        let address =
            format!("play.example.com\0127.0.0.1\000112233445566778899aabbccddeeff\0{TEXTURES}");

        let data = codec().decode(&address).unwrap().unwrap();

        assert_eq!(data.server_hostname(), "play.example.com");
        assert_eq!(data.socket_address_hostname(), "127.0.0.1");
        assert_eq!(
            data.unique_id().to_string(),
            "00112233-4455-6677-8899-aabbccddeeff"
        );
        assert_eq!(data.properties(), &[Property::new("textures", "v", "s")]);
        assert_eq!(data.platform_player_data(), None);
        assert_eq!(data.forwarding_secret(), None);
    }

    #[test]
    fn plain_hostname_is_not_forwarded() {
        assert!(codec().decode("play.example.com").unwrap().is_none());
        assert!(codec().decode("a\0b\0c").unwrap().is_none());
        // Garbage is fine as long as there are fewer than four parts.
        assert!(codec().decode("a\0not a uuid\0{{{").unwrap().is_none());
        // Trailing separators do not count as parts.
        assert!(codec().decode("a\0b\0c\0\0").unwrap().is_none());
    }

    #[test]
    fn decode_platform_player_data() {
        let address = format!(
            "play.example.com\0^Floodgate^blob\0127.0.0.1\0{}\0[]",
            "0123456789abcdef0123456789abcdef"
        );

        let data = codec().decode(&address).unwrap().unwrap();

        assert_eq!(data.platform_player_data(), Some("^Floodgate^blob"));
        assert_eq!(data.socket_address_hostname(), "127.0.0.1");
        assert_eq!(
            data.unique_id().to_string(),
            "01234567-89ab-cdef-0123-456789abcdef"
        );
        assert!(data.properties().is_empty());
    }

    #[test]
    fn platform_player_data_shifts_missing_properties() {
        let address = "host\0^Floodgate^blob\0127.0.0.1\00123456789abcdef0123456789abcdef";

        let err = codec().decode(address).unwrap_err();

        assert_eq!(err.field, ForwardingField::Properties);
        assert_eq!(err.index, 4);
        assert!(matches!(err.reason, ForwardingErrorReason::Missing));
    }

    #[test]
    fn extract_forwarding_secret() {
        let address = concat!(
            "host\0127.0.0.1\00123456789abcdef0123456789abcdef\0",
            r#"[{"name":"textures","value":"v","signature":"s"},"#,
            r#"{"name":"bungeeguard-token","value":"SECRET","signature":""},"#,
            r#"{"name":"bungeeguard-token","value":"SECOND","signature":""}]"#,
        );

        let data = codec().decode(address).unwrap().unwrap();

        assert_eq!(data.forwarding_secret(), Some("SECRET"));
        assert_eq!(data.properties(), &[Property::new("textures", "v", "s")]);
    }

    #[test]
    fn extract_secret_under_alias() {
        let address = concat!(
            "host\0127.0.0.1\00123456789abcdef0123456789abcdef\0",
            r#"[{"name":"forwarding-secret","value":"SECRET","signature":""}]"#,
        );

        let plain = codec().decode(address).unwrap().unwrap();
        assert_eq!(plain.forwarding_secret(), None);
        assert_eq!(plain.properties().len(), 1);

        let aliased = codec()
            .with_secret_aliases(["forwarding-secret"])
            .decode(address)
            .unwrap()
            .unwrap();
        assert_eq!(aliased.forwarding_secret(), Some("SECRET"));
        assert!(aliased.properties().is_empty());
    }

    #[test]
    fn reject_malformed_uuid() {
        let address = format!("host\0127.0.0.1\0not-a-uuid\0{TEXTURES}");

        let err = codec().decode(&address).unwrap_err();

        assert_eq!(err.field, ForwardingField::UniqueId);
        assert_eq!(err.index, 2);
        assert!(matches!(err.reason, ForwardingErrorReason::InvalidUuid(_)));
    }

    #[test]
    fn reject_malformed_properties() {
        let base = "host\0127.0.0.1\00123456789abcdef0123456789abcdef\0";

        let err = codec().decode(&format!("{base}[{{")).unwrap_err();
        assert_eq!(err.field, ForwardingField::Properties);
        assert_eq!(err.index, 3);
        assert!(matches!(err.reason, ForwardingErrorReason::InvalidJson(_)));

        let err = codec().decode(&format!("{base}{{}}")).unwrap_err();
        assert!(matches!(err.reason, ForwardingErrorReason::NotAnArray));

        let err = codec()
            .decode(&format!(r#"{base}[{{"name":"textures","value":"v"}}]"#))
            .unwrap_err();
        assert!(matches!(err.reason, ForwardingErrorReason::MissingKey {
            entry: 0,
            key: "signature"
        }));
    }

    #[test]
    fn ignore_trailing_parts() {
        let address = format!("{}\0extra\0more", codec().encode(&sample(), None));
        assert_eq!(codec().decode(&address).unwrap().unwrap(), sample());
    }

    #[test]
    fn encode_without_secret() {
        let encoded = codec().encode(&sample(), None);

        assert_eq!(
            encoded,
            format!("play.example.com\0127.0.0.1\000112233445566778899aabbccddeeff\0{TEXTURES}")
        );
        assert_eq!(codec().decode(&encoded).unwrap().unwrap(), sample());
    }

    #[test]
    fn encode_platform_player_data() {
        let data = sample().with_platform_player_data("^Floodgate^blob");

        let encoded = codec().encode(&data, None);

        assert!(encoded.starts_with("play.example.com\0^Floodgate^blob\0127.0.0.1\0"));
        assert_eq!(codec().decode(&encoded).unwrap().unwrap(), data);
    }

    #[test]
    fn encode_supplied_secret() {
        let encoded = codec().encode(&sample(), Some("SECRET"));

        assert!(encoded.ends_with(
            r#"{"name":"bungeeguard-token","value":"SECRET","signature":""}]"#
        ));

        let decoded = codec().decode(&encoded).unwrap().unwrap();
        assert_eq!(decoded.forwarding_secret(), Some("SECRET"));
        assert_eq!(decoded.properties(), sample().properties());
    }

    #[test]
    fn supplied_secret_overrides_stored_secret() {
        let data = sample().with_forwarding_secret("STORED");

        let stored = codec().decode(&codec().encode(&data, None)).unwrap().unwrap();
        assert_eq!(stored.forwarding_secret(), Some("STORED"));

        let replaced = codec()
            .decode(&codec().encode(&data, Some("OVERRIDE")))
            .unwrap()
            .unwrap();
        assert_eq!(replaced.forwarding_secret(), Some("OVERRIDE"));
        assert!(
            replaced
                .properties()
                .iter()
                .all(|property| property.name != FORWARDING_SECRET_PROPERTY)
        );
    }

    struct Pretty;

    impl JsonCodec for Pretty {
        fn parse(
            &self,
            text: &str,
        ) -> Result<JsonValue, json::Error> {
            json::parse(text)
        }

        fn stringify(
            &self,
            value: &JsonValue,
        ) -> String {
            value.pretty(2)
        }
    }

    #[test]
    fn use_supplied_json_codec() {
        let codec = LegacyForwardingCodec::with_json(Pretty);

        let encoded = codec.encode(&sample(), None);

        assert!(encoded.ends_with("\n]"));
        assert_eq!(codec.decode(&encoded).unwrap().unwrap(), sample());
    }

    #[test]
    fn check_trust() {
        assert!(!sample().is_trusted("SECRET"));

        let data = sample().with_forwarding_secret("SECRET");
        assert!(data.is_trusted("SECRET"));
        assert!(!data.is_trusted("SECRET2"));
        assert!(!data.is_trusted("SECRE7"));
        assert!(!data.is_trusted(""));
    }

    #[test]
    fn debug_redacts_secret() {
        let data = sample().with_forwarding_secret("SECRET");
        let debug = format!("{data:?}");
        assert!(!debug.contains("SECRET"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn game_profile_from_forwarded_identity() {
        let profile = sample().game_profile("Steve");
        assert_eq!(profile.id, sample().unique_id());
        assert_eq!(profile.name, "Steve");
        assert_eq!(profile.properties, sample().properties());
    }
}
