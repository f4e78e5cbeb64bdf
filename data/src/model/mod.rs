mod forwarding;
mod handshake;
mod login;
mod profile;

pub use forwarding::{
    FLOODGATE_MARKER,
    FORWARDING_SECRET_PROPERTY,
    LEGACY_SEPARATOR,
    LegacyForwardingCodec,
    LegacyForwardingData,
    is_forwarding_payload,
};
pub use handshake::{
    FORGE_HOSTNAME_TOKEN,
    HANDSHAKE_PACKET_ID,
    Handshake,
    HandshakeCodec,
    HandshakeLimits,
    Intent,
    MAXIMUM_ADDRESS_LENGTH,
    MAXIMUM_HOSTNAME_LENGTH,
    SessionHandler,
};
pub use login::{
    Hello,
    LOGIN_ACKNOWLEDGED_PACKET_ID,
    LOGIN_START_PACKET_ID,
    LOGIN_SUCCESS_PACKET_ID,
    LoginSuccess,
    WireProperty,
};
pub use profile::{
    GameProfile,
    Property,
};
