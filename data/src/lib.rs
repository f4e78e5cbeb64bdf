pub mod error;
pub mod json_codec;
pub mod model;
pub mod packet;
pub mod protocol_version;

pub use protocol_version::ProtocolVersion;
