use codec::Uuid;
use codec::dec::Decode;
use codec::enc::Encode;

use super::profile::{
    GameProfile,
    Property,
};

pub const LOGIN_START_PACKET_ID: i32 = 0x00;
pub const LOGIN_SUCCESS_PACKET_ID: i32 = 0x02;
pub const LOGIN_ACKNOWLEDGED_PACKET_ID: i32 = 0x03;

/// Login Start, sent by the client right after a login handshake.
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode)]
pub struct Hello {
    pub name: String,
    pub uuid: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode)]
pub struct WireProperty {
    pub name: String,
    pub value: String,
    #[codec(prefixed_option)]
    pub signature: Option<String>,
}

impl From<&Property> for WireProperty {
    fn from(property: &Property) -> Self {
        WireProperty {
            name: property.name.clone(),
            value: property.value.clone(),
            signature: property.is_signed().then(|| property.signature.clone()),
        }
    }
}

/// Login Success, carrying the profile the server accepted.
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode)]
pub struct LoginSuccess {
    pub uuid: Uuid,
    pub name: String,
    pub properties: Vec<WireProperty>,
}

impl From<&GameProfile> for LoginSuccess {
    fn from(profile: &GameProfile) -> Self {
        LoginSuccess {
            uuid: profile.id,
            name: profile.name.clone(),
            properties: profile.properties.iter().map(WireProperty::from).collect(),
        }
    }
}
