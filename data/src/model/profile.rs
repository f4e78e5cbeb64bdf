use codec::Uuid;
use json::JsonValue;

use crate::error::ForwardingErrorReason;

const PROPERTY_NAME_KEY: &str = "name";
const PROPERTY_VALUE_KEY: &str = "value";
const PROPERTY_SIGNATURE_KEY: &str = "signature";

/// A named, signed attribute of a player profile, e.g. skin textures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
    /// Empty when the property is unsigned.
    pub signature: String,
}

impl Property {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Property {
            name: name.into(),
            value: value.into(),
            signature: signature.into(),
        }
    }

    #[must_use]
    pub fn is_signed(&self) -> bool { !self.signature.is_empty() }

    /// Reads `{"name", "value", "signature"}`; all three keys must hold
    /// strings. `entry` is the position in the enclosing array, used for
    /// error reporting.
    pub(crate) fn from_json(
        entry: usize,
        object: &JsonValue,
    ) -> Result<Self, ForwardingErrorReason> {
        if !object.is_object() {
            return Err(ForwardingErrorReason::NotAnObject {
                entry,
            });
        }

        let key = |key: &'static str| {
            object[key]
                .as_str()
                .map(str::to_owned)
                .ok_or(ForwardingErrorReason::MissingKey {
                    entry,
                    key,
                })
        };

        Ok(Property {
            name: key(PROPERTY_NAME_KEY)?,
            value: key(PROPERTY_VALUE_KEY)?,
            signature: key(PROPERTY_SIGNATURE_KEY)?,
        })
    }

    pub(crate) fn to_json(&self) -> JsonValue {
        let mut object = json::object::Object::with_capacity(3);
        object.insert(PROPERTY_NAME_KEY, self.name.as_str().into());
        object.insert(PROPERTY_VALUE_KEY, self.value.as_str().into());
        object.insert(PROPERTY_SIGNATURE_KEY, self.signature.as_str().into());
        JsonValue::Object(object)
    }
}

/// The identity a player logs in with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameProfile {
    pub id: Uuid,
    pub name: String,
    pub properties: Vec<Property>,
}

impl GameProfile {
    #[must_use]
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        properties: Vec<Property>,
    ) -> Self {
        GameProfile {
            id,
            name: name.into(),
            properties,
        }
    }
}
