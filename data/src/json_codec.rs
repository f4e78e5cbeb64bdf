//! The structured JSON capability handed to codecs that embed JSON text.

use json::JsonValue;

/// Parses and serializes JSON documents on behalf of a codec.
pub trait JsonCodec {
    /// # Errors
    ///
    /// Returns [`json::Error`] if `text` is not a valid JSON document.
    fn parse(
        &self,
        text: &str,
    ) -> Result<JsonValue, json::Error>;

    fn stringify(
        &self,
        value: &JsonValue,
    ) -> String;
}

/// Compact JSON backed by the `json` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardJson;

impl JsonCodec for StandardJson {
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
        value.dump()
    }
}

impl<J> JsonCodec for &J
where
    J: JsonCodec + ?Sized,
{
    fn parse(
        &self,
        text: &str,
    ) -> Result<JsonValue, json::Error> {
        (**self).parse(text)
    }

    fn stringify(
        &self,
        value: &JsonValue,
    ) -> String {
        (**self).stringify(value)
    }
}
