use std::io;

use crate::dec::{
    Decode,
    DecodeError,
    DecodeErrorContext as _,
};
use crate::enc::{
    Encode,
    EncodeError,
    EncodeErrorContext as _,
};

/// An optional value behind a boolean presence flag, as the signature of a
/// profile property is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrefixedOption<T>(pub Option<T>);

impl<T> PrefixedOption<T> {
    pub fn into_option(self) -> Option<T> { self.0 }
}

impl<T> From<Option<T>> for PrefixedOption<T> {
    fn from(option: Option<T>) -> Self { PrefixedOption(option) }
}

impl<T: Decode> Decode for PrefixedOption<T> {
    fn decode<R: io::Read>(reader: &mut R) -> Result<Self, DecodeError> {
        let present = bool::decode(reader).err_context("Failed to decode presence flag")?;

        if !present {
            return Ok(PrefixedOption(None));
        }

        T::decode(reader)
            .err_context("Failed to decode prefixed value")
            .map(|value| PrefixedOption(Some(value)))
    }
}

impl<T: Encode> Encode for PrefixedOption<T> {
    fn encode<W: io::Write>(
        &self,
        writer: &mut W,
    ) -> Result<usize, EncodeError> {
        let mut written_bytes = self
            .0
            .is_some()
            .encode(writer)
            .err_context("Failed to encode presence flag")?;

        if let Some(value) = &self.0 {
            written_bytes += value
                .encode(writer)
                .err_context("Failed to encode prefixed value")?;
        }

        Ok(written_bytes)
    }
}

#[allow(clippy::unwrap_used, reason = "tests")]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_signature() {
        let mut buffer = [0x00].as_slice();
        let value = PrefixedOption::<String>::decode(&mut buffer).unwrap();
        assert_eq!(value.into_option(), None);

        let mut buffer = [0x01, 0x03, b's', b'i', b'g'].as_slice();
        let value = PrefixedOption::<String>::decode(&mut buffer).unwrap();
        assert_eq!(value.into_option().as_deref(), Some("sig"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn decode_missing_value() {
        let mut buffer = [0x01].as_slice();
        assert!(matches!(
            PrefixedOption::<String>::decode(&mut buffer).unwrap_err().root(),
            DecodeError::UnexpectedEnd
        ));
    }

    #[test]
    fn encode_signature() {
        let mut buffer = Vec::new();
        let written = PrefixedOption::<&str>(None).encode(&mut buffer).unwrap();
        assert_eq!(written, 1);
        assert_eq!(buffer, vec![0x00]);

        let mut buffer = Vec::new();
        let written = PrefixedOption::from(Some("sig")).encode(&mut buffer).unwrap();
        assert_eq!(written, 5);
        assert_eq!(buffer, vec![0x01, 0x03, b's', b'i', b'g']);
    }
}
