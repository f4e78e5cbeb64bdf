use alloc::fmt;
use core::error;
use std::io;

use crate::dec::{
    Decode,
    DecodeError,
};
use crate::enc::{
    Encode,
    EncodeError,
};

/// Length of the undashed hexadecimal form.
const UNDASHED_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uuid(u128);

impl Uuid {
    #[must_use]
    pub const fn null() -> Self { Self(0) }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self { Self(value) }

    /// Parses the 32 hex digit form used by legacy forwarding, e.g.
    /// `0123456789abcdef0123456789abcdef`.
    ///
    /// # Errors
    ///
    /// Returns [`UuidParseError`] if the input is not exactly 32 hex digits.
    pub fn parse_undashed(input: &str) -> Result<Self, UuidParseError> {
        if input.len() != UNDASHED_LEN {
            return Err(UuidParseError::InvalidLength(input.len()));
        }

        parse_hex(input).map(Self)
    }

    /// Formats the 32 hex digit form, without dashes.
    #[must_use]
    pub fn undashed(self) -> Undashed { Undashed(self) }
}

fn parse_hex(digits: &str) -> Result<u128, UuidParseError> {
    digits
        .char_indices()
        .try_fold(0_u128, |acc, (position, c)| {
            c.to_digit(16)
                .map(|digit| (acc << 4) | u128::from(digit))
                .ok_or(UuidParseError::InvalidCharacter {
                    character: c,
                    position,
                })
        })
}

impl fmt::Display for Uuid {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
            self.0 >> 96,
            (self.0 >> 80) & 0xFFFF,
            (self.0 >> 64) & 0xFFFF,
            (self.0 >> 48) & 0xFFFF,
            self.0 & 0xFFFF_FFFF_FFFF,
        )
    }
}

/// Display adapter returned by [`Uuid::undashed`].
#[derive(Debug, Clone, Copy)]
pub struct Undashed(Uuid);

impl fmt::Display for Undashed {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:032x}", self.0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UuidParseError {
    InvalidLength(usize),
    InvalidCharacter { character: char, position: usize },
}

impl fmt::Display for UuidParseError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::InvalidLength(len) => write!(f, "unexpected length {len}"),
            Self::InvalidCharacter {
                character,
                position,
            } => write!(f, "invalid hex character {character:?} at {position}"),
        }
    }
}

impl error::Error for UuidParseError {}

impl Decode for Uuid {
    fn decode<R: io::Read>(reader: &mut R) -> Result<Self, DecodeError> {
        let mut bytes = [0; 16];
        reader.read_exact(&mut bytes)?;
        Ok(Self(u128::from_be_bytes(bytes)))
    }
}

impl Encode for Uuid {
    fn encode<W: io::Write>(
        &self,
        writer: &mut W,
    ) -> Result<usize, EncodeError> {
        let bytes = self.0.to_be_bytes();
        writer.write_all(&bytes)?;
        Ok(16)
    }
}

#[allow(clippy::unwrap_used, reason = "tests")]
#[allow(clippy::unusual_byte_groupings, reason = "uuid grouping")]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_null() {
        assert_eq!(
            "00000000-0000-0000-0000-000000000000".to_owned(),
            format!("{}", Uuid::null())
        );
    }

    #[test]
    fn display_uuid() {
        let value = Uuid(0x01234567_89ab_cdef_0123_456789abcdef_u128);
        assert_eq!(value.to_string(), "01234567-89ab-cdef-0123-456789abcdef");
        assert_eq!(value.undashed().to_string(), "0123456789abcdef0123456789abcdef");
    }

    #[test]
    fn parse_undashed_uuid() {
        let value = Uuid::parse_undashed("0123456789abcdef0123456789abcdef").unwrap();
        assert_eq!(value.to_string(), "01234567-89ab-cdef-0123-456789abcdef");

        let upper = Uuid::parse_undashed("0123456789ABCDEF0123456789ABCDEF").unwrap();
        assert_eq!(upper, value);
    }

    #[test]
    fn reject_malformed_undashed_uuid() {
        assert_eq!(
            Uuid::parse_undashed("0123"),
            Err(UuidParseError::InvalidLength(4))
        );
        assert_eq!(
            Uuid::parse_undashed("0123456789abcdef0123456789abcdeg"),
            Err(UuidParseError::InvalidCharacter {
                character: 'g',
                position: 31,
            })
        );
        assert!(Uuid::parse_undashed("+123456789abcdef0123456789abcdef").is_err());
    }

    #[test]
    fn reject_dashed_form() {
        assert_eq!(
            Uuid::parse_undashed("00112233-4455-6677-8899-aabbccddeeff"),
            Err(UuidParseError::InvalidLength(36))
        );
    }

    #[test]
    fn decode_uuid() {
        #[rustfmt::skip]
        let mut buffer = [
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08,
            0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10,
        ]
        .as_slice();
        let value = Uuid::decode(&mut buffer).unwrap();
        assert_eq!(value, Uuid(0x01020304_0506_0708_090A_0B0C0D0E0F10_u128));
    }

    #[test]
    fn encode_uuid() {
        let mut buffer = Vec::new();
        let value = Uuid(0x01020304_0506_0708_090A_0B0C0D0E0F10_u128);
        value.encode(&mut buffer).unwrap();
        #[rustfmt::skip]
        assert_eq!(buffer, vec![
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08,
            0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10,
        ]);
    }
}
