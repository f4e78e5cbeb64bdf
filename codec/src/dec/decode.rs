use std::io;

use super::error::DecodeError;
use crate::VarInt;
use crate::dec::error::DecodeErrorContext as _;

/// Upper bound, in bytes, for strings decoded without an explicit limit:
/// 32767 code points of at most 4 bytes each.
pub const MAX_STRING_LENGTH: usize = 32_767 * 4;

/// Decode a single value from a reader.
pub trait Decode: Sized {
    /// Decode a value from a reader.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if an error occurs while reading from the
    /// reader.
    fn decode<R: io::Read>(reader: &mut R) -> Result<Self, DecodeError>;
}

/// Reads a VarInt length prefix and rejects negative values.
///
/// # Errors
///
/// Returns [`DecodeError::NegativeLength`] if the prefix is below zero.
pub fn decode_length<R: io::Read>(reader: &mut R) -> Result<usize, DecodeError> {
    let len = VarInt::decode(reader)?.value();

    if len < 0 {
        return Err(DecodeError::NegativeLength(len));
    }

    Ok(len.cast_unsigned() as usize)
}

/// Reads a length-prefixed UTF-8 string of at most `max` bytes.
///
/// The bound is checked against the prefix before the body is read, so an
/// oversized string never gets buffered.
///
/// # Errors
///
/// Returns [`DecodeError::StringTooLong`] when the prefix exceeds `max`,
/// or any error raised while reading the body.
pub fn decode_bounded_string<R: io::Read>(
    reader: &mut R,
    max: usize,
) -> Result<String, DecodeError> {
    let length = decode_length(reader).err_context("Failed to decode string length")?;

    if length > max {
        return Err(DecodeError::StringTooLong {
            length,
            max,
        });
    }

    let mut bytes = vec![0; length];
    reader.read_exact(&mut bytes)?;

    Ok(String::from_utf8(bytes)?)
}

impl Decode for bool {
    fn decode<R: io::Read>(reader: &mut R) -> Result<Self, DecodeError> {
        u8::decode(reader).map(|byte| byte != 0)
    }
}

macro_rules! impl_decode_be {
    ($($ty:ty),+ $(,)?) => {$(
        impl Decode for $ty {
            fn decode<R: io::Read>(reader: &mut R) -> Result<Self, DecodeError> {
                let mut bytes = [0; size_of::<$ty>()];
                reader.read_exact(&mut bytes)?;
                Ok(<$ty>::from_be_bytes(bytes))
            }
        }
    )+};
}

impl_decode_be!(u8, u16, u64);

/// The element count is not trusted for preallocation; elements are read
/// one by one until it is reached or the input ends.
impl<T: Decode> Decode for Vec<T> {
    fn decode<R: io::Read>(reader: &mut R) -> Result<Self, DecodeError> {
        let len = decode_length(reader).err_context("Failed to decode array length")?;

        (0..len)
            .map(|_| T::decode(reader).err_context("Failed to decode array element"))
            .collect()
    }
}

impl Decode for String {
    fn decode<R: io::Read>(reader: &mut R) -> Result<Self, DecodeError> {
        decode_bounded_string(reader, MAX_STRING_LENGTH)
    }
}

impl Decode for json::JsonValue {
    fn decode<R: io::Read>(reader: &mut R) -> Result<Self, DecodeError> {
        let raw_json = String::decode(reader).err_context("Failed to decode json text")?;
        let json = json::parse(&raw_json)?;

        Ok(json)
    }
}
