use std::io;

use super::{
    CONTINUE_MASK,
    SEGMENT_MASK,
};
use crate::dec::{
    Decode,
    DecodeError,
};
use crate::enc::{
    Encode,
    EncodeError,
};

/// Longest encoding of a 32-bit value, in bytes.
pub const MAX_VAR_INT_LEN: usize = 5;

/// A 32-bit integer in its 7-bits-per-byte wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt {
    bytes: [u8; MAX_VAR_INT_LEN],
    len: usize,
}

impl VarInt {
    #[must_use]
    pub fn new(value: i32) -> Self {
        let mut value = value.cast_unsigned();
        let mut var_int = VarInt {
            bytes: [0; MAX_VAR_INT_LEN],
            len: 0,
        };

        loop {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "only the low seven bits are kept"
            )]
            let segment = value as u8 & SEGMENT_MASK;
            value >>= 7;

            let continues = value != 0;
            var_int.bytes[var_int.len] = if continues { segment | CONTINUE_MASK } else { segment };
            var_int.len += 1;

            if !continues {
                return var_int;
            }
        }
    }

    /// Builds the length prefix of a string, array or packet.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::LengthOverflow`] if `len` does not fit in an
    /// `i32`.
    pub fn from_len(len: usize) -> Result<Self, EncodeError> {
        i32::try_from(len)
            .map(Self::new)
            .map_err(|_| EncodeError::LengthOverflow(len))
    }

    #[must_use]
    pub fn value(&self) -> i32 {
        self.as_slice()
            .iter()
            .enumerate()
            .fold(0_u32, |value, (i, byte)| {
                value | u32::from(byte & SEGMENT_MASK) << (7 * i)
            })
            .cast_signed()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] { &self.bytes[..self.len] }

    #[must_use]
    pub fn len(&self) -> usize { self.len }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.len == 0 }
}

impl From<i32> for VarInt {
    fn from(value: i32) -> Self { Self::new(value) }
}

impl From<VarInt> for i32 {
    fn from(var_int: VarInt) -> Self { var_int.value() }
}

impl Decode for VarInt {
    /// Rejects encodings longer than five bytes and a fifth byte carrying
    /// bits above the 32nd.
    fn decode<R: io::Read>(reader: &mut R) -> Result<Self, DecodeError> {
        let mut var_int = VarInt {
            bytes: [0; MAX_VAR_INT_LEN],
            len: 0,
        };

        loop {
            let byte = u8::decode(reader)?;

            if var_int.len == MAX_VAR_INT_LEN - 1 && byte & !0x0F != 0 {
                return Err(DecodeError::InvalidVarInt);
            }

            var_int.bytes[var_int.len] = byte;
            var_int.len += 1;

            if byte & CONTINUE_MASK == 0 {
                return Ok(var_int);
            }
        }
    }
}

impl Encode for VarInt {
    fn encode<W: io::Write>(
        &self,
        writer: &mut W,
    ) -> Result<usize, EncodeError> {
        writer.write_all(self.as_slice())?;
        Ok(self.len)
    }
}

#[allow(overflowing_literals, reason = "tests")]
#[allow(clippy::unwrap_used, reason = "tests")]
#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! var_int {
        ($slice:expr, $expected:expr) => {
            let result = VarInt::decode(&mut $slice.as_slice()).unwrap();
            assert_eq!(result.value(), $expected);
            assert_eq!(VarInt::new($expected).as_slice(), $slice.as_slice());
        };
    }

    #[test]
    fn var_int_round_trip() {
        var_int!([0x00], 0_i32);
        var_int!([0x01], 1_i32);
        var_int!([0x7F], 0x7F_i32);
        var_int!([0x80, 0x01], 0x80_i32);
        var_int!([0xFF, 0xFF, 0x01], 0x7FFF_i32);
        var_int!([0x80, 0x80, 0x02], 0x8000_i32);
        var_int!([0xFF, 0xFF, 0xFF, 0x03], 0x7F_FFFF_i32);
        var_int!([0x80, 0x80, 0x80, 0x04], 0x80_0000_i32);
        var_int!([0xFF, 0xFF, 0xFF, 0xFF, 0x07], 0x7FFF_FFFF_i32);
        var_int!([0x80, 0x80, 0x80, 0x80, 0x08], 0x8000_0000_i32);
        var_int!([0xFF, 0xFF, 0xFF, 0xFF, 0x0F], 0xFFFF_FFFF_i32);
    }

    #[test]
    fn reject_overlong_var_int() {
        assert!(matches!(
            VarInt::decode(&mut [0x80, 0x80, 0x80, 0x80, 0x10].as_slice()),
            Err(DecodeError::InvalidVarInt)
        ));
    }

    #[test]
    fn truncated_var_int() {
        assert!(matches!(
            VarInt::decode(&mut [0x80, 0x80].as_slice()),
            Err(DecodeError::UnexpectedEnd)
        ));
    }

    #[test]
    fn reject_unterminated_var_int() {
        assert!(matches!(
            VarInt::decode(&mut [0xFF; 6].as_slice()),
            Err(DecodeError::InvalidVarInt)
        ));
    }

    #[test]
    fn length_prefix() {
        assert_eq!(VarInt::from_len(300).unwrap().as_slice(), &[0xAC, 0x02]);
    }
}
