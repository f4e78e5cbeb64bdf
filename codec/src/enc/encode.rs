use std::io;

use super::error::EncodeError;
use crate::VarInt;
use crate::enc::error::EncodeErrorContext as _;

/// Encode a single value to a writer.
pub trait Encode {
    /// Encode a value to a writer.
    ///
    /// # Returns
    ///
    /// Returns the number of bytes written to the writer.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if an error occurs while writing to the
    /// writer.
    fn encode<W: io::Write>(
        &self,
        writer: &mut W,
    ) -> Result<usize, EncodeError>;
}

impl<T> Encode for &T
where
    T: Encode + ?Sized,
{
    fn encode<W: io::Write>(
        &self,
        writer: &mut W,
    ) -> Result<usize, EncodeError> {
        (**self).encode(writer)
    }
}

impl Encode for bool {
    fn encode<W: io::Write>(
        &self,
        writer: &mut W,
    ) -> Result<usize, EncodeError> {
        u8::encode(&u8::from(*self), writer)
    }
}

macro_rules! impl_encode_be {
    ($($ty:ty),+ $(,)?) => {$(
        impl Encode for $ty {
            fn encode<W: io::Write>(
                &self,
                writer: &mut W,
            ) -> Result<usize, EncodeError> {
                let bytes = self.to_be_bytes();
                writer.write_all(&bytes)?;
                Ok(bytes.len())
            }
        }
    )+};
}

impl_encode_be!(u8, u16, u64);

/// A VarInt element count followed by the elements.
impl<T: Encode> Encode for [T] {
    fn encode<W: io::Write>(
        &self,
        writer: &mut W,
    ) -> Result<usize, EncodeError> {
        let prefix = VarInt::from_len(self.len()).err_context("Failed to encode array length")?;

        self.iter().try_fold(prefix.encode(writer)?, |written_bytes, elem| {
            Ok(written_bytes + elem.encode(writer).err_context("Failed to encode array element")?)
        })
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<W: io::Write>(
        &self,
        writer: &mut W,
    ) -> Result<usize, EncodeError> {
        self.as_slice().encode(writer)
    }
}

/// A VarInt byte length followed by the UTF-8 bytes.
impl Encode for str {
    fn encode<W: io::Write>(
        &self,
        writer: &mut W,
    ) -> Result<usize, EncodeError> {
        let prefix = VarInt::from_len(self.len()).err_context("Failed to encode string length")?;
        let written_bytes = prefix.encode(writer)?;

        writer.write_all(self.as_bytes())?;
        Ok(written_bytes + self.len())
    }
}

impl Encode for String {
    fn encode<W: io::Write>(
        &self,
        writer: &mut W,
    ) -> Result<usize, EncodeError> {
        self.as_str().encode(writer)
    }
}

impl Encode for json::JsonValue {
    fn encode<W: io::Write>(
        &self,
        writer: &mut W,
    ) -> Result<usize, EncodeError> {
        self.dump().encode(writer)
    }
}
