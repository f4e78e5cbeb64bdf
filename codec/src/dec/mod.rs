//! Reading values in the protocol's wire format.

mod decode;
mod error;

pub use codec_macros::Decode;
pub use decode::{
    Decode,
    MAX_STRING_LENGTH,
    decode_bounded_string,
    decode_length,
};
pub use error::{
    DecodeError,
    DecodeErrorContext,
};
