use base64ct::{Base64, Encoding};
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// An error indicating that a Base64 string could not be decoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Base64Error;

impl Display for Base64Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "could not decode Base64 string")
    }
}

impl Error for Base64Error {}

/// Encodes binary data as a Base64 string.
pub fn encode_base64(input: impl AsRef<[u8]>) -> String {
    Base64::encode_string(input.as_ref())
}

/// Decodes a Base64 string into bytes.
pub fn decode_base64(input: impl AsRef<str>) -> Result<Vec<u8>, Base64Error> {
    Base64::decode_vec(input.as_ref()).map_err(|_| Base64Error)
}
