//! Representation of email header data.

use bstr::ByteSlice;
use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

pub type HeaderField = (FieldName, FieldBody);

/// An error indicating an ill-formed header field or header field collection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HeaderFieldError;

impl Display for HeaderFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "invalid header field")
    }
}

impl Error for HeaderFieldError {}

/// A non-empty, ordered collection of header fields.
///
/// The order of the fields is semantically significant: it determines both the
/// bytes fed to canonicalization and the order a verifier will look headers up
/// in. It is preserved exactly as given and never changed by this library.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HeaderFields(Box<[HeaderField]>);

impl HeaderFields {
    pub fn new(value: impl Into<Box<[HeaderField]>>) -> Result<Self, HeaderFieldError> {
        let value = value.into();
        if value.is_empty() {
            return Err(HeaderFieldError);
        }
        Ok(Self(value))
    }

    pub fn from_vec(value: Vec<(String, Vec<u8>)>) -> Result<Self, HeaderFieldError> {
        let value: Vec<_> = value
            .into_iter()
            .map(|(name, value)| {
                let name = FieldName::new(name)?;
                let body = FieldBody::new(value)?;
                Ok((name, body))
            })
            .collect::<Result<_, _>>()?;
        Self::new(value)
    }
}

impl AsRef<[HeaderField]> for HeaderFields {
    fn as_ref(&self) -> &[HeaderField] {
        &self.0
    }
}

impl From<HeaderFields> for Vec<HeaderField> {
    fn from(fields: HeaderFields) -> Self {
        fields.0.into_vec()
    }
}

/// Parses a header block with LF or CRLF line endings. Lines starting with
/// space or tab are folded continuation lines of the preceding field.
impl FromStr for HeaderFields {
    type Err = HeaderFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields: Vec<(String, Vec<u8>)> = vec![];

        for line in s.lines() {
            if line.starts_with(' ') || line.starts_with('\t') {
                let (_, value) = fields.last_mut().ok_or(HeaderFieldError)?;
                value.extend(b"\r\n");
                value.extend(line.bytes());
            } else {
                let (name, value) = line.split_once(':').ok_or(HeaderFieldError)?;
                fields.push((name.into(), value.as_bytes().to_vec()));
            }
        }

        Self::from_vec(fields)
    }
}

/// A header field name.
///
/// Restricted to printable ASCII without the colon. Comparison is
/// case-insensitive, while the original spelling is preserved.
#[derive(Clone, Eq)]
pub struct FieldName(Box<str>);

impl FieldName {
    pub fn new(value: impl Into<Box<str>>) -> Result<Self, HeaderFieldError> {
        let value = value.into();
        if value.is_empty() {
            return Err(HeaderFieldError);
        }
        if !value.chars().all(|c| c.is_ascii_graphic() && c != ':') {
            return Err(HeaderFieldError);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Debug for FieldName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl PartialEq for FieldName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

/// A header field body: the raw value bytes following the colon.
///
/// The original casing and folding are preserved. Folding must consist of CRLF
/// followed by a space or tab continuation; blank continuation lines, stray CR
/// or LF, and a trailing line break are rejected. The bytes are not required
/// to be UTF-8, accommodating mistaken legacy encodings.
#[derive(Clone, Eq, PartialEq)]
pub struct FieldBody(Box<[u8]>);

impl FieldBody {
    pub fn new(value: impl Into<Box<[u8]>>) -> Result<Self, HeaderFieldError> {
        let value = value.into();

        for (i, line) in value.split_str("\r\n").enumerate() {
            if i > 0 {
                if !(line.starts_with(b" ") || line.starts_with(b"\t")) {
                    return Err(HeaderFieldError);
                }
                if line.trim_with(|c| matches!(c, ' ' | '\t')).is_empty() {
                    return Err(HeaderFieldError);
                }
            }
            if line.contains(&b'\r') || line.contains(&b'\n') {
                return Err(HeaderFieldError);
            }
        }

        Ok(Self(value))
    }
}

impl AsRef<[u8]> for FieldBody {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for FieldBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldBody").field(&self.0.as_bstr()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_name_ok() {
        assert!(FieldName::new("Subject").is_ok());

        assert!(FieldName::new("").is_err());
        assert!(FieldName::new("Subject ").is_err());
        assert!(FieldName::new("Sub:ject").is_err());
    }

    #[test]
    fn field_body_ok() {
        assert!(FieldBody::new(*b" ab\r\n\tcd ").is_ok());
        assert!(FieldBody::new(*b"\r\n\ta").is_ok());
        assert!(FieldBody::new(*b"  ").is_ok());
        assert!(FieldBody::new(*b"").is_ok());

        assert!(FieldBody::new(*b" \r\na").is_err());
        assert!(FieldBody::new(*b" \r\n \r\n a").is_err());
        assert!(FieldBody::new(*b" \na").is_err());
        assert!(FieldBody::new(*b" abc\r\n").is_err());
    }

    #[test]
    fn header_fields_not_empty() {
        assert!(HeaderFields::new(vec![]).is_err());
    }

    #[test]
    fn header_fields_from_str() {
        let fields: HeaderFields = "From: me <me@example.com>\n\
            References: <123@example.com>\n\
            \t<456@example.org>\n\
            To: you@example.org"
            .parse()
            .unwrap();

        let fields = fields.as_ref();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].0, FieldName::new("From").unwrap());
        assert_eq!(
            fields[1].1.as_ref(),
            b" <123@example.com>\r\n\t<456@example.org>"
        );
        assert_eq!(fields[2].1.as_ref(), b" you@example.org");
    }

    #[test]
    fn header_fields_from_str_rejects_garbage() {
        assert!("no colon here".parse::<HeaderFields>().is_err());
        assert!("\tleading continuation: x".parse::<HeaderFields>().is_err());
    }
}
