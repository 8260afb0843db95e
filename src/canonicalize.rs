//! Canonicalization algorithms.
//!
//! This module implements the *relaxed* header and body canonicalization of
//! RFC 4871 (§3.4.2, §3.4.3) and the *nofws* ("no folding whitespace")
//! canonicalization of RFC 4870 (§3.5). Canonicalization is total over
//! arbitrary input bytes; output line endings are always CRLF.

use crate::header::HeaderFields;
use bstr::ByteSlice;

const SP: u8 = b' ';
const CR: u8 = b'\r';
const LF: u8 = b'\n';
const CRLF: [u8; 2] = [CR, LF];

/// Produces the relaxed header canonicalization result for the given header
/// fields, in order, each terminated with CRLF.
pub fn canonicalize_headers_relaxed(headers: &HeaderFields) -> Vec<u8> {
    let mut result = vec![];

    for (name, value) in headers.as_ref() {
        canonicalize_header_relaxed(&mut result, name, value);
        result.extend(CRLF);
    }

    result
}

/// Canonicalizes a single header field into `result`.
///
/// The name is lowercased; every run of whitespace in the value, including
/// folding, becomes a single space, and surrounding whitespace is trimmed.
/// No trailing CRLF is appended.
pub fn canonicalize_header_relaxed(
    result: &mut Vec<u8>,
    name: impl AsRef<str>,
    value: impl AsRef<[u8]>,
) {
    fn is_space(c: char) -> bool {
        matches!(c, ' ' | '\t' | '\r' | '\n')
    }

    result.extend(name.as_ref().to_ascii_lowercase().bytes());
    result.push(b':');

    let value = value.as_ref().trim_with(is_space);

    let mut compressing = false;
    for &b in value {
        if is_space(b.into()) {
            if !compressing {
                result.push(SP);
                compressing = true;
            }
        } else {
            result.push(b);
            compressing = false;
        }
    }
}

/// Produces the relaxed body canonicalization result.
///
/// Line endings are normalized to CRLF first, so LF-only input is acceptable.
/// Within each line, runs of whitespace collapse to a single space and
/// trailing whitespace is dropped; trailing blank lines are removed. The
/// result always ends with CRLF; an empty body canonicalizes to exactly CRLF.
pub fn canonicalize_body_relaxed(body: &[u8]) -> Vec<u8> {
    if body.is_empty() {
        return CRLF.to_vec();
    }

    let normalized = normalize_line_endings(body);

    // trailing blank lines do not contribute
    let end = normalized
        .iter()
        .rposition(|&b| b != CR && b != LF)
        .map_or(0, |p| p + 1);

    let mut result = Vec::with_capacity(end + 2);
    for line in normalized[..end].split_str("\r\n") {
        let mut compressing = false;
        for &b in line {
            if matches!(b, b'\t' | b'\n' | b' ') {
                if !compressing {
                    result.push(SP);
                    compressing = true;
                }
            } else {
                result.push(b);
                compressing = false;
            }
        }
        while matches!(result.last(), Some(&SP) | Some(&CR)) {
            result.pop();
        }
        result.extend(CRLF);
    }

    result
}

// CRLF becomes LF, then every LF becomes CRLF; a stray CR is left in place.
fn normalize_line_endings(body: &[u8]) -> Vec<u8> {
    let mut normalized = Vec::with_capacity(body.len() + 2);

    let mut i = 0;
    while i < body.len() {
        let b = body[i];
        if b == LF || (b == CR && body.get(i + 1) == Some(&LF)) {
            normalized.extend(CRLF);
            i += if b == CR { 2 } else { 1 };
        } else {
            normalized.push(b);
            i += 1;
        }
    }

    normalized
}

/// Produces the nofws canonicalization of header fields and body as one
/// signing input.
///
/// Unlike the relaxed algorithm, nofws deletes whitespace outright: headers
/// lose every whitespace byte including folding, body lines lose spaces and
/// tabs. An empty line separates the header block from the body lines, and
/// trailing empty lines are dropped before the final CRLF rejoin.
pub fn canonicalize_nofws(headers: &HeaderFields, body: &[u8]) -> Vec<u8> {
    let mut data = vec![];

    for (name, value) in headers.as_ref() {
        data.extend(name.as_ref().bytes());
        data.push(b':');
        data.extend(
            value
                .as_ref()
                .iter()
                .copied()
                .filter(|b| !matches!(b, b'\t' | b'\r' | b'\n' | b' ')),
        );
        data.push(LF);
    }

    data.push(LF);
    for &b in body {
        if !matches!(b, b'\t' | b'\r' | b' ') {
            data.push(b);
        }
    }
    data.push(LF);

    let end = data.iter().rposition(|&b| b != LF).map_or(0, |p| p + 1);
    data.truncate(end);

    let mut result = Vec::with_capacity(data.len() + 2);
    for (i, line) in data.split(|&b| b == LF).enumerate() {
        if i > 0 {
            result.extend(CRLF);
        }
        result.extend_from_slice(line);
    }
    result.extend(CRLF);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use bstr::BStr;

    fn relaxed_header(name: &str, value: &[u8]) -> Vec<u8> {
        let mut result = vec![];
        canonicalize_header_relaxed(&mut result, name, value);
        result
    }

    #[test]
    fn header_relaxed_basic() {
        assert_eq!(relaxed_header("From", b" Good \t "), b"from:Good");
        assert_eq!(relaxed_header("To", b" see   me"), b"to:see me");
        assert_eq!(relaxed_header("Date", b" Fri 24\r\n\tfoo"), b"date:Fri 24 foo");
        assert_eq!(relaxed_header("X-Empty", b""), b"x-empty:");
    }

    #[test]
    fn header_relaxed_idempotent() {
        let once = relaxed_header("Subject", b"  a \t lot\r\n of  folding ");

        let colon = once.iter().position(|&b| b == b':').unwrap();
        let name = std::str::from_utf8(&once[..colon]).unwrap();
        let twice = relaxed_header(name, &once[colon + 1..]);

        assert_eq!(once, twice);
    }

    #[test]
    fn body_relaxed_empty() {
        assert_eq!(canonicalize_body_relaxed(b""), b"\r\n");
    }

    #[test]
    fn body_relaxed_basic() {
        let body = canonicalize_body_relaxed(b"well  hello \r\n\r\n what agi \r\n\r\n\r\n");

        assert_eq!(BStr::new(&body), BStr::new(b"well hello\r\n\r\n what agi\r\n"));
    }

    #[test]
    fn body_relaxed_collapses_and_trims() {
        let body = canonicalize_body_relaxed(b"a  b\t\nc   \r\n\r\n");

        assert_eq!(BStr::new(&body), BStr::new(b"a b\r\nc\r\n"));
    }

    #[test]
    fn body_relaxed_mixed_line_endings() {
        let body = canonicalize_body_relaxed(b"one\ntwo \r\nthree\n");

        assert_eq!(BStr::new(&body), BStr::new(b"one\r\ntwo\r\nthree\r\n"));
    }

    #[test]
    fn body_relaxed_blank_lines_only() {
        assert_eq!(canonicalize_body_relaxed(b"\r\n\r\n"), b"\r\n");
        assert_eq!(canonicalize_body_relaxed(b"\n"), b"\r\n");
    }

    #[test]
    fn nofws_deletes_all_whitespace() {
        let headers = HeaderFields::from_vec(vec![
            ("Subject".into(), b" A  Test".to_vec()),
            ("From".into(), b" me <me@example.com>".to_vec()),
        ])
        .unwrap();

        let data = canonicalize_nofws(&headers, b"Hello\r\n World\t!\r\n");

        assert_eq!(
            BStr::new(&data),
            BStr::new(b"Subject:ATest\r\nFrom:me<me@example.com>\r\n\r\nHello\r\nWorld!\r\n"),
        );
    }

    #[test]
    fn nofws_unfolds_header_values() {
        let headers =
            HeaderFields::from_vec(vec![("Subject".into(), b" Test\r\n\tvalue".to_vec())]).unwrap();

        let data = canonicalize_nofws(&headers, b"");

        assert_eq!(BStr::new(&data), BStr::new(b"Subject:Testvalue\r\n"));
    }

    #[test]
    fn nofws_empty_body_adds_nothing() {
        let headers =
            HeaderFields::from_vec(vec![("Subject".into(), b" Test".to_vec())]).unwrap();

        assert_eq!(canonicalize_nofws(&headers, b""), b"Subject:Test\r\n");
        assert_eq!(canonicalize_nofws(&headers, b"\r\n\r\n"), b"Subject:Test\r\n");
    }

    #[test]
    fn nofws_keeps_interior_empty_lines() {
        let headers =
            HeaderFields::from_vec(vec![("Subject".into(), b" Test".to_vec())]).unwrap();

        let data = canonicalize_nofws(&headers, b"a\r\n\r\nb\r\n");

        assert_eq!(
            BStr::new(&data),
            BStr::new(b"Subject:Test\r\n\r\na\r\n\r\nb\r\n"),
        );
    }
}
