// mailsig – DKIM and DomainKeys signature generation
// Copyright © 2025–2026 The mailsig developers
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.

//! Signer and supporting types.

mod format;

use crate::{
    canonicalize,
    crypto::{self, KeyLoadError, SigningError, SigningKey},
    header::HeaderFields,
    util,
};
use std::{fmt::Write, time::SystemTime};
use tracing::trace;

pub const DKIM_SIGNATURE_NAME: &str = "DKIM-Signature";
pub const DOMAIN_KEY_SIGNATURE_NAME: &str = "DomainKey-Signature";

/// A signer producing signature headers for mail messages.
///
/// A signer pairs a private signing key with the signing domain (the `d=` tag)
/// and the selector that names the public key record within that domain (the
/// `s=` tag). It is immutable after construction and holds no per-message
/// state, so one signer may be reused, and shared between threads, for any
/// number of messages.
///
/// Domain and selector are embedded verbatim into the produced tag values.
/// They are not validated: a value containing `;` or control characters
/// yields a header no verifier will accept.
pub struct Signer {
    signing_key: SigningKey,
    domain: String,
    selector: String,
}

impl Signer {
    pub fn new(
        signing_key: SigningKey,
        domain: impl Into<String>,
        selector: impl Into<String>,
    ) -> Self {
        Self {
            signing_key,
            domain: domain.into(),
            selector: selector.into(),
        }
    }

    /// Creates a signer from PEM-encoded private key material.
    pub fn from_pem(
        pem: &str,
        domain: impl Into<String>,
        selector: impl Into<String>,
    ) -> Result<Self, KeyLoadError> {
        let signing_key = SigningKey::from_pem(pem)?;
        Ok(Self::new(signing_key, domain, selector))
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Produces a `DKIM-Signature` header for the given message, with the
    /// signing timestamp taken from the system clock.
    ///
    /// See [`dkim_header_at`][Self::dkim_header_at].
    pub fn dkim_header(
        &self,
        signed_header_names: &str,
        headers: &HeaderFields,
        body: &[u8],
    ) -> Result<String, SigningError> {
        self.dkim_header_at(signed_header_names, headers, body, now_unix_secs())
    }

    /// Produces a `DKIM-Signature` header with an explicit signing timestamp
    /// (`t=`, in seconds since the Unix epoch).
    ///
    /// `signed_header_names` is the colon-separated list of signed header
    /// field names forming the `h=` tag; `headers` are the corresponding
    /// fields. The message is signed with the rsa-sha1 algorithm under
    /// relaxed/relaxed canonicalization, and the returned header is folded at
    /// 76 columns with CRLF + tab continuations.
    ///
    /// The caller must keep `signed_header_names` and `headers` in the same
    /// order; for repeated field names, fields nearer the top of the message
    /// come later in the list. A mismatch is not detected here and produces a
    /// well-formed header that fails verification.
    pub fn dkim_header_at(
        &self,
        signed_header_names: &str,
        headers: &HeaderFields,
        body: &[u8],
        timestamp: u64,
    ) -> Result<String, SigningError> {
        let canonical_body = canonicalize::canonicalize_body_relaxed(body);
        let body_length = canonical_body.len();
        let body_hash = util::encode_base64(crypto::data_hash(&canonical_body));

        let domain = &self.domain;
        let selector = &self.selector;
        let header = format!(
            "{DKIM_SIGNATURE_NAME}: v=1; a=rsa-sha1; s={selector}; d={domain}; \
             l={body_length}; t={timestamp}; c=relaxed/relaxed; \
             h={signed_header_names}; bh={body_hash};\r\n\tb="
        );
        let mut header = format::wrap_tags(&header);

        // the unfinished signature header is itself canonicalized as the last
        // signed header, with an empty b= value (RFC 4871, §3.7)
        let mut unsigned = canonicalize::canonicalize_headers_relaxed(headers);
        canonicalize::canonicalize_header_relaxed(
            &mut unsigned,
            DKIM_SIGNATURE_NAME,
            &header[DKIM_SIGNATURE_NAME.len() + 1..],
        );

        let signature = util::encode_base64(self.sign_data(&unsigned)?);
        let col = format::last_line_width(&header);
        format::fold_into(&mut header, col, &signature);

        Ok(header.trim().into())
    }

    /// Produces a `DomainKey-Signature` header for the given message.
    ///
    /// The `h=` tag is emitted only when `signed_header_names` is a non-empty
    /// list; passing `None` (or an empty string) omits it, leaving header
    /// selection to the verifier. The signing input is the nofws
    /// canonicalization of `headers` and `body`.
    ///
    /// The ordering contract of [`dkim_header_at`][Self::dkim_header_at]
    /// applies here as well.
    pub fn domain_key_header(
        &self,
        signed_header_names: Option<&str>,
        headers: &HeaderFields,
        body: &[u8],
    ) -> Result<String, SigningError> {
        let domain = &self.domain;
        let selector = &self.selector;
        let mut header = format!(
            "{DOMAIN_KEY_SIGNATURE_NAME}: a=rsa-sha1; c=nofws; d={domain}; s={selector}; "
        );
        if let Some(h) = signed_header_names.filter(|h| !h.is_empty()) {
            write!(header, "h={h}; ").unwrap();
        }
        header.push_str("b=");
        let mut header = format::wrap_tags(&header);

        let unsigned = canonicalize::canonicalize_nofws(headers, body);

        let signature = util::encode_base64(self.sign_data(&unsigned)?);
        let col = format::last_line_width(&header);
        format::fold_into(&mut header, col, &signature);

        Ok(header.trim().into())
    }

    fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>, SigningError> {
        let data_hash = crypto::data_hash(data);

        match self.signing_key.sign(&data_hash) {
            Ok(signature) => {
                trace!("RSA signing successful");
                Ok(signature)
            }
            Err(e) => {
                trace!("RSA signing failed: {e}");
                Err(e)
            }
        }
    }
}

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |t| t.as_secs())
}
